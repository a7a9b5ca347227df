//! Server health preflight

use crate::executor::Recorder;
use crate::http::{ApiClient, TransportError};
use crate::models::{parse_object, HealthResponse, Session, Step, StepResult, Suite};

/// `GET /health` must answer `{"status": "ok"}`
///
/// An unhealthy answer is recorded and the run continues; only an unreachable
/// server stops it.
pub async fn check_health(
    client: &ApiClient,
    session: &Session,
    recorder: &mut Recorder,
) -> Result<(), TransportError> {
    let scope = Suite::Health.name();
    let outcome = client.get(session, "/health").await?;

    let result = match parse_object::<HealthResponse>(&outcome, "a health report") {
        Ok(report) if report.status.as_deref() == Some("ok") => StepResult::pass(
            scope,
            Step::HealthCheck,
            outcome.duration_ms(),
            format!(
                "Server healthy: {}",
                report.message.unwrap_or_else(|| "ok".to_string())
            ),
        ),
        Ok(report) => StepResult::fail(
            scope,
            Step::HealthCheck,
            outcome.duration_ms(),
            format!(
                "Unexpected health status: {}",
                report.status.unwrap_or_else(|| "N/A".to_string())
            ),
        ),
        Err(e) => StepResult::fail(
            scope,
            Step::HealthCheck,
            outcome.duration_ms(),
            format!("Health check failed: {e}"),
        ),
    };
    recorder.record(result);

    Ok(())
}
