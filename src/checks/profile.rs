//! Profile and BMI lookups for the authenticated user

use crate::executor::Recorder;
use crate::http::{ApiClient, TransportError};
use crate::models::{
    parse_object, BmiResponse, ProfileResponse, ResponseError, Session, Step, StepResult, Suite,
};

/// Fetch the profile, remember the user id, then fetch the BMI
pub async fn check_profile(
    client: &ApiClient,
    session: &mut Session,
    recorder: &mut Recorder,
) -> Result<(), TransportError> {
    let scope = Suite::Profile.name();

    let outcome = client.get(session, "/user/profile").await?;
    let fetched = parse_object::<ProfileResponse>(&outcome, "a user profile").and_then(|profile| {
        match profile.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(profile),
            _ => Err(ResponseError::MissingField("name")),
        }
    });
    let result = match fetched {
        Ok(profile) => {
            let shown = profile
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string());
            if let Some(id) = profile.id.filter(|id| id.is_present()) {
                session.set_user_id(id);
            }
            StepResult::pass(
                scope,
                Step::Profile,
                outcome.duration_ms(),
                format!("Fetched profile for ID: {shown}"),
            )
        }
        Err(e) => StepResult::fail(
            scope,
            Step::Profile,
            outcome.duration_ms(),
            format!("Failed to fetch profile: {e}"),
        ),
    };
    recorder.record(result);

    let outcome = client.get(session, "/user/bmi").await?;
    let bmi = parse_object::<BmiResponse>(&outcome, "a BMI report").and_then(|report| {
        report
            .bmi
            .filter(|bmi| bmi.is_finite() && *bmi != 0.0)
            .ok_or(ResponseError::MissingField("bmi"))
    });
    let result = match bmi {
        Ok(bmi) => StepResult::pass(
            scope,
            Step::Bmi,
            outcome.duration_ms(),
            format!("Calculated BMI: {bmi:.2}"),
        ),
        Err(e) => StepResult::fail(
            scope,
            Step::Bmi,
            outcome.duration_ms(),
            format!("Failed to fetch BMI: {e}"),
        ),
    };
    recorder.record(result);

    Ok(())
}
