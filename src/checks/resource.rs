//! Generic create/read/update/delete verification
//!
//! Drives any collection endpoint through four linear steps:
//!
//! 1. Create: `POST base`, must return a record with an id. A failure here
//!    ends the resource since every later step needs the id.
//! 2. Read: `GET base`, the created id must be in the list.
//! 3. Update: `PATCH base/{id}`, every updated field must be echoed back.
//!    An accepted update that echoes something else is a WARN, not a FAIL.
//! 4. Delete: `DELETE base/{id}`, must answer 204 No Content.

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::debug;

use super::{contains_id, created_id};
use crate::executor::Recorder;
use crate::http::{ApiClient, TransportError};
use crate::models::{mismatched_keys, RequestOutcome, ResourceSpec, Session, Step, StepResult};

/// Run the four-step protocol for one resource
pub async fn verify_resource(
    client: &ApiClient,
    session: &Session,
    spec: &ResourceSpec,
    recorder: &mut Recorder,
) -> Result<(), TransportError> {
    let scope = spec.name.as_str();

    let outcome = client
        .post(session, &spec.base_path, &spec.create_payload)
        .await?;
    let id = match created_id(&outcome) {
        Ok(id) => {
            recorder.record(StepResult::pass(
                scope,
                Step::Create,
                outcome.duration_ms(),
                format!("Created item ID: {id}"),
            ));
            id
        }
        Err(e) => {
            recorder.record(StepResult::fail(
                scope,
                Step::Create,
                outcome.duration_ms(),
                format!("Failed: {e}"),
            ));
            debug!("Skipping remaining {} steps", scope);
            return Ok(());
        }
    };

    let outcome = client.get(session, &spec.base_path).await?;
    let read = match contains_id(&outcome, &id) {
        Ok(true) => StepResult::pass(scope, Step::Read, outcome.duration_ms(), "Item found in list"),
        Ok(false) => StepResult::fail(
            scope,
            Step::Read,
            outcome.duration_ms(),
            format!("Item ID {id} not found in list"),
        ),
        Err(e) => StepResult::fail(
            scope,
            Step::Read,
            outcome.duration_ms(),
            format!("Failed to fetch list: {e}"),
        ),
    };
    recorder.record(read);

    let record_path = spec.record_path(&id);
    let update_body = Value::Object(spec.update_payload.clone());
    let outcome = client.patch(session, &record_path, &update_body).await?;
    recorder.record(judge_update(scope, &outcome, &spec.update_payload));

    let outcome = client.delete(session, &record_path).await?;
    recorder.record(judge_delete(scope, &outcome));

    Ok(())
}

/// PASS on a full echo, WARN on an accepted but divergent echo, FAIL otherwise
fn judge_update(scope: &str, outcome: &RequestOutcome, expected: &Map<String, Value>) -> StepResult {
    let duration_ms = outcome.duration_ms();
    if !outcome.is_ok() {
        return StepResult::fail(
            scope,
            Step::Update,
            duration_ms,
            format!("Failed: {}", outcome.error_message()),
        );
    }

    let mismatched = mismatched_keys(outcome.body(), expected);
    if mismatched.is_empty() {
        StepResult::pass(scope, Step::Update, duration_ms, "Item updated successfully")
    } else {
        StepResult::warn(
            scope,
            Step::Update,
            duration_ms,
            format!(
                "Response did not match payload (mismatched: {})",
                mismatched.join(", ")
            ),
        )
    }
}

/// Only an `Ok` outcome with status 204 counts as a delete
fn judge_delete(scope: &str, outcome: &RequestOutcome) -> StepResult {
    let duration_ms = outcome.duration_ms();
    match outcome.status() {
        Some(status) if outcome.is_ok() && status == StatusCode::NO_CONTENT.as_u16() => {
            StepResult::pass(scope, Step::Delete, duration_ms, "Item deleted successfully")
        }
        Some(status) if outcome.is_ok() => StepResult::fail(
            scope,
            Step::Delete,
            duration_ms,
            format!("Expected 204 No Content, got {status}"),
        ),
        _ => StepResult::fail(
            scope,
            Step::Delete,
            duration_ms,
            format!("Failed: {}", outcome.error_message()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResourceKind, StepStatus};
    use crate::testing::{MockBackend, MockBehavior};
    use axum::http::StatusCode as MockStatus;
    use chrono::Utc;
    use serde_json::json;

    async fn run(behavior: MockBehavior, kind: ResourceKind) -> (Vec<StepResult>, MockBackend) {
        let backend = MockBackend::start(behavior).await;
        let client = ApiClient::new(backend.base_url()).unwrap();
        let mut session = Session::new();
        session.set_token(backend.issue_token("user_1"));

        let mut recorder = Recorder::silent();
        verify_resource(&client, &session, &kind.spec(Utc::now()), &mut recorder)
            .await
            .unwrap();
        (recorder.into_results(), backend)
    }

    fn statuses(results: &[StepResult]) -> Vec<(Step, StepStatus)> {
        results.iter().map(|r| (r.step, r.status)).collect()
    }

    #[tokio::test]
    async fn test_water_lifecycle_passes() {
        let (results, backend) = run(MockBehavior::default(), ResourceKind::Water).await;

        assert_eq!(
            statuses(&results),
            vec![
                (Step::Create, StepStatus::Pass),
                (Step::Read, StepStatus::Pass),
                (Step::Update, StepStatus::Pass),
                (Step::Delete, StepStatus::Pass),
            ]
        );
        assert_eq!(results[0].label(), "Waters Create");
        assert_eq!(backend.request_count(), 4);
    }

    #[tokio::test]
    async fn test_sleep_float_update_passes() {
        let (results, _backend) = run(MockBehavior::default(), ResourceKind::Sleep).await;
        assert_eq!(results[2].status, StepStatus::Pass);
    }

    #[tokio::test]
    async fn test_update_without_echo_warns() {
        let behavior = MockBehavior {
            echo_updates: false,
            ..Default::default()
        };
        let (results, _backend) = run(behavior, ResourceKind::Activity).await;

        assert_eq!(results[2].step, Step::Update);
        assert_eq!(results[2].status, StepStatus::Warn);
        assert!(results[2].message.contains("minutes"));
        assert!(results[2].message.contains("intensity"));
        assert_eq!(results[3].status, StepStatus::Pass);
    }

    #[tokio::test]
    async fn test_delete_with_200_fails() {
        let behavior = MockBehavior {
            delete_status: MockStatus::OK,
            ..Default::default()
        };
        let (results, _backend) = run(behavior, ResourceKind::Water).await;

        assert_eq!(results[3].step, Step::Delete);
        assert_eq!(results[3].status, StepStatus::Fail);
        assert_eq!(results[3].message, "Expected 204 No Content, got 200");
    }

    #[tokio::test]
    async fn test_read_failure_does_not_stop_update_and_delete() {
        let behavior = MockBehavior {
            hide_from_list: true,
            ..Default::default()
        };
        let (results, backend) = run(behavior, ResourceKind::Water).await;

        assert_eq!(
            statuses(&results),
            vec![
                (Step::Create, StepStatus::Pass),
                (Step::Read, StepStatus::Fail),
                (Step::Update, StepStatus::Pass),
                (Step::Delete, StepStatus::Pass),
            ]
        );
        assert_eq!(results[1].message, "Item ID 0 not found in list");
        assert_eq!(backend.request_count(), 4);
    }

    #[tokio::test]
    async fn test_create_failure_stops_resource() {
        let behavior = MockBehavior {
            reject_creates: true,
            ..Default::default()
        };
        let (results, backend) = run(behavior, ResourceKind::Water).await;

        assert_eq!(statuses(&results), vec![(Step::Create, StepStatus::Fail)]);
        assert_eq!(
            results[0].message,
            "Failed: HTTP 400: Missing or invalid fields"
        );
        assert_eq!(backend.request_count(), 1);
    }

    fn ok(status: u16, body: Option<Value>) -> RequestOutcome {
        RequestOutcome::Ok {
            status,
            duration_ms: 2,
            body,
        }
    }

    #[test]
    fn test_judge_update_rejected_is_fail() {
        let outcome = RequestOutcome::Err {
            status: Some(404),
            duration_ms: 2,
            error: json!({"errorMessage": "Record not found"}),
        };
        let expected = json!({"amountMl": 750});
        let result = judge_update("Waters", &outcome, expected.as_object().unwrap());
        assert_eq!(result.status, StepStatus::Fail);
        assert_eq!(result.message, "Failed: Record not found");
    }

    #[test]
    fn test_judge_update_empty_body_warns() {
        let expected = json!({"amountMl": 750});
        let result = judge_update("Waters", &ok(200, None), expected.as_object().unwrap());
        assert_eq!(result.status, StepStatus::Warn);
    }

    #[test]
    fn test_judge_update_wrong_value_warns() {
        let expected = json!({"amountMl": 750});
        let body = json!({"id": "0", "amountMl": 500});
        let result = judge_update("Waters", &ok(200, Some(body)), expected.as_object().unwrap());
        assert_eq!(result.status, StepStatus::Warn);
        assert_eq!(
            result.message,
            "Response did not match payload (mismatched: amountMl)"
        );
    }

    #[test]
    fn test_judge_delete() {
        assert_eq!(judge_delete("Waters", &ok(204, None)).status, StepStatus::Pass);
        assert_eq!(judge_delete("Waters", &ok(200, None)).status, StepStatus::Fail);

        let missing = RequestOutcome::Err {
            status: Some(404),
            duration_ms: 1,
            error: json!({"errorMessage": "Record not found"}),
        };
        let result = judge_delete("Waters", &missing);
        assert_eq!(result.status, StepStatus::Fail);
        assert_eq!(result.message, "Failed: Record not found");
    }
}
