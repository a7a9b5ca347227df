//! Custom category and nested item verification
//!
//! Same shape as the resource protocol, two levels deep. Item updates are
//! judged on the single `note` field, so any mismatch is a FAIL. Item deletes
//! accept any successful status, unlike resource deletes which insist on 204.

use tracing::debug;

use super::{contains_id, created_id};
use crate::executor::Recorder;
use crate::http::{ApiClient, TransportError};
use crate::models::{
    parse_object, CategorySpec, RecordResponse, RequestOutcome, Session, Step, StepResult, Suite,
};

/// Run the six-step category/item protocol
pub async fn verify_category(
    client: &ApiClient,
    session: &Session,
    spec: &CategorySpec,
    recorder: &mut Recorder,
) -> Result<(), TransportError> {
    let scope = Suite::Categories.name();

    let outcome = client
        .post(session, "/category/create", &spec.create_payload())
        .await?;
    let created = parse_object::<RecordResponse>(&outcome, "a created category")
        .and_then(|record| Ok((record.identifier()?, record.category_name)));
    let cat_id = match created {
        Ok((id, name)) => {
            let name = name.unwrap_or_else(|| spec.category_name.clone());
            recorder.record(StepResult::pass(
                scope,
                Step::CategoryCreate,
                outcome.duration_ms(),
                format!("Created Category: {name} ({id})"),
            ));
            id
        }
        Err(e) => {
            recorder.record(StepResult::fail(
                scope,
                Step::CategoryCreate,
                outcome.duration_ms(),
                format!("Failed to create category: {e}"),
            ));
            return Ok(());
        }
    };

    let outcome = client.get(session, "/category/list").await?;
    let listed = match contains_id(&outcome, &cat_id) {
        Ok(true) => StepResult::pass(
            scope,
            Step::CategoryList,
            outcome.duration_ms(),
            "New category found in list",
        ),
        Ok(false) => StepResult::fail(
            scope,
            Step::CategoryList,
            outcome.duration_ms(),
            format!("Category {cat_id} not found in list"),
        ),
        Err(e) => StepResult::fail(
            scope,
            Step::CategoryList,
            outcome.duration_ms(),
            format!("Category list request failed: {e}"),
        ),
    };
    recorder.record(listed);

    let outcome = client
        .post(
            session,
            &format!("/category/{cat_id}/add"),
            &spec.item_payload(),
        )
        .await?;
    let item_id = match created_id(&outcome) {
        Ok(id) => {
            recorder.record(StepResult::pass(
                scope,
                Step::ItemAdd,
                outcome.duration_ms(),
                format!("Added Item ID: {id}"),
            ));
            id
        }
        Err(e) => {
            recorder.record(StepResult::fail(
                scope,
                Step::ItemAdd,
                outcome.duration_ms(),
                format!("Failed to add item: {e}"),
            ));
            debug!("Skipping remaining item steps for category {}", cat_id);
            return Ok(());
        }
    };

    let outcome = client
        .get(session, &format!("/category/{cat_id}/list"))
        .await?;
    let listed = match contains_id(&outcome, &item_id) {
        Ok(true) => StepResult::pass(
            scope,
            Step::ItemList,
            outcome.duration_ms(),
            "Item found in category list",
        ),
        Ok(false) => StepResult::fail(
            scope,
            Step::ItemList,
            outcome.duration_ms(),
            format!("Item {item_id} not found in category list"),
        ),
        Err(e) => StepResult::fail(
            scope,
            Step::ItemList,
            outcome.duration_ms(),
            format!("Item list request failed: {e}"),
        ),
    };
    recorder.record(listed);

    let item_path = format!("/category/{cat_id}/{item_id}");
    let outcome = client
        .patch(session, &item_path, &spec.update_payload())
        .await?;
    recorder.record(judge_item_update(scope, &outcome, &spec.updated_note));

    let outcome = client.delete(session, &item_path).await?;
    let deleted = if outcome.is_ok() {
        StepResult::pass(
            scope,
            Step::ItemDelete,
            outcome.duration_ms(),
            "Item deleted successfully",
        )
    } else {
        StepResult::fail(
            scope,
            Step::ItemDelete,
            outcome.duration_ms(),
            format!("Failed to delete item: {}", outcome.error_message()),
        )
    };
    recorder.record(deleted);

    Ok(())
}

/// PASS only when the returned note is exactly `expected_note`
fn judge_item_update(scope: &str, outcome: &RequestOutcome, expected_note: &str) -> StepResult {
    let duration_ms = outcome.duration_ms();
    match parse_object::<RecordResponse>(outcome, "an item record") {
        Ok(record) if record.note.as_deref() == Some(expected_note) => {
            StepResult::pass(scope, Step::ItemUpdate, duration_ms, "Item updated successfully")
        }
        Ok(record) => StepResult::fail(
            scope,
            Step::ItemUpdate,
            duration_ms,
            format!(
                "Failed to update item: expected note {:?}, got {:?}",
                expected_note,
                record.note.unwrap_or_default()
            ),
        ),
        Err(e) => StepResult::fail(
            scope,
            Step::ItemUpdate,
            duration_ms,
            format!("Failed to update item: {e}"),
        ),
    }
}
