//! Event commands: create, update, delete.

use calsync_core::{CalendarEvent, OperationKind, OperationResult};
use calsync_sync::CalendarSync;

use crate::error::{ClientError, ClientResult};

/// Creates an event and prints its id.
pub async fn create(
    sync: &CalendarSync,
    user_id: &str,
    event: CalendarEvent,
    json: bool,
) -> ClientResult<()> {
    let result = sync.create_event(user_id, &event).await?;
    report(OperationKind::Create, result, json)
}

/// Replaces an event.
pub async fn update(
    sync: &CalendarSync,
    user_id: &str,
    event_id: &str,
    event: CalendarEvent,
    json: bool,
) -> ClientResult<()> {
    let result = sync.update_event(user_id, event_id, &event).await?;
    report(OperationKind::Update, result, json)
}

/// Deletes an event.
pub async fn delete(
    sync: &CalendarSync,
    user_id: &str,
    event_id: &str,
    json: bool,
) -> ClientResult<()> {
    let result = sync.delete_event(user_id, event_id).await?;
    report(OperationKind::Delete, result, json)
}

/// Prints the result and turns a failure into an error.
///
/// JSON output is printed for failures too; text output leaves failures to
/// the error message.
fn report(kind: OperationKind, result: OperationResult, json: bool) -> ClientResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(line) = render_text(kind, &result) {
        println!("{}", line);
    }

    match result {
        OperationResult::Success { .. } => Ok(()),
        OperationResult::Failure { error } => Err(ClientError::Operation(kind, error)),
    }
}

fn render_text(kind: OperationKind, result: &OperationResult) -> Option<String> {
    let verb = match kind {
        OperationKind::Create => "created",
        OperationKind::Update => "updated",
        OperationKind::Delete => "deleted",
    };
    match result {
        OperationResult::Success { event_id: Some(id) } => Some(format!("{} event {}", verb, id)),
        OperationResult::Success { event_id: None } => Some(format!("{} event", verb)),
        OperationResult::Failure { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calsync_core::OperationError;

    #[test]
    fn success_lines() {
        assert_eq!(
            render_text(OperationKind::Create, &OperationResult::success("abc")).as_deref(),
            Some("created event abc")
        );
        assert_eq!(
            render_text(
                OperationKind::Delete,
                &OperationResult::Success { event_id: None }
            )
            .as_deref(),
            Some("deleted event")
        );
    }

    #[test]
    fn failure_becomes_error() {
        let result = OperationResult::failure(OperationError::new(500u16, "Backend Error"));
        assert!(render_text(OperationKind::Update, &result).is_none());

        let err = report(OperationKind::Update, result, false).unwrap_err();
        assert_eq!(err.to_string(), "update failed: 500: Backend Error");
    }

    #[test]
    fn success_is_ok() {
        assert!(report(OperationKind::Delete, OperationResult::success("e"), true).is_ok());
    }
}
