//! Drag-and-drop payloads.
//!
//! A picked-up card carries its task id and source column id as strings, the
//! same shape a drop event hands over. Turning a drop into a `MoveRequest`
//! parses those strings; a payload that does not parse produces no move.

use crate::error::{StoreError, StoreResult};
use crate::store::MoveRequest;

/// Data carried by a card while it is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub task_id: String,
    pub source_column_id: String,
}

impl DragPayload {
    /// Payload for picking up `task_id` from `column_id`.
    pub fn for_task(task_id: u64, column_id: &str) -> Self {
        DragPayload {
            task_id: task_id.to_string(),
            source_column_id: column_id.to_string(),
        }
    }

    /// Parse the carried task id.
    pub fn parse_task_id(&self) -> StoreResult<u64> {
        self.task_id
            .trim()
            .parse::<u64>()
            .map_err(|_| StoreError::MalformedInput(format!("task id '{}'", self.task_id)))
    }
}

/// Drop onto a column body: the card goes to the end of the target.
///
/// Dropping a card back onto its own column does nothing.
pub fn column_drop(
    payload: &DragPayload,
    target_column_id: &str,
    target_len: usize,
) -> Option<MoveRequest> {
    if payload.source_column_id == target_column_id {
        return None;
    }
    let task_id = payload.parse_task_id().ok()?;
    Some(MoveRequest {
        task_id,
        source_column_id: payload.source_column_id.clone(),
        target_column_id: target_column_id.to_string(),
        position: i64::try_from(target_len).unwrap_or(i64::MAX),
    })
}

/// Drop at an explicit slot. Same-column drops reposition the card.
pub fn card_drop(
    payload: &DragPayload,
    target_column_id: &str,
    position: i64,
) -> Option<MoveRequest> {
    let task_id = payload.parse_task_id().ok()?;
    Some(MoveRequest {
        task_id,
        source_column_id: payload.source_column_id.clone(),
        target_column_id: target_column_id.to_string(),
        position,
    })
}
