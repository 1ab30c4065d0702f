//! Error types for store lookups.
//!
//! The silent store operations swallow these; the `try_*` variants hand them
//! back to callers that want to tell a miss from a success.

use thiserror::Error;

/// Why a store operation could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("task {task_id} not found in column '{column_id}'")]
    TaskNotFound { task_id: u64, column_id: String },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
