// src/app/error.rs
// Error types raised by the table engine. Only hook faults are expected to reach the host.

use thiserror::Error;

/// Error returned by collaborator row hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for row hooks (`TableItemCreator`).
pub type HookResult = Result<(), HookError>;

#[derive(Debug, Error)]
pub enum TableError {
    /// A "row created" hook failed. The widget may hold a partially decorated row.
    #[error("row hook failed while creating row {index}: {source}")]
    CreateHook {
        index: usize,
        #[source]
        source: HookError,
    },

    /// A "row updated" hook failed.
    #[error("row hook failed while updating row {index}: {source}")]
    UpdateHook {
        index: usize,
        #[source]
        source: HookError,
    },

    #[error("no column labelled '{0}'")]
    UnknownColumn(String),

    #[error("column index {index} out of range for {count} columns")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("expected {expected} column flags, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
}
