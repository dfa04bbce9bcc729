// src/app/state.rs
// Defines the table data model (rows, sort keys, indicators), the per-column sort controller,
// and the messages passed from background tasks to the UI thread.

use crate::app::error::TableError;
use serde::{Deserialize, Serialize};

// --- Table Data ---

/// One table row: a text cell per header column.
pub type Row = Vec<String>;

/// Stable identity of a dialog type, used to key persisted settings.
pub type DialogKey = String;

/// Represents the sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Applies the direction to an ascending ordering.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => " ^",
            SortDirection::Descending => " v",
        }
    }
}

/// The active sort column and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

/// What the widget shows in its header: the sorted column and its arrow.
pub type SortIndicator = SortKey;

// --- Sort State Controller ---

/// Tracks one ascending flag per column. Every toggle clears all flags before
/// setting the requested one, so at most one flag is ever true.
#[derive(Debug, Clone)]
pub struct SortController {
    order_flags: Vec<bool>,
    active: Option<SortKey>,
}

impl SortController {
    pub fn new(column_count: usize) -> Self {
        Self {
            order_flags: vec![false; column_count],
            active: None,
        }
    }

    /// Toggles the direction of `column` and makes it the active sort key.
    ///
    /// A column that was not ascending becomes ascending; an ascending column
    /// becomes descending. Other columns forget their direction.
    pub fn toggle(&mut self, column: usize) -> Result<SortKey, TableError> {
        let count = self.order_flags.len();
        let ascending = !*self
            .order_flags
            .get(column)
            .ok_or(TableError::ColumnOutOfRange { index: column, count })?;

        self.order_flags.iter_mut().for_each(|flag| *flag = false);
        self.order_flags[column] = ascending;

        let key = SortKey {
            column,
            direction: if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
        };
        self.active = Some(key);
        Ok(key)
    }

    /// The active sort key, or `None` until a sort has been requested.
    pub fn key(&self) -> Option<SortKey> {
        self.active
    }

    pub fn is_configured(&self) -> bool {
        self.active.is_some()
    }

    /// The stored ascending flag for `column`.
    pub fn flag(&self, column: usize) -> bool {
        self.order_flags.get(column).copied().unwrap_or(false)
    }
}

// --- Inter-thread Messages ---

/// Messages passed from background tasks (the cyclic reload scheduler) or the
/// logger to the main UI thread via an MPSC channel.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateMessage {
    /// A log line to be displayed in the UI.
    Log(String),
    /// A scheduler tick asking the dialog with this key to reload.
    CyclicReload(DialogKey),
}
