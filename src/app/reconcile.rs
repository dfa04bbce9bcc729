// src/app/reconcile.rs
// Brings a stateful table widget in line with a fresh row snapshot. Overlapping rows are
// rewritten in place, new rows are appended and surplus rows are disposed, so selection
// and scroll state tied to surviving rows is kept.

use crate::app::{
    error::{HookResult, TableError},
    state::{Row, SortIndicator},
};
use log::debug;
use std::ops::{Deref, DerefMut};

// --- Collaborator Contracts ---

/// Background tint a row hook may apply to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A row-oriented table widget owned by the UI thread.
///
/// The engine only talks to the widget through this trait; rendering is the
/// implementor's business.
pub trait TableWidget {
    fn add_column(&mut self, label: &str);
    fn column_count(&self) -> usize;
    /// Auto-fits the column to its header and cell content.
    fn pack_column(&mut self, column: usize);
    fn set_column_width(&mut self, column: usize, width: f32);
    fn column_width(&self, column: usize) -> f32;

    fn item_count(&self) -> usize;
    fn append_item(&mut self, cells: &[String]);
    fn set_item_text(&mut self, index: usize, cells: &[String]);
    fn dispose_item(&mut self, index: usize);
    fn set_item_tint(&mut self, _index: usize, _tint: Option<RowTint>) {}

    /// Suspends (`false`) or resumes (`true`) repainting.
    fn set_redraw(&mut self, enabled: bool);

    fn sort_indicator(&self) -> Option<SortIndicator>;
    fn set_sort_indicator(&mut self, indicator: Option<SortIndicator>);
    fn top_index(&self) -> usize;
    fn set_top_index(&mut self, index: usize);
    fn selection(&self) -> Vec<usize>;
    fn set_selection(&mut self, indices: &[usize]);
}

/// Decoration hooks run while rows are reconciled. Hooks must not touch the body.
pub trait TableItemCreator {
    /// Called once before every reconciliation pass.
    fn init(&mut self) {}

    /// Called after row `index` has been appended to the widget.
    fn create(&mut self, widget: &mut dyn TableWidget, row: &Row, index: usize) -> HookResult;

    /// Called after row `index` has been rewritten in place.
    fn update(&mut self, widget: &mut dyn TableWidget, row: &Row, index: usize) -> HookResult;
}

/// Item creator that leaves rows undecorated.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainItemCreator;

impl TableItemCreator for PlainItemCreator {
    fn create(&mut self, _widget: &mut dyn TableWidget, _row: &Row, _index: usize) -> HookResult {
        Ok(())
    }

    fn update(&mut self, _widget: &mut dyn TableWidget, _row: &Row, _index: usize) -> HookResult {
        Ok(())
    }
}

// --- Redraw Batching ---

/// Keeps the widget's redraw suspended until dropped. Redraw is resumed exactly
/// once, also when a hook fault unwinds the batch early.
pub struct RedrawSuspended<'a> {
    widget: &'a mut dyn TableWidget,
}

impl<'a> RedrawSuspended<'a> {
    pub fn new(widget: &'a mut dyn TableWidget) -> Self {
        widget.set_redraw(false);
        Self { widget }
    }
}

impl<'a> Deref for RedrawSuspended<'a> {
    type Target = dyn TableWidget + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.widget
    }
}

impl<'a> DerefMut for RedrawSuspended<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.widget
    }
}

impl Drop for RedrawSuspended<'_> {
    fn drop(&mut self) {
        self.widget.set_redraw(true);
    }
}

// --- View State ---

/// User-visible widget state that some toolkits drop when rows or columns are rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub sort_indicator: Option<SortIndicator>,
    pub top_index: usize,
    pub selection: Vec<usize>,
}

impl ViewState {
    pub fn capture(widget: &dyn TableWidget) -> Self {
        Self {
            sort_indicator: widget.sort_indicator(),
            top_index: widget.top_index(),
            selection: widget.selection(),
        }
    }

    /// Restores the captured state, dropping selections past the current row count.
    pub fn restore(self, widget: &mut dyn TableWidget) {
        let count = widget.item_count();
        let selection: Vec<usize> = self.selection.into_iter().filter(|&i| i < count).collect();

        widget.set_sort_indicator(self.sort_indicator);
        widget.set_selection(&selection);
        widget.set_top_index(self.top_index.min(count.saturating_sub(1)));
    }
}

// --- Reconciliation ---

/// What a reconciliation pass did to the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub updated: usize,
    pub created: usize,
    pub disposed: usize,
}

/// Rewrites the widget's rows to match `body`.
///
/// Rows `0..min(P, S)` are updated in place, rows `min(P, S)..S` are appended and
/// rows `S..P` are disposed, where P is the widget's row count and S the body size.
/// Any hook fault aborts the pass and is returned to the caller.
pub fn reconcile(
    widget: &mut dyn TableWidget,
    body: &[Row],
    creator: &mut dyn TableItemCreator,
) -> Result<ReconcileStats, TableError> {
    let mut widget = RedrawSuspended::new(widget);
    let previous = widget.item_count();
    let size = body.len();
    let overlap = previous.min(size);

    creator.init();

    for (index, row) in body.iter().enumerate().take(overlap) {
        widget.set_item_text(index, row);
        creator
            .update(&mut *widget, row, index)
            .map_err(|source| TableError::UpdateHook { index, source })?;
    }

    for (index, row) in body.iter().enumerate().skip(overlap) {
        widget.append_item(row);
        creator
            .create(&mut *widget, row, index)
            .map_err(|source| TableError::CreateHook { index, source })?;
    }

    // Dispose from the end so the remaining indices stay valid.
    for index in (size..previous).rev() {
        widget.dispose_item(index);
    }

    let stats = ReconcileStats {
        updated: overlap,
        created: size - overlap,
        disposed: previous.saturating_sub(size),
    };
    debug!("Reconciled table rows: {:?}", stats);
    Ok(stats)
}
