// src/app/dialog.rs
// The table dialog: owns the header, the current body and the sort state, and drives the
// widget through reconciliation, column packing and cyclic reload. Everything here runs
// on the UI thread; only CyclicReload's task lives elsewhere.

use crate::app::{
    columns,
    comparator::sort_rows,
    config::{Cadence, SettingsStore, SharedSettings},
    error::TableError,
    reconcile::{self, ReconcileStats, TableItemCreator, TableWidget, ViewState},
    scheduler::{CyclicReload, UiDispatcher, ViewLiveness},
    state::{DialogKey, Row, SortController, SortKey},
};
use log::{debug, info};
use std::sync::{MutexGuard, PoisonError};
use tokio::runtime::Handle;

// --- Collaborator Contract ---

/// What a header click should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Sort,
    Ignore,
}

/// Supplies a dialog's header and rows. Each concrete dialog implements this.
pub trait TableSource {
    fn title(&self) -> String;

    /// Key for persisted per-dialog settings. Defaults to the source's type name.
    fn dialog_key(&self) -> DialogKey {
        std::any::type_name::<Self>().to_string()
    }

    /// Column labels. Read once when the dialog opens.
    fn table_header(&self) -> Vec<String>;

    /// Computes a fresh body. May block; called on every reload.
    fn update_table_body(&mut self) -> Vec<Row>;

    fn item_creator(&mut self) -> &mut dyn TableItemCreator;

    /// Header selection listener.
    fn header_selected(&mut self, _column: usize) -> HeaderAction {
        HeaderAction::Sort
    }
}

/// Process-wide collaborators shared by every dialog.
#[derive(Clone)]
pub struct DialogContext {
    pub settings: SharedSettings,
    pub runtime: Handle,
    pub dispatcher: UiDispatcher,
    pub cadence: Cadence,
}

fn lock_settings(settings: &SharedSettings) -> MutexGuard<'_, dyn SettingsStore + 'static> {
    settings.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Table Dialog ---

pub struct TableDialog<S: TableSource, W: TableWidget> {
    key: DialogKey,
    title: String,
    header: Vec<String>,
    body: Vec<Row>,
    sort: SortController,
    source: S,
    widget: W,
    settings: SharedSettings,
    liveness: ViewLiveness,
    cyclic: CyclicReload,
    /// What the user last chose for cyclic reload; survives a fault suspending it.
    cyclic_preference: bool,
    closed: bool,
}

impl<S: TableSource, W: TableWidget> TableDialog<S, W> {
    /// Builds the header, loads the first body, packs the columns and restores the
    /// persisted cyclic reload flag.
    pub fn open(mut source: S, widget: W, ctx: &DialogContext) -> Result<Self, TableError> {
        let key = source.dialog_key();
        let title = source.title();
        let header = source.table_header();
        let liveness = ViewLiveness::new();
        let cyclic = CyclicReload::new(
            key.clone(),
            ctx.runtime.clone(),
            ctx.dispatcher.clone(),
            liveness.clone(),
            ctx.cadence,
        );
        let body = source.update_table_body();

        let mut dialog = Self {
            key,
            title,
            sort: SortController::new(header.len()),
            header,
            body,
            source,
            widget,
            settings: ctx.settings.clone(),
            liveness,
            cyclic,
            cyclic_preference: false,
            closed: false,
        };

        dialog.set_table_header();
        if let Err(e) = dialog.set_table_body() {
            // Never opened, so there is no cyclic flag worth persisting.
            dialog.closed = true;
            dialog.liveness.dispose();
            return Err(e);
        }
        dialog.pack_table_header();

        let restore_cyclic = lock_settings(&dialog.settings).cyclic_reload(&dialog.key);
        if restore_cyclic == Some(true) {
            dialog.cyclic_preference = true;
            dialog.cyclic.enable();
        }

        info!("Opened table dialog '{}' with {} rows.", dialog.title, dialog.body.len());
        Ok(dialog)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn body(&self) -> &[Row] {
        &self.body
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.key()
    }

    pub fn sort_flag(&self, column: usize) -> bool {
        self.sort.flag(column)
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    fn set_table_header(&mut self) {
        for label in &self.header {
            self.widget.add_column(label);
        }
    }

    /// Reconciles the widget with the current body.
    pub fn set_table_body(&mut self) -> Result<ReconcileStats, TableError> {
        reconcile::reconcile(&mut self.widget, &self.body, self.source.item_creator())
    }

    /// Re-applies column widths from the stored visibility vector.
    pub fn pack_table_header(&mut self) {
        let mut settings = lock_settings(&self.settings);
        columns::pack_columns(&mut self.widget, &mut *settings, &self.key);
    }

    /// Fetches a new body, re-applies the active sort and reconciles, keeping the
    /// sort indicator, scroll position and selection.
    pub fn reload_table(&mut self) -> Result<(), TableError> {
        let state = ViewState::capture(&self.widget);
        self.widget.set_sort_indicator(None);

        self.body = self.source.update_table_body();
        if let Some(key) = self.sort.key() {
            sort_rows(&mut self.body, key);
        }
        let stats = match self.set_table_body() {
            Ok(stats) => stats,
            Err(e) => {
                // Rows applied before the fault stay; the indicator and selection come back.
                state.restore(&mut self.widget);
                return Err(e);
            }
        };
        self.pack_table_header();
        state.restore(&mut self.widget);

        debug!("Reloaded '{}': {:?}", self.title, stats);
        Ok(())
    }

    /// Toggles the sort on `column`, re-sorts the body and re-renders it.
    pub fn sort_table_items(&mut self, column: usize) -> Result<SortKey, TableError> {
        let key = self.sort.toggle(column)?;
        self.widget.set_sort_indicator(Some(key));
        sort_rows(&mut self.body, key);
        self.set_table_body()?;
        info!(
            "Sort state of '{}' changed to: column {} ({}), {:?}",
            self.title, column, self.header[column], key.direction
        );
        Ok(key)
    }

    /// Sorts by the first column whose label equals `label`.
    pub fn sort_by_label(&mut self, label: &str) -> Result<SortKey, TableError> {
        let column = self
            .header
            .iter()
            .position(|h| h == label)
            .ok_or_else(|| TableError::UnknownColumn(label.to_string()))?;
        self.sort_table_items(column)
    }

    /// Entry point for header clicks.
    pub fn header_selected(&mut self, column: usize) -> Result<(), TableError> {
        match self.source.header_selected(column) {
            HeaderAction::Sort => self.sort_table_items(column).map(|_| ()),
            HeaderAction::Ignore => Ok(()),
        }
    }

    /// Effective visibility: the stored vector, or all columns visible.
    pub fn visible_columns(&self) -> Vec<bool> {
        let stored = lock_settings(&self.settings).visible_columns(&self.key);
        stored
            .filter(|v| v.len() == self.header.len())
            .unwrap_or_else(|| vec![true; self.header.len()])
    }

    pub fn set_visible_columns(&mut self, visibles: Vec<bool>) -> Result<(), TableError> {
        if visibles.len() != self.header.len() {
            return Err(TableError::ColumnCountMismatch {
                expected: self.header.len(),
                actual: visibles.len(),
            });
        }
        lock_settings(&self.settings).set_visible_columns(&self.key, visibles);
        self.pack_table_header();
        info!("Column selection of '{}' updated.", self.title);
        Ok(())
    }

    pub fn is_cyclic_reload(&self) -> bool {
        self.cyclic.is_enabled()
    }

    pub fn set_cyclic_reload(&mut self, enabled: bool) {
        if self.closed {
            return;
        }
        self.cyclic_preference = enabled;
        self.cyclic.set_enabled(enabled);
    }

    /// Stops the periodic task without changing the stored preference, e.g. after a
    /// fault. Re-enabling through `set_cyclic_reload(true)` resumes it.
    pub fn suspend_cyclic_reload(&mut self) {
        if self.cyclic.is_enabled() {
            info!("Cyclic reload of '{}' suspended.", self.title);
        }
        self.cyclic.disable();
    }

    /// Cyclic reload is wanted but currently not running.
    pub fn is_cyclic_reload_suspended(&self) -> bool {
        self.cyclic_preference && !self.cyclic.is_enabled()
    }

    /// Handles a scheduler tick marshaled onto the UI thread. A no-op once closed.
    pub fn on_cyclic_tick(&mut self) -> Result<(), TableError> {
        if !self.liveness.is_alive() {
            debug!("Ignoring cyclic reload for closed dialog '{}'.", self.title);
            return Ok(());
        }
        self.reload_table()
    }

    /// Marks the view gone, cancels cyclic reload and stores the user's choice for the next open.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.liveness.dispose();
        self.cyclic.disable();
        lock_settings(&self.settings).set_cyclic_reload(&self.key, self.cyclic_preference);
        info!("Closed table dialog '{}'.", self.title);
    }
}

impl<S: TableSource, W: TableWidget> Drop for TableDialog<S, W> {
    fn drop(&mut self) {
        self.close();
    }
}
