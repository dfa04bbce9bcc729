// tests/common/mod.rs
// Shared fixtures for the integration tests: a widget that counts row operations, a
// source that replays scripted bodies and a dialog context backed by in-memory settings.

#![allow(dead_code)]

use gridlift::app::{
    config::{AppSettings, Cadence, SharedSettings},
    dialog::{DialogContext, TableSource},
    error::HookResult,
    reconcile::{RowTint, TableItemCreator, TableWidget},
    scheduler::UiDispatcher,
    state::{Row, SortIndicator, UpdateMessage},
    table_model::TableModel,
};
use std::{
    collections::{BTreeMap, VecDeque},
    io,
    sync::{
        mpsc::{channel, Receiver},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::runtime::Runtime;

pub const FAST: Cadence = Cadence {
    initial_delay: Duration::from_millis(10),
    period: Duration::from_millis(10),
};

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn rows(body: &[&[&str]]) -> Vec<Row> {
    body.iter().map(|cells| row(cells)).collect()
}

// --- Recording Widget ---

/// A `TableModel` that also counts how rows reached it.
#[derive(Debug, Default)]
pub struct RecordingTable {
    pub model: TableModel,
    pub appended: usize,
    pub rewritten: usize,
    pub disposed: usize,
}

impl RecordingTable {
    pub fn new() -> Self {
        Self {
            model: TableModel::new(),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        (0..self.model.item_count())
            .filter_map(|i| self.model.item(i).map(|item| item.cells.clone()))
            .collect()
    }

    pub fn reset_counts(&mut self) {
        self.appended = 0;
        self.rewritten = 0;
        self.disposed = 0;
    }
}

impl TableWidget for RecordingTable {
    fn add_column(&mut self, label: &str) {
        self.model.add_column(label);
    }

    fn column_count(&self) -> usize {
        self.model.column_count()
    }

    fn pack_column(&mut self, column: usize) {
        self.model.pack_column(column);
    }

    fn set_column_width(&mut self, column: usize, width: f32) {
        self.model.set_column_width(column, width);
    }

    fn column_width(&self, column: usize) -> f32 {
        self.model.column_width(column)
    }

    fn item_count(&self) -> usize {
        self.model.item_count()
    }

    fn append_item(&mut self, cells: &[String]) {
        self.appended += 1;
        self.model.append_item(cells);
    }

    fn set_item_text(&mut self, index: usize, cells: &[String]) {
        self.rewritten += 1;
        self.model.set_item_text(index, cells);
    }

    fn dispose_item(&mut self, index: usize) {
        self.disposed += 1;
        self.model.dispose_item(index);
    }

    fn set_item_tint(&mut self, index: usize, tint: Option<RowTint>) {
        self.model.set_item_tint(index, tint);
    }

    fn set_redraw(&mut self, enabled: bool) {
        self.model.set_redraw(enabled);
    }

    fn sort_indicator(&self) -> Option<SortIndicator> {
        self.model.sort_indicator()
    }

    fn set_sort_indicator(&mut self, indicator: Option<SortIndicator>) {
        self.model.set_sort_indicator(indicator);
    }

    fn top_index(&self) -> usize {
        self.model.top_index()
    }

    fn set_top_index(&mut self, index: usize) {
        self.model.set_top_index(index);
    }

    fn selection(&self) -> Vec<usize> {
        self.model.selection()
    }

    fn set_selection(&mut self, indices: &[usize]) {
        self.model.set_selection(indices);
    }
}

// --- Scripted Source ---

/// Row hook that can be told to fail when creating a given row.
#[derive(Debug, Default)]
pub struct ScriptedCreator {
    pub fail_create_at: Option<usize>,
    pub inits: usize,
}

impl TableItemCreator for ScriptedCreator {
    fn init(&mut self) {
        self.inits += 1;
    }

    fn create(&mut self, _widget: &mut dyn TableWidget, _row: &Row, index: usize) -> HookResult {
        if self.fail_create_at == Some(index) {
            return Err(Box::new(io::Error::new(io::ErrorKind::Other, "decoration failed")));
        }
        Ok(())
    }

    fn update(&mut self, _widget: &mut dyn TableWidget, _row: &Row, _index: usize) -> HookResult {
        Ok(())
    }
}

/// Hands out queued bodies one per reload; the last body repeats once the queue is empty.
#[derive(Debug)]
pub struct ScriptedSource {
    pub header: Vec<String>,
    pub bodies: VecDeque<Vec<Row>>,
    pub last: Vec<Row>,
    pub creator: ScriptedCreator,
}

impl ScriptedSource {
    pub const KEY: &'static str = "scripted";

    pub fn new(header: &[&str], bodies: Vec<Vec<Row>>) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            bodies: bodies.into(),
            last: Vec::new(),
            creator: ScriptedCreator::default(),
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.creator.fail_create_at = Some(index);
        self
    }
}

impl TableSource for ScriptedSource {
    fn title(&self) -> String {
        "Scripted".to_string()
    }

    fn dialog_key(&self) -> String {
        Self::KEY.to_string()
    }

    fn table_header(&self) -> Vec<String> {
        self.header.clone()
    }

    fn update_table_body(&mut self) -> Vec<Row> {
        if let Some(body) = self.bodies.pop_front() {
            self.last = body;
        }
        self.last.clone()
    }

    fn item_creator(&mut self) -> &mut dyn TableItemCreator {
        &mut self.creator
    }
}

// --- Dialog Context ---

pub fn empty_settings() -> AppSettings {
    AppSettings {
        log_level: "INFO".to_string(),
        tz: "UTC".to_string(),
        visible_columns: BTreeMap::new(),
        cyclic_reload: BTreeMap::new(),
    }
}

pub fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

pub struct Harness {
    pub settings: Arc<Mutex<AppSettings>>,
    pub context: DialogContext,
    pub receiver: Receiver<UpdateMessage>,
    pub runtime: Runtime,
}

impl Harness {
    pub fn new(settings: AppSettings) -> Self {
        let runtime = runtime();
        let (sender, receiver) = channel();
        let settings = Arc::new(Mutex::new(settings));
        let shared: SharedSettings = settings.clone();
        let context = DialogContext {
            settings: shared,
            runtime: runtime.handle().clone(),
            dispatcher: UiDispatcher::new(sender),
            cadence: FAST,
        };
        Self {
            settings,
            context,
            receiver,
            runtime,
        }
    }

    pub fn settings(&self) -> AppSettings {
        self.settings.lock().unwrap().clone()
    }
}
