// src/app/mod.rs
// Main application logic for GridLift. Defines the App struct, implements the eframe::App trait,
// and wires the table dialog engine (reconciliation, sorting, column packing, cyclic reload)
// into the egui frame loop.

// Declare sibling modules within the `app` module
pub mod columns;
pub mod comparator;
pub mod config;
pub mod dialog;
pub mod error;
pub mod reconcile;
pub mod scheduler;
pub mod sources;
pub mod state;
pub mod table_model;
pub mod ui;
pub mod utils;

use eframe::{
    egui::{self, CentralPanel, CollapsingHeader, Context, Key, TopBottomPanel, ViewportCommand},
    App, CreationContext,
};
use log::{debug, error, info, warn};
use std::{
    path::PathBuf,
    sync::{
        mpsc::{Receiver, Sender},
        Arc, Mutex, PoisonError,
    },
};
use tokio::runtime::Runtime;

use self::{
    config::{AppSettings, Cadence, SharedSettings, APP_NAME, SCRIPT_VERSION},
    dialog::{DialogContext, TableDialog},
    error::TableError,
    scheduler::UiDispatcher,
    sources::WorkerActivitySource,
    state::UpdateMessage,
    table_model::TableModel,
    ui::{views, widgets, windows},
};

/// The dialog shown in the central panel.
pub type WorkerDialog = TableDialog<WorkerActivitySource, TableModel>;

// --- Main Application Struct ---

/// Holds the state and logic for the GridLift application.
pub struct GridLiftApp {
    // --- UI State ---
    logs: Vec<String>,
    logs_string_cache: String,
    logs_dirty: bool,
    logs_collapsed: bool,
    show_select_columns_window: bool,
    table_fault: Option<String>,

    // --- Table ---
    worker_dialog: Option<WorkerDialog>,

    // --- Configuration ---
    settings: Arc<Mutex<AppSettings>>,
    config_path: Option<PathBuf>,

    // --- Temporary State for Windows ---
    pending_visible_columns: Option<Vec<bool>>,

    // --- Communication & Async ---
    update_receiver: Receiver<UpdateMessage>,
    // Keeps the cyclic reload tasks' runtime alive for the app's lifetime.
    _rt: Arc<Runtime>,
}

// --- Application Implementation ---

impl GridLiftApp {
    /// Creates a new instance of GridLift and opens the worker activity dialog.
    pub fn new(
        cc: &CreationContext<'_>,
        settings: AppSettings,
        config_path: Option<PathBuf>,
        task_update_sender: Sender<UpdateMessage>,
        update_receiver: Receiver<UpdateMessage>,
    ) -> Self {
        info!("Running GridLiftApp::new - v{}", SCRIPT_VERSION);
        if let Some(path) = &config_path {
            info!("Using config file: {}", path.display());
        } else {
            warn!("Could not determine config file path.");
        }
        info!("--- Loaded Persistent Settings ---");
        info!("LOG_LEVEL: {}", settings.log_level);
        info!("TZ: {}", settings.tz);
        debug!("Visible columns: {:?}", settings.visible_columns);
        debug!("Cyclic reload: {:?}", settings.cyclic_reload);
        info!("--------------------------------");

        let rt = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to create Tokio runtime"),
        );

        let settings = Arc::new(Mutex::new(settings));
        let shared: SharedSettings = settings.clone();
        let repaint_ctx = cc.egui_ctx.clone();
        let context = DialogContext {
            settings: shared,
            runtime: rt.handle().clone(),
            dispatcher: UiDispatcher::new(task_update_sender)
                .with_waker(move || repaint_ctx.request_repaint()),
            cadence: Cadence::default(),
        };

        let mut table_fault = None;
        let worker_dialog =
            match TableDialog::open(WorkerActivitySource::new(), TableModel::new(), &context) {
                Ok(dialog) => Some(dialog),
                Err(e) => {
                    error!("Failed to open worker activity table: {}", e);
                    table_fault = Some(e.to_string());
                    None
                }
            };

        Self {
            logs: Vec::new(),
            logs_string_cache: String::new(),
            logs_dirty: true,
            logs_collapsed: true,
            show_select_columns_window: false,
            table_fault,
            worker_dialog,
            settings,
            config_path,
            pending_visible_columns: None,
            update_receiver,
            _rt: rt,
        }
    }

    /// Rebuilds the cached log string if the logs are marked as dirty.
    fn rebuild_log_cache(&mut self) {
        if self.logs_dirty {
            self.logs_string_cache = self.logs.join("\n");
            self.logs_dirty = false;
        }
    }

    /// Saves the current settings to the persistent configuration file using confy.
    fn save_settings(&self) {
        let snapshot = self
            .settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match config::save_settings(&snapshot, self.config_path.as_deref()) {
            Ok(()) => info!("Settings saved successfully."),
            Err(e) => error!("Failed to save settings: {}", e),
        }
        debug!("Visible columns: {:?}", snapshot.visible_columns);
        debug!("Cyclic reload: {:?}", snapshot.cyclic_reload);
    }

    /// Logs a table fault and shows it above the table. Cyclic reload is suspended so a
    /// persistent fault is not reported every period; the stored preference is kept.
    fn handle_table_result(&mut self, result: Result<(), TableError>) {
        let Err(e) = result else {
            return;
        };
        error!("Table operation failed: {}", e);
        let mut message = e.to_string();
        if let Some(dialog) = self.worker_dialog.as_mut() {
            if dialog.is_cyclic_reload() {
                warn!("Suspending cyclic reload of '{}' after a fault.", dialog.title());
                dialog.suspend_cyclic_reload();
                message.push_str(" (auto reload paused; re-enable it to resume)");
            }
        }
        self.table_fault = Some(message);
    }

    fn reload_table(&mut self) {
        let result = self
            .worker_dialog
            .as_mut()
            .map_or(Ok(()), |dialog| dialog.reload_table());
        self.handle_table_result(result);
    }

    fn set_cyclic_reload(&mut self, enabled: bool) {
        if let Some(dialog) = self.worker_dialog.as_mut() {
            dialog.set_cyclic_reload(enabled);
        }
    }

    fn toggle_cyclic_reload(&mut self) {
        let enabled = self
            .worker_dialog
            .as_ref()
            .is_some_and(|dialog| dialog.is_cyclic_reload());
        self.set_cyclic_reload(!enabled);
    }

    fn open_column_selection(&mut self) {
        if let Some(dialog) = self.worker_dialog.as_ref() {
            info!("Select Columns window opened.");
            self.pending_visible_columns = Some(dialog.visible_columns());
            self.show_select_columns_window = true;
        }
    }

    fn apply_visible_columns(&mut self, visibles: Vec<bool>) {
        let result = self
            .worker_dialog
            .as_mut()
            .map_or(Ok(()), |dialog| dialog.set_visible_columns(visibles));
        let applied = result.is_ok();
        self.handle_table_result(result);
        if applied {
            self.save_settings();
        }
    }

    fn handle_cyclic_reload(&mut self, key: &str) {
        let Some(dialog) = self.worker_dialog.as_mut() else {
            debug!("Cyclic reload for '{}' arrived with no dialog open.", key);
            return;
        };
        if dialog.key() != key {
            debug!("Ignoring cyclic reload for unknown dialog '{}'.", key);
            return;
        }
        let result = dialog.on_cyclic_tick();
        self.handle_table_result(result);
    }
}

// --- eframe::App Implementation ---

impl App for GridLiftApp {
    /// Called once before shutdown.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Shutting down {}.", APP_NAME);
        // Closing persists the cyclic reload flag into the shared settings.
        if let Some(mut dialog) = self.worker_dialog.take() {
            dialog.close();
        }
        self.save_settings();
    }

    /// Called on each frame to update the UI and handle events.
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // --- 1. Process MPSC Messages ---
        let messages: Vec<UpdateMessage> = self.update_receiver.try_iter().collect();
        for msg in messages {
            match msg {
                UpdateMessage::Log(log_line) => {
                    self.logs.push(log_line);
                    self.logs_dirty = true;
                }
                UpdateMessage::CyclicReload(key) => self.handle_cyclic_reload(&key),
            }
        }

        // --- 2. Keyboard Shortcuts ---
        let (reload_pressed, cyclic_pressed) = ctx.input(|i| {
            let f5 = i.key_pressed(Key::F5);
            (f5 && !i.modifiers.command, f5 && i.modifiers.command)
        });
        if reload_pressed {
            self.reload_table();
        }
        if cyclic_pressed {
            self.toggle_cyclic_reload();
        }

        self.rebuild_log_cache();

        // --- 3. Draw UI Elements (Panels, then windows) ---
        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(ViewportCommand::Close);
                    }
                });
                ui.menu_button("Operation", |ui| {
                    if ui.button("Reload (F5)").clicked() {
                        self.reload_table();
                        ui.close_menu();
                    }
                    let mut cyclic = self
                        .worker_dialog
                        .as_ref()
                        .is_some_and(|dialog| dialog.is_cyclic_reload());
                    if ui.checkbox(&mut cyclic, "Reload periodically (Ctrl+F5)").changed() {
                        self.set_cyclic_reload(cyclic);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Select Columns...").clicked() {
                        self.open_column_selection();
                        ui.close_menu();
                    }
                });
            });
        });

        TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .show_separator_line(true)
            .show(ctx, |ui| {
                let header_response = CollapsingHeader::new("Logs")
                    .default_open(!self.logs_collapsed)
                    .show(ui, |ui| {
                        widgets::draw_log_view_content(self, ui);
                    });
                if header_response.header_response.clicked() {
                    self.logs_collapsed = header_response.body_returned.is_none();
                }
                header_response
                    .header_response
                    .on_hover_text("Click to expand/collapse logs");
            });

        CentralPanel::default().show(ctx, |ui| {
            widgets::draw_fault_banner(self, ui);
            views::dialog_view::draw_dialog_view(self, ui);
        });

        if self.show_select_columns_window {
            windows::select_columns_window::draw_select_columns_window(self, ctx);
        }
    }
}
