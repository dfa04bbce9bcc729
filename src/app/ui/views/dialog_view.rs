// src/app/ui/views/dialog_view.rs
// Contains the UI drawing function for the open table dialog: title, toolbar and table.

use super::table_view::{self, TableEvent};
use crate::app::GridLiftApp;
use egui::{Button, Layout, Ui};

// --- View Drawing Functions ---

// Draws the worker activity dialog. Header clicks go through the dialog's header
// listener; row clicks only change the selection.
//
// # Arguments
//
// * app - Mutable reference to the main application state (GridLiftApp).
// * ui - Mutable reference to the egui UI context for drawing.
pub fn draw_dialog_view(app: &mut GridLiftApp, ui: &mut Ui) {
    let Some(dialog) = app.worker_dialog.as_ref() else {
        ui.heading("No table is open.");
        return;
    };
    let title = dialog.title().to_string();
    let rows = dialog.body().len();
    let mut cyclic = dialog.is_cyclic_reload();

    ui.horizontal(|ui| {
        ui.heading(&title);
        ui.label(format!("({} rows)", rows));
        ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Columns...").clicked() {
                app.open_column_selection();
            }
            if ui
                .checkbox(&mut cyclic, "Auto reload")
                .on_hover_text("Ctrl+F5")
                .changed()
            {
                app.set_cyclic_reload(cyclic);
            }
            if ui.add(Button::new("🔄 Reload")).on_hover_text("F5").clicked() {
                app.reload_table();
            }
        });
    });
    ui.separator();

    let Some(dialog) = app.worker_dialog.as_mut() else {
        return;
    };
    let events = table_view::draw_table(dialog.widget_mut(), ui, "worker_activity_table");

    for event in events {
        match event {
            TableEvent::HeaderClicked(column) => {
                let result = app
                    .worker_dialog
                    .as_mut()
                    .map_or(Ok(()), |dialog| dialog.header_selected(column));
                app.handle_table_result(result);
            }
            TableEvent::RowClicked { index, additive } => {
                if let Some(dialog) = app.worker_dialog.as_mut() {
                    dialog.widget_mut().click_item(index, additive);
                }
            }
        }
    }
}
