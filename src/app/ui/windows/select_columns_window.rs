// src/app/ui/windows/select_columns_window.rs
// Contains the drawing function for the Select Columns window of a table dialog.

// --- Necessary imports ---
use crate::app::GridLiftApp;
use egui::{Align, Align2, Context, Layout, ScrollArea, Window};
use log::{error, info};

// --- Window Drawing Function ---

// Draws the "Select Columns" window for the open table dialog.
// Checkbox edits live in app.pending_visible_columns until OK is clicked;
// Cancel or the window's 'X' discards them.
//
// # Arguments
//
// * app - Mutable reference to the main application state (GridLiftApp).
// * ctx - The egui context (&egui::Context).
pub fn draw_select_columns_window(app: &mut GridLiftApp, ctx: &Context) {
    let mut window_open = app.show_select_columns_window;
    let mut ok_clicked = false;
    let mut cancel_clicked = false;

    let header: Vec<String> = app
        .worker_dialog
        .as_ref()
        .map(|dialog| dialog.header().to_vec())
        .unwrap_or_default();

    Window::new("Select Columns")
        .open(&mut window_open)
        .resizable(false)
        .collapsible(false)
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let Some(pending) = app.pending_visible_columns.as_mut() else {
                error!("Select Columns window drawn without pending state initialized!");
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    "Internal error: State not initialized.",
                );
                return;
            };

            ui.label("Select columns to display:");
            ui.separator();

            ScrollArea::vertical()
                .max_height(300.0)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (visible, label) in pending.iter_mut().zip(&header) {
                        ui.checkbox(visible, label.as_str());
                    }
                });

            ui.separator();
            ui.horizontal(|ui| {
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Cancel").clicked() {
                        cancel_clicked = true;
                    }
                    if ui.button("OK").clicked() {
                        ok_clicked = true;
                    }
                });
            });
        });

    // --- Post-Window Logic ---
    if ok_clicked {
        match app.pending_visible_columns.take() {
            Some(pending) => app.apply_visible_columns(pending),
            None => error!("OK clicked but pending_visible_columns was None!"),
        }
        window_open = false;
    } else if cancel_clicked {
        info!("Column selection cancelled.");
        window_open = false;
    } else if !window_open && app.show_select_columns_window {
        info!("Select Columns window closed via 'X'. Changes discarded.");
    }

    app.show_select_columns_window = window_open;
    if !app.show_select_columns_window {
        app.pending_visible_columns = None;
    }
}
