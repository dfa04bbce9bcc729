// src/app/ui/widgets.rs
// Contains drawing functions for reusable UI widgets, such as the log view content area.

use crate::app::GridLiftApp;
use egui::{Align, Layout, RichText, ScrollArea, TextWrapMode, Ui};

// --- Widget Drawing Functions ---

// Draws the content area for the collapsible log view.
// Called within a CollapsingHeader in the bottom panel.
//
// # Arguments
//
// * app - Mutable reference to the main application state (GridLiftApp).
// * ui - Mutable reference to the egui UI context for drawing.
pub fn draw_log_view_content(app: &mut GridLiftApp, ui: &mut Ui) {
    ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.with_layout(Layout::top_down(Align::LEFT), |ui| {
                ui.add(
                    egui::Label::new(RichText::new(&app.logs_string_cache).monospace())
                        .wrap_mode(TextWrapMode::Extend),
                );
            });
        });
}

// Draws a dismissible banner for the last table fault, if any.
pub fn draw_fault_banner(app: &mut GridLiftApp, ui: &mut Ui) {
    let Some(fault) = app.table_fault.as_deref() else {
        return;
    };
    let mut dismissed = false;
    ui.horizontal(|ui| {
        ui.colored_label(ui.visuals().error_fg_color, format!("Table error: {}", fault));
        if ui.small_button("Dismiss").clicked() {
            dismissed = true;
        }
    });
    if dismissed {
        app.table_fault = None;
    }
    ui.separator();
}
