// src/app/ui/views/table_view.rs
// Renders a TableModel with egui_extras::TableBuilder. The model is only read here;
// clicks are returned as events so the dialog decides what they mean.

use crate::app::{reconcile::TableWidget, table_model::TableModel};
use egui::{Align, Button, Color32, RichText, Sense, TextStyle, Ui};
use egui_extras::{Column, TableBuilder};

/// Header height in points.
const HEADER_HEIGHT: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    HeaderClicked(usize),
    /// `additive` is set when the command/ctrl modifier was held.
    RowClicked { index: usize, additive: bool },
}

// Draws the table. Zero-width columns are hidden and skipped entirely.
//
// # Arguments
//
// * model - The table model to render. A pending scroll request is consumed.
// * ui - The egui UI to draw into.
// * id_salt - Unique id for egui's per-table state.
pub fn draw_table(model: &mut TableModel, ui: &mut Ui, id_salt: &str) -> Vec<TableEvent> {
    let mut events = Vec::new();
    let visible: Vec<usize> = (0..model.column_count())
        .filter(|&c| model.column_width(c) > 0.0)
        .collect();
    if visible.is_empty() {
        ui.label("All columns are hidden.");
        return events;
    }

    let row_height = ui.text_style_height(&TextStyle::Body);
    let scroll_request = model.take_scroll_request();
    let mut first_visible: Option<usize> = None;

    let mut builder = TableBuilder::new(ui)
        .id_salt(id_salt)
        .striped(true)
        .resizable(false)
        .sense(Sense::click());
    for &c in &visible {
        builder = builder.column(Column::exact(model.column_width(c)));
    }
    if let Some(row) = scroll_request {
        builder = builder.scroll_to_row(row, Some(Align::TOP));
    }

    let view = &*model;
    builder
        .header(HEADER_HEIGHT, |mut header| {
            for &c in &visible {
                header.col(|ui| {
                    let mut text = view.columns()[c].label.clone();
                    if let Some(indicator) = view.sort_indicator().filter(|i| i.column == c) {
                        text.push_str(indicator.direction.arrow());
                    }
                    if ui.add(Button::new(RichText::new(text).strong()).frame(false)).clicked() {
                        events.push(TableEvent::HeaderClicked(c));
                    }
                });
            }
        })
        .body(|body| {
            body.rows(row_height, view.item_count(), |mut row| {
                let index = row.index();
                first_visible.get_or_insert(index);
                let Some(item) = view.item(index) else {
                    return;
                };
                row.set_selected(view.is_selected(index));

                for &c in &visible {
                    row.col(|ui| {
                        if let Some(tint) = item.tint {
                            ui.painter().rect_filled(
                                ui.max_rect(),
                                0.0,
                                Color32::from_rgb(tint.r, tint.g, tint.b),
                            );
                        }
                        ui.label(item.cells.get(c).map_or("", String::as_str));
                    });
                }

                let response = row.response();
                if response.clicked() {
                    let additive = response.ctx.input(|i| i.modifiers.command);
                    events.push(TableEvent::RowClicked { index, additive });
                }
            });
        });

    // A pending scroll request was applied this frame; record only user scrolling.
    if let (Some(top), None) = (first_visible, scroll_request) {
        model.note_top_index(top);
    }
    events
}
