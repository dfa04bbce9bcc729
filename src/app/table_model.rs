// src/app/table_model.rs
// In-memory implementation of the TableWidget contract. The egui view renders it; the
// engine mutates it. Widths are in points and estimated from character counts.

use crate::app::{
    reconcile::{RowTint, TableWidget},
    state::SortIndicator,
};
use std::collections::BTreeSet;

/// Approximate width of one character of body text, in points.
const CHAR_WIDTH: f32 = 7.5;
/// Horizontal padding added to packed columns (room for the sort arrow).
const COLUMN_PADDING: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub label: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableItem {
    pub cells: Vec<String>,
    pub tint: Option<RowTint>,
}

#[derive(Debug, Clone, Default)]
pub struct TableModel {
    columns: Vec<TableColumn>,
    items: Vec<TableItem>,
    selection: BTreeSet<usize>,
    top_index: usize,
    sort_indicator: Option<SortIndicator>,
    redraw: bool,
    /// Bumped every time a redraw batch is committed.
    generation: u64,
    scroll_request: Option<usize>,
}

impl TableModel {
    pub fn new() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn item(&self, index: usize) -> Option<&TableItem> {
        self.items.get(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    /// Selects `index` alone, or toggles it when `additive` is set.
    pub fn click_item(&mut self, index: usize, additive: bool) {
        if index >= self.items.len() {
            return;
        }
        if additive {
            if !self.selection.remove(&index) {
                self.selection.insert(index);
            }
        } else {
            self.selection.clear();
            self.selection.insert(index);
        }
    }

    /// Records the first row the user can currently see.
    pub fn note_top_index(&mut self, index: usize) {
        self.top_index = index;
    }

    /// Takes a pending "scroll so this row is on top" request set by `set_top_index`.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_request.take()
    }

    pub fn redraw_enabled(&self) -> bool {
        self.redraw
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn content_width(&self, column: usize) -> f32 {
        let label = self.columns[column].label.chars().count();
        let widest_cell = self
            .items
            .iter()
            .filter_map(|item| item.cells.get(column))
            .map(|cell| cell.chars().count())
            .max()
            .unwrap_or(0);
        label.max(widest_cell) as f32 * CHAR_WIDTH + COLUMN_PADDING
    }
}

impl TableWidget for TableModel {
    fn add_column(&mut self, label: &str) {
        self.columns.push(TableColumn {
            label: label.to_string(),
            width: 0.0,
        });
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn pack_column(&mut self, column: usize) {
        if column < self.columns.len() {
            self.columns[column].width = self.content_width(column);
        }
    }

    fn set_column_width(&mut self, column: usize, width: f32) {
        if let Some(col) = self.columns.get_mut(column) {
            col.width = width.max(0.0);
        }
    }

    fn column_width(&self, column: usize) -> f32 {
        self.columns.get(column).map_or(0.0, |c| c.width)
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn append_item(&mut self, cells: &[String]) {
        self.items.push(TableItem {
            cells: cells.to_vec(),
            tint: None,
        });
    }

    fn set_item_text(&mut self, index: usize, cells: &[String]) {
        if let Some(item) = self.items.get_mut(index) {
            item.cells.clear();
            item.cells.extend_from_slice(cells);
        }
    }

    fn dispose_item(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.items.remove(index);
        // Selection follows the rows that moved up.
        self.selection = self
            .selection
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
    }

    fn set_item_tint(&mut self, index: usize, tint: Option<RowTint>) {
        if let Some(item) = self.items.get_mut(index) {
            item.tint = tint;
        }
    }

    fn set_redraw(&mut self, enabled: bool) {
        if enabled && !self.redraw {
            self.generation += 1;
        }
        self.redraw = enabled;
    }

    fn sort_indicator(&self) -> Option<SortIndicator> {
        self.sort_indicator
    }

    fn set_sort_indicator(&mut self, indicator: Option<SortIndicator>) {
        self.sort_indicator = indicator;
    }

    fn top_index(&self) -> usize {
        self.top_index
    }

    fn set_top_index(&mut self, index: usize) {
        self.top_index = index;
        self.scroll_request = Some(index);
    }

    fn selection(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    fn set_selection(&mut self, indices: &[usize]) {
        let count = self.items.len();
        self.selection = indices.iter().copied().filter(|&i| i < count).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn pack_fits_widest_cell_or_label() {
        let mut model = TableModel::new();
        model.add_column("id");
        model.append_item(&cells(&["12345678"]));
        model.pack_column(0);
        assert_eq!(model.column_width(0), 8.0 * CHAR_WIDTH + COLUMN_PADDING);
    }

    #[test]
    fn disposing_rows_shifts_selection() {
        let mut model = TableModel::new();
        model.add_column("name");
        for name in ["a", "b", "c", "d"] {
            model.append_item(&cells(&[name]));
        }
        model.set_selection(&[1, 3]);
        model.dispose_item(1);
        assert_eq!(model.selection(), vec![2]);
        assert_eq!(model.item(1).unwrap().cells, cells(&["c"]));
    }

    #[test]
    fn click_selects_or_toggles() {
        let mut model = TableModel::new();
        model.add_column("name");
        for name in ["a", "b", "c"] {
            model.append_item(&cells(&[name]));
        }
        model.click_item(0, false);
        model.click_item(2, true);
        assert_eq!(model.selection(), vec![0, 2]);
        model.click_item(2, true);
        assert_eq!(model.selection(), vec![0]);
        model.click_item(1, false);
        assert_eq!(model.selection(), vec![1]);
    }

    #[test]
    fn resuming_redraw_bumps_generation_once() {
        let mut model = TableModel::new();
        model.set_redraw(false);
        model.set_redraw(true);
        model.set_redraw(true);
        assert_eq!(model.generation(), 1);
    }
}
