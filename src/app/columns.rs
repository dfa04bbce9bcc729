// src/app/columns.rs
// Column widths: hidden columns collapse to zero width, visible ones are auto-fitted.

use crate::app::{
    config::SettingsStore,
    reconcile::{RedrawSuspended, TableWidget},
};

/// Applies `visibles` to the widget's columns inside one redraw batch.
///
/// `None`, or a vector whose length differs from the column count, shows every
/// column. Hidden columns keep their index, so sorting and data access are unaffected.
pub fn apply_widths(widget: &mut dyn TableWidget, visibles: Option<&[bool]>) {
    let mut widget = RedrawSuspended::new(widget);
    let count = widget.column_count();
    let visibles = visibles.filter(|v| v.len() == count);

    for column in 0..count {
        if visibles.map_or(true, |v| v[column]) {
            widget.pack_column(column);
        } else {
            widget.set_column_width(column, 0.0);
        }
    }
}

/// Looks up the dialog's stored visibility (discarding it if stale) and applies it.
pub fn pack_columns(widget: &mut dyn TableWidget, store: &mut dyn SettingsStore, dialog: &str) {
    let count = widget.column_count();
    let visibles = store.compatible_visible_columns(dialog, count);
    apply_widths(widget, visibles.as_deref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{config::AppSettings, table_model::TableModel};

    fn widget(columns: usize) -> TableModel {
        let mut widget = TableModel::new();
        for c in 0..columns {
            widget.add_column(&format!("column {c}"));
        }
        widget.append_item(&vec!["some wide cell content".to_string(); columns]);
        widget
    }

    #[test]
    fn hidden_columns_get_zero_width() {
        let mut w = widget(3);
        apply_widths(&mut w, Some(&[true, false, true]));
        assert!(w.column_width(0) > 0.0);
        assert_eq!(w.column_width(1), 0.0);
        assert!(w.column_width(2) > 0.0);
        assert!(w.redraw_enabled());
    }

    #[test]
    fn stale_vector_is_discarded_and_all_columns_fit() {
        let mut settings = AppSettings::default();
        settings.visible_columns.insert("dialog".to_string(), vec![false, false, false]);

        let mut w = widget(4);
        pack_columns(&mut w, &mut settings, "dialog");

        assert!((0..4).all(|c| w.column_width(c) > 0.0));
        assert!(!settings.visible_columns.contains_key("dialog"));
    }

    #[test]
    fn missing_vector_shows_everything() {
        let mut settings = AppSettings::default();
        let mut w = widget(2);
        pack_columns(&mut w, &mut settings, "other");
        assert!((0..2).all(|c| w.column_width(c) > 0.0));
    }
}
