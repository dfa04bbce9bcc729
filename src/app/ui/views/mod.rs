// src/app/ui/views/mod.rs
// Declares the view modules within the UI.

/// Renders a `TableModel` with egui_extras and reports header/row clicks.
pub mod table_view;

/// Draws a table dialog: its operation menu, fault banner and table.
pub mod dialog_view;
