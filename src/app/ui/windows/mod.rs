// src/app/ui/windows/mod.rs
// Declares the modules for individual UI windows.

pub mod select_columns_window;
