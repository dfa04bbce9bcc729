// src/lib.rs
// Library root of GridLift: the table dialog engine and its egui front end.

pub mod app;
