// tests/settings_store_tests.rs
// Persistence of per-dialog settings through confy files.

mod common;

use gridlift::app::config::{self, AppSettings, SettingsStore, SharedSettings};
use std::{
    fs,
    sync::{Arc, Mutex},
};
use tempfile::tempdir;

#[test]
fn settings_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gridlift.toml");
    let mut settings = common::empty_settings();
    settings.set_visible_columns("workers", vec![true, false, true]);
    settings.set_cyclic_reload("workers", true);
    settings.set_cyclic_reload("other", false);

    config::save_settings(&settings, Some(&path)).unwrap();
    let loaded: AppSettings = confy::load_path(&path).unwrap();

    assert_eq!(loaded, settings);
    assert_eq!(loaded.visible_columns("workers"), Some(vec![true, false, true]));
    assert_eq!(loaded.cyclic_reload("other"), Some(false));
    assert_eq!(loaded.cyclic_reload("missing"), None);
}

#[test]
fn missing_sections_fall_back_to_empty_maps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "log_level = \"DEBUG\"\n").unwrap();

    let loaded: AppSettings = confy::load_path(&path).unwrap();

    assert_eq!(loaded.log_level, "DEBUG");
    assert!(loaded.visible_columns.is_empty());
    assert!(loaded.cyclic_reload.is_empty());
}

#[test]
fn shared_store_writes_are_visible_to_the_owner() {
    let settings = Arc::new(Mutex::new(common::empty_settings()));
    let shared: SharedSettings = settings.clone();

    shared.lock().unwrap().set_visible_columns("workers", vec![true, true]);
    let stale = shared.lock().unwrap().compatible_visible_columns("workers", 3);

    assert_eq!(stale, None);
    assert!(settings.lock().unwrap().visible_columns.is_empty());
}
