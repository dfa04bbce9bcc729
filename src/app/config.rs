// src/app/config.rs
// Defines configuration structures, constants, loading/saving logic, and the per-dialog
// settings store (column visibility, cyclic reload flag) used by table dialogs.

use chrono_tz::Tz;
use dotenvy::dotenv;
use log::{error, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    env,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, Mutex},
    time::Duration,
};

// --- Global Configuration Block ---
pub const SCRIPT_VERSION: &str = "0.1.0";
pub const APP_NAME: &str = "GridLift";
pub const DEFAULT_TZ: &str = "Europe/Vienna";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Delay before the first cyclic reload tick.
pub const CYCLIC_RELOAD_INITIAL_DELAY: Duration = Duration::from_secs(1);
/// Period between cyclic reload ticks.
pub const CYCLIC_RELOAD_PERIOD: Duration = Duration::from_secs(1);

// --- Configuration Structs ---

/// Configuration loaded initially from environment/.env for logger setup and defaults
#[derive(Clone, Debug)]
pub struct InitialConfig {
    pub log_level: LevelFilter,
    pub tz: Tz,
}

/// Persistently stored application settings using confy
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub log_level: String,
    pub tz: String,
    /// Column visibility per dialog type.
    pub visible_columns: BTreeMap<String, Vec<bool>>,
    /// Cyclic reload flag per dialog type.
    pub cyclic_reload: BTreeMap<String, bool>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let initial_config = load_initial_config();
        AppSettings {
            log_level: initial_config.log_level.to_string(),
            tz: initial_config.tz.name().to_string(),
            visible_columns: BTreeMap::new(),
            cyclic_reload: BTreeMap::new(),
        }
    }
}

/// Timing of the cyclic reload schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub initial_delay: Duration,
    pub period: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            initial_delay: CYCLIC_RELOAD_INITIAL_DELAY,
            period: CYCLIC_RELOAD_PERIOD,
        }
    }
}

// --- Settings Store ---

/// Per-dialog-type settings that outlive a single dialog instance.
///
/// Keys are stable dialog type names. All writers run on the UI thread; the
/// store is shared behind a mutex so the mismatch check below stays atomic.
pub trait SettingsStore: Send {
    fn visible_columns(&self, dialog: &str) -> Option<Vec<bool>>;
    fn set_visible_columns(&mut self, dialog: &str, visibles: Vec<bool>);
    fn remove_visible_columns(&mut self, dialog: &str);
    fn cyclic_reload(&self, dialog: &str) -> Option<bool>;
    fn set_cyclic_reload(&mut self, dialog: &str, enabled: bool);

    /// Returns the stored visibility vector if it has exactly `column_count`
    /// entries. A vector of any other length is discarded from the store.
    fn compatible_visible_columns(&mut self, dialog: &str, column_count: usize) -> Option<Vec<bool>> {
        let visibles = self.visible_columns(dialog)?;
        if visibles.len() != column_count {
            warn!(
                "Discarding stale column visibility for '{}': {} flags for {} columns.",
                dialog,
                visibles.len(),
                column_count
            );
            self.remove_visible_columns(dialog);
            return None;
        }
        Some(visibles)
    }
}

impl SettingsStore for AppSettings {
    fn visible_columns(&self, dialog: &str) -> Option<Vec<bool>> {
        self.visible_columns.get(dialog).cloned()
    }

    fn set_visible_columns(&mut self, dialog: &str, visibles: Vec<bool>) {
        self.visible_columns.insert(dialog.to_string(), visibles);
    }

    fn remove_visible_columns(&mut self, dialog: &str) {
        self.visible_columns.remove(dialog);
    }

    fn cyclic_reload(&self, dialog: &str) -> Option<bool> {
        self.cyclic_reload.get(dialog).copied()
    }

    fn set_cyclic_reload(&mut self, dialog: &str, enabled: bool) {
        self.cyclic_reload.insert(dialog.to_string(), enabled);
    }
}

/// Handle to the process-wide settings store, injected into every dialog.
pub type SharedSettings = Arc<Mutex<dyn SettingsStore>>;

// --- Configuration Loading Functions ---

/// Loads the *initial* configuration settings.
/// Priority: Environment Variables > .env file > Hardcoded Defaults.
/// This is primarily used for setting up the logger and providing defaults
/// before the persistent settings (`AppSettings`) are loaded by `confy`.
pub fn load_initial_config() -> InitialConfig {
    dotenv().ok();

    let tz_str = env::var("TZ").unwrap_or_else(|_| DEFAULT_TZ.to_string());
    let tz = Tz::from_str(&tz_str).unwrap_or_else(|err| {
        // eprintln: the logger may not be initialized yet
        eprintln!(
            "WARN: Invalid TZ '{}' from env/default. Falling back to UTC. Error: {}",
            tz_str, err
        );
        Tz::UTC
    });

    let log_level_str = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let log_level = LevelFilter::from_str(&log_level_str).unwrap_or_else(|err| {
        eprintln!(
            "WARN: Invalid LOG_LEVEL '{}' from env/default. Falling back to {}. Error: {}",
            log_level_str, DEFAULT_LOG_LEVEL, err
        );
        LevelFilter::Info
    });

    InitialConfig { log_level, tz }
}

/// Loads `AppSettings` with confy, storing defaults when the file is missing or unreadable.
/// Returns the settings and the config file path, if it could be determined.
pub fn load_settings() -> (AppSettings, Option<PathBuf>) {
    let config_path = confy::get_configuration_file_path(APP_NAME, None).ok();
    match confy::load::<AppSettings>(APP_NAME, None) {
        Ok(settings) => {
            info!("Successfully loaded settings from config file.");
            (settings, config_path)
        }
        Err(e) => {
            warn!("Failed to load config file ('{}'), using defaults: {}", APP_NAME, e);
            let settings = AppSettings::default();
            if let Err(store_err) = confy::store(APP_NAME, None, &settings) {
                error!("Failed to store default settings: {}", store_err);
            } else {
                info!("Stored default settings.");
            }
            (settings, config_path)
        }
    }
}

/// Saves settings to `path`, or to confy's default location for the app.
pub fn save_settings(settings: &AppSettings, path: Option<&Path>) -> Result<(), confy::ConfyError> {
    match path {
        Some(path) => confy::store_path(path, settings),
        None => confy::store(APP_NAME, None, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_settings() -> AppSettings {
        AppSettings {
            log_level: "INFO".to_string(),
            tz: "UTC".to_string(),
            visible_columns: BTreeMap::new(),
            cyclic_reload: BTreeMap::new(),
        }
    }

    #[test]
    fn compatible_vector_is_returned() {
        let mut settings = empty_settings();
        settings.set_visible_columns("demo", vec![true, false, true]);
        assert_eq!(
            settings.compatible_visible_columns("demo", 3),
            Some(vec![true, false, true])
        );
        assert!(settings.visible_columns("demo").is_some());
    }

    #[test]
    fn mismatched_vector_is_discarded_from_store() {
        let mut settings = empty_settings();
        settings.set_visible_columns("demo", vec![true, false, true]);
        assert_eq!(settings.compatible_visible_columns("demo", 4), None);
        assert_eq!(settings.visible_columns("demo"), None);
    }

    #[test]
    fn cyclic_flag_is_keyed_by_dialog() {
        let mut settings = empty_settings();
        settings.set_cyclic_reload("a", true);
        assert_eq!(settings.cyclic_reload("a"), Some(true));
        assert_eq!(settings.cyclic_reload("b"), None);
    }

    #[test]
    fn default_cadence_is_one_second() {
        let cadence = Cadence::default();
        assert_eq!(cadence.initial_delay, Duration::from_secs(1));
        assert_eq!(cadence.period, Duration::from_secs(1));
    }
}
