// src/main.rs
// Entry point for GridLift. Loads settings, sets up the logger that mirrors INFO lines into
// the UI's log panel, and starts the eframe window.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use chrono::Local;
use chrono_tz::Tz;
use eframe::egui;
use gridlift::app::{
    config::{self, DEFAULT_LOG_LEVEL, APP_NAME, SCRIPT_VERSION},
    state::UpdateMessage,
    GridLiftApp,
};
use log::{info, warn, LevelFilter};
use std::{
    str::FromStr,
    sync::mpsc::{channel, Sender},
};

// --- Logger Setup ---

// Initializes env_logger with a timezone-aware format. INFO and more severe lines are
// also sent to the UI through `logger_sender`.
//
// # Arguments
//
// * level - Level from the persistent settings. Debug builds always log at TRACE.
// * tz - Timezone used for the timestamp.
// * logger_sender - Channel to the UI thread.
fn init_logger(level: LevelFilter, tz: Tz, logger_sender: Sender<UpdateMessage>) {
    let log_level_to_init = if cfg!(debug_assertions) { LevelFilter::Trace } else { level };
    env_logger::Builder::new()
        .filter_level(log_level_to_init)
        .format(move |buf, record| {
            use std::io::Write;
            let now = Local::now().with_timezone(&tz);
            let log_msg = format!(
                "[{}] [{}] {}",
                now.format("%Y-%m-%d %H:%M:%S %Z"),
                record.level(),
                record.args()
            );
            if record.level() <= LevelFilter::Info {
                let _ = logger_sender.send(UpdateMessage::Log(log_msg.clone()));
            }
            writeln!(buf, "{}", log_msg)
        })
        .init();
}

fn main() -> Result<(), eframe::Error> {
    let (settings, config_path) = config::load_settings();
    let (update_sender, update_receiver) = channel();

    let log_level = LevelFilter::from_str(&settings.log_level).unwrap_or_else(|_| {
        eprintln!(
            "WARN: Invalid LOG_LEVEL '{}' in settings. Falling back to {}.",
            settings.log_level, DEFAULT_LOG_LEVEL
        );
        LevelFilter::Info
    });
    let (tz, tz_invalid) = match Tz::from_str(&settings.tz) {
        Ok(tz) => (tz, false),
        Err(_) => (Tz::UTC, true),
    };
    init_logger(log_level, tz, update_sender.clone());

    info!("--- {} v{} Starting ---", APP_NAME, SCRIPT_VERSION);
    if tz_invalid {
        warn!("Invalid TZ '{}' in settings, logger falling back to UTC.", settings.tz);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(GridLiftApp::new(
                cc,
                settings,
                config_path,
                update_sender,
                update_receiver,
            )))
        }),
    )
}
