#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::process::exit;
// External Crate Imports (only those needed directly in main.rs)
use clap::Parser;
use eframe::egui;
use fast_config::Config;

// Internal Imports
use lamp_remote::config::{default_config_path, ConfigData};
use lamp_remote::transport::{SimTransport, Transport};
use lamp_remote::{Args, LampRemote, INITIAL_HEIGHT, INITIAL_WIDTH, PROGRAM_TITLE};

fn load_config(path: &str) -> Config<ConfigData> {
    match Config::new(path, ConfigData::default()) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Error creating config file at {}: {}", path, e);
            exit(1)
        }
    }
}

#[cfg(target_os = "linux")]
fn open_transport(args: &Args, config: &ConfigData) -> Box<dyn Transport> {
    if args.simulate {
        log::info!("Using simulated lamps.");
        return Box::new(SimTransport::demo());
    }
    match lamp_remote::transport::BluezTransport::new(config.rfcomm_channel) {
        Ok(transport) => Box::new(transport),
        Err(e) => {
            log::error!("Bluetooth unavailable ({}), falling back to simulated lamps.", e);
            Box::new(SimTransport::demo())
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn open_transport(args: &Args, _config: &ConfigData) -> Box<dyn Transport> {
    if !args.simulate {
        log::warn!("No Bluetooth serial backend on this platform, using simulated lamps.");
    }
    Box::new(SimTransport::demo())
}

// Application Entry Point
fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    log::info!("Starting {}", PROGRAM_TITLE);

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path);
    let transport = open_transport(&args, &config.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WIDTH, INITIAL_HEIGHT])
            .with_title(PROGRAM_TITLE), // Set window title here
        ..Default::default()
    };

    eframe::run_native(
        PROGRAM_TITLE, // Used for window title if not set in viewport
        options,
        Box::new(move |_cc| Ok(Box::new(LampRemote::new(config, transport)))), // Create the app instance
    )
}
