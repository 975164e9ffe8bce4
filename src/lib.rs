// Export modules for testing
pub mod about;
pub mod color;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod link_worker;
pub mod screen;
pub mod state;
pub mod transport;
pub mod ui;

// Re-export main struct and types for testing
pub use crate::color::{LampColor, LampCommand};
pub use crate::config::ConfigData;
pub use crate::controller::Controller;
pub use crate::device::DeviceRecord;
pub use crate::error::TransportError;
pub use crate::screen::{Action, Effect, Screen};
pub use crate::state::{ConnectionState, State};

// Constants
pub const PROGRAM_TITLE: &str = "L.A.M.P. - Remote";
pub const INITIAL_WIDTH: f32 = 420.0;
pub const INITIAL_HEIGHT: f32 = 560.0;
pub const SHUTDOWN_SETTLE: Duration = Duration::from_secs(2);

// Args struct for command line parsing
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Use simulated lamps instead of the Bluetooth adapter
    #[arg(short, long, default_value_t = false)]
    pub simulate: bool,

    /// Config file location (defaults to the user config dir)
    #[arg(short, long)]
    pub config: Option<String>,
}

// Wrapper for ConfigData to match the actual structure
pub use fast_config::Config;

use eframe::egui::Color32;
use std::time::Duration;

// The main application struct
pub struct LampRemote {
    // State
    pub state: State,

    // Screen state plus the worker driving the transport
    pub controller: Controller,

    // Colour picker widget value, kept between frames
    pub picker_color: Color32,
    pub hex_input: String,

    // Configuration
    pub config: Config<ConfigData>,
}

// Implementations for LampRemote
impl LampRemote {
    pub fn new(config: Config<ConfigData>, transport: Box<dyn transport::Transport>) -> Self {
        let controller = Controller::new(transport, config.data.adapter_wait());
        Self {
            state: State::Initialising,
            controller,
            picker_color: Color32::WHITE,
            hex_input: String::new(),
            config,
        }
    }

    // Initialization logic called once at the start
    pub fn init(&mut self) {
        self.controller.dispatch(Action::Mount);
        self.state = State::Running;
        log::info!("Initialization complete. State set to Running.");
    }

    // Graceful shutdown logic
    pub fn shutdown_app(&mut self) {
        log::info!("Shutdown requested.");
        if self.controller.screen().connected_device().is_some() {
            self.controller.dispatch(Action::Disconnect);
        }
        // A connect can block for as long as the RFCOMM handshake takes,
        // so the worker is only joined when it went idle in time
        if self.controller.settle(SHUTDOWN_SETTLE) {
            self.controller.shutdown();
        } else {
            log::warn!("Link worker still busy after {:?}, not waiting for it.", SHUTDOWN_SETTLE);
            self.controller.detach();
        }

        // Save configuration
        if let Err(e) = self.config.save() {
            log::error!("Failed to save configuration on exit: {}", e);
        } else {
            log::info!("Configuration saved.");
        }
        log::info!("Shutdown complete.");
    }
}
