use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "lamp_remote.json";

// Configuration data saved to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(default = "default_rfcomm_channel")] // Ensure field exists even if missing in JSON
    pub rfcomm_channel: u8,
    #[serde(default = "default_enable_poll_interval_ms")]
    pub enable_poll_interval_ms: u64,
    #[serde(default = "default_enable_timeout_ms")]
    pub enable_timeout_ms: u64,
}

fn default_rfcomm_channel() -> u8 {
    1 // Serial Port Profile on most HC-05 style modules
}

fn default_enable_poll_interval_ms() -> u64 {
    250
}

fn default_enable_timeout_ms() -> u64 {
    10_000
}

// Default values for a new configuration
impl Default for ConfigData {
    fn default() -> Self {
        Self {
            rfcomm_channel: default_rfcomm_channel(),
            enable_poll_interval_ms: default_enable_poll_interval_ms(),
            enable_timeout_ms: default_enable_timeout_ms(),
        }
    }
}

impl ConfigData {
    /// Timing used by the worker while waiting for the adapter to power up.
    pub fn adapter_wait(&self) -> AdapterWait {
        AdapterWait {
            poll_interval: Duration::from_millis(self.enable_poll_interval_ms.max(1)),
            timeout: Duration::from_millis(self.enable_timeout_ms),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AdapterWait {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for AdapterWait {
    fn default() -> Self {
        ConfigData::default().adapter_wait()
    }
}

/// Resolves the config file location, falling back to the current dir.
pub fn default_config_path() -> String {
    let config_dir = dirs::config_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    format!("{}/{}", config_dir, CONFIG_FILE_NAME)
}
