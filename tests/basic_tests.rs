use lamp_remote::color::{ColorError, LampColor, LampCommand};
use lamp_remote::config::{AdapterWait, ConfigData, CONFIG_FILE_NAME};
use lamp_remote::device::{find_device_index, DeviceRecord};
use lamp_remote::state::{ConnectionState, State};
use lamp_remote::Config;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_config_data_default() {
    // Test that the default ConfigData is created correctly
    let config = ConfigData::default();

    assert_eq!(config.rfcomm_channel, 1);
    assert_eq!(config.enable_poll_interval_ms, 250);
    assert_eq!(config.enable_timeout_ms, 10_000);
}

#[test]
fn test_config_missing_keys_fall_back_to_defaults() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    std::fs::write(&path, "{ rfcomm_channel: 3 }").expect("write partial config");

    let config = Config::new(&path, ConfigData::default()).expect("load partial config");

    assert_eq!(config.data.rfcomm_channel, 3);
    assert_eq!(config.data.enable_poll_interval_ms, 250);
    assert_eq!(config.data.enable_timeout_ms, 10_000);
}

#[test]
fn test_adapter_wait_from_config() {
    let mut config = ConfigData::default();
    config.enable_poll_interval_ms = 0; // Clamped so polling never spins
    config.enable_timeout_ms = 1500;

    let wait = config.adapter_wait();
    assert_eq!(wait.poll_interval, Duration::from_millis(1));
    assert_eq!(wait.timeout, Duration::from_millis(1500));

    assert_eq!(AdapterWait::default(), ConfigData::default().adapter_wait());
}

#[test]
fn test_state_enum() {
    // Test that the State enum has the expected variants
    let initializing = State::Initialising;
    let about = State::About;
    let running = State::Running;

    assert_ne!(initializing, about);
    assert_ne!(initializing, running);
    assert_ne!(about, running);
    assert_eq!(running, State::Running);
}

#[test]
fn test_connection_state() {
    let lamp = DeviceRecord::new("A1", "Lamp1");

    assert_eq!(ConnectionState::default(), ConnectionState::Idle);
    assert_eq!(ConnectionState::Idle.connected_device(), None);
    assert_eq!(ConnectionState::Connecting.connected_device(), None);
    assert!(ConnectionState::Connecting.is_connecting());

    let connected = ConnectionState::Connected(lamp.clone());
    assert_eq!(connected.connected_device(), Some(&lamp));
    assert!(!connected.is_connecting());
    assert_eq!(format!("{}", connected), "Connected(A1)");
}

#[test]
fn test_device_record_display() {
    let device = DeviceRecord::new("98:D3:31:F5:2A:01", "Lamp1");
    assert_eq!(format!("{}", device), "Name: Lamp1 / 98:D3:31:F5:2A:01");
}

#[test]
fn test_find_device_index() {
    let devices = vec![DeviceRecord::new("A1", "Lamp1"), DeviceRecord::new("B2", "Lamp2")];

    assert_eq!(find_device_index(&devices, "B2"), Some(1));
    assert_eq!(find_device_index(&devices, "C3"), None);
    assert_eq!(find_device_index(&[], "A1"), None);
}

#[test]
fn test_fixed_commands() {
    assert_eq!(LampCommand::On.payload(), "999,");
    assert_eq!(LampCommand::Off.payload(), "998,");
    assert_eq!(LampCommand::On.label(), "Włącz");
    assert_eq!(LampCommand::Off.label(), "Wyłącz");
}

#[test]
fn test_color_hex_parsing() {
    assert_eq!(LampColor::from_hex("#ff8000"), Ok(LampColor::new(255, 128, 0)));
    assert_eq!(LampColor::from_hex("00FF7f"), Ok(LampColor::new(0, 255, 127)));

    assert_eq!(
        LampColor::from_hex("#fff"),
        Err(ColorError::BadLength("#fff".to_string()))
    );
    assert_eq!(
        LampColor::from_hex("#gg0000"),
        Err(ColorError::BadDigit("#gg0000".to_string()))
    );
    assert!(LampColor::from_hex("#ffą000").is_err());
}

#[test]
fn test_color_to_hex_and_command() {
    let color = LampColor::new(255, 8, 0);
    assert_eq!(color.to_hex(), "#ff0800");
    assert_eq!(format!("{}", color), "#ff0800");
    assert_eq!(color.command_string(), "255,8,0,");
    assert_eq!(LampColor::default().command_string(), "0,0,0,");
}

#[test]
fn test_color_from_color32() {
    let color = LampColor::from(eframe::egui::Color32::from_rgb(12, 34, 56));
    assert_eq!(color, LampColor::new(12, 34, 56));
    assert_eq!(color.to_color32(), eframe::egui::Color32::from_rgb(12, 34, 56));
}
