pub fn about() -> Vec<String> {
    vec![
        "Remote control for the L.A.M.P. Bluetooth lamp: pick a paired \
        device, switch the lamp on or off and set its colour.".to_string(),
        "\n".to_string(),
        "Commands are sent over the Bluetooth serial (RFCOMM) link as short \
        ASCII strings; the lamp does not acknowledge them.".to_string(),
        "Start with --simulate to try the interface without hardware.".to_string(),
        format!("Version: {}", env!("CARGO_PKG_VERSION")),
    ]
}
