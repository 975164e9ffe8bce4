use crate::device::DeviceRecord;

// Represents the current high-level state of the application UI
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum State {
    Initialising, // App is starting, loading config, issuing the mount actions
    Running,      // Main operational state, showing devices and controls
    About,        // Showing the about screen
}

/// Link state of the screen. The connected record only exists in `Connected`,
/// so at most one device is ever connected.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting, // Connect or disconnect in flight, writes are refused
    Connected(DeviceRecord),
}

impl ConnectionState {
    pub fn connected_device(&self) -> Option<&DeviceRecord> {
        match self {
            ConnectionState::Connected(device) => Some(device),
            _ => None,
        }
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "Idle"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected(device) => write!(f, "Connected({})", device.id),
        }
    }
}
