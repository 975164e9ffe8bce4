// Represents a paired device as reported by the transport
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DeviceRecord {
    pub id: String,   // Transport address, unique per device
    pub name: String, // Display name (alias)
}

impl DeviceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// How the device is displayed in the list
impl std::fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Name: {} / {}", self.name, self.id)
    }
}

/// Finds the position of a device in `device_list` by its transport id.
pub fn find_device_index(device_list: &[DeviceRecord], id: &str) -> Option<usize> {
    device_list.iter().position(|d| d.id == id)
}
