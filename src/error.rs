use std::time::Duration;

/// Failure of a single transport call. Every variant is recoverable: the
/// screen turns it into an outcome action and carries on.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no device connected")]
    NotConnected,

    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    #[error("adapter did not report powered within {0:?}")]
    EnableTimeout(Duration),

    #[error("operation rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(target_os = "linux")]
    #[error(transparent)]
    Bluez(#[from] bluer::Error),
}
