// Seam between the screen and the Bluetooth serial stack.

#[cfg(target_os = "linux")]
pub mod bluez;
pub mod sim;

use crate::device::DeviceRecord;
use crate::error::TransportError;

#[cfg(target_os = "linux")]
pub use bluez::BluezTransport;
pub use sim::{SimOp, SimTransport};

/// Callback fired when the adapter reports it was powered off.
pub type DisabledHandler = Box<dyn Fn() + Send + Sync + 'static>;

/// Blocking Bluetooth serial transport. Calls are made from the link worker
/// thread only, one at a time.
pub trait Transport: Send {
    /// Paired devices known to the adapter.
    fn list(&mut self) -> Result<Vec<DeviceRecord>, TransportError>;
    fn is_enabled(&mut self) -> Result<bool, TransportError>;
    /// Requests power-on. Returning does not mean the adapter is up yet.
    fn enable(&mut self) -> Result<(), TransportError>;
    /// Opens the serial link, dropping any link that is already open.
    fn connect(&mut self, id: &str) -> Result<(), TransportError>;
    fn disconnect(&mut self) -> Result<(), TransportError>;
    fn write(&mut self, data: &str) -> Result<(), TransportError>;
    /// Registers `on_disabled` until the returned guard is dropped.
    fn subscribe_adapter_disabled(
        &mut self,
        on_disabled: DisabledHandler,
    ) -> Result<Subscription, TransportError>;
}

/// Scoped listener registration. Dropping it releases the listener.
#[must_use = "dropping a Subscription releases the listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
