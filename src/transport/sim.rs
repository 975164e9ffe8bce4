use super::{DisabledHandler, Subscription, Transport};
use crate::device::DeviceRecord;
use crate::error::TransportError;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Operations of the simulated transport, used for failure injection and call counting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SimOp {
    List,
    IsEnabled,
    Enable,
    Connect,
    Disconnect,
    Write,
}

struct SimState {
    devices: Vec<DeviceRecord>,
    enabled: bool,
    enable_latency: u32,   // Polls still answering `false` after enable()
    pending_polls: u32,
    connect_delay: Duration,
    connected: Option<String>,
    written: Vec<String>,
    failing: HashSet<SimOp>,
    calls: HashMap<SimOp, usize>,
    listeners: Vec<(u64, Arc<DisabledHandler>)>,
    next_listener: u64,
}

/// In-memory transport. Clones share the same state, so a test can keep one
/// handle while the link worker owns another.
#[derive(Clone)]
pub struct SimTransport {
    inner: Arc<Mutex<SimState>>,
}

impl SimTransport {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimState {
                devices,
                enabled: true,
                enable_latency: 0,
                pending_polls: 0,
                connect_delay: Duration::ZERO,
                connected: None,
                written: Vec::new(),
                failing: HashSet::new(),
                calls: HashMap::new(),
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// A couple of lamps for running the UI without hardware.
    pub fn demo() -> Self {
        Self::new(vec![
            DeviceRecord::new("98:D3:31:F5:2A:01", "Lamp1"),
            DeviceRecord::new("98:D3:31:F5:2A:02", "Lamp2"),
            DeviceRecord::new("00:21:13:00:4B:7C", "HC-05"),
        ])
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        // A panicking test thread must not wedge the others
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every future call of `op` fail (or succeed again).
    pub fn set_failing(&self, op: SimOp, failing: bool) {
        let mut state = self.state();
        if failing {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    pub fn set_devices(&self, devices: Vec<DeviceRecord>) {
        self.state().devices = devices;
    }

    /// Number of `is_enabled` polls that still report `false` after `enable()`.
    pub fn set_enable_latency(&self, polls: u32) {
        self.state().enable_latency = polls;
    }

    /// Makes `connect` block for `delay`, like a slow RFCOMM handshake.
    pub fn set_connect_delay(&self, delay: Duration) {
        self.state().connect_delay = delay;
    }

    /// Flips adapter power. Powering off drops the link and notifies listeners.
    pub fn set_enabled(&self, enabled: bool) {
        let handlers: Vec<Arc<DisabledHandler>> = {
            let mut state = self.state();
            let was_enabled = state.enabled;
            state.enabled = enabled;
            if enabled || !was_enabled {
                return;
            }
            state.connected = None;
            state.listeners.iter().map(|(_, h)| h.clone()).collect()
        };
        info!("Simulated adapter powered off, notifying {} listener(s).", handlers.len());
        for handler in handlers {
            (**handler)();
        }
    }

    pub fn calls(&self, op: SimOp) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn written(&self) -> Vec<String> {
        self.state().written.clone()
    }

    pub fn connected(&self) -> Option<String> {
        self.state().connected.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state().listeners.len()
    }

    // Counts the call and applies injected failures
    fn enter(&self, op: SimOp) -> Result<MutexGuard<'_, SimState>, TransportError> {
        let mut state = self.state();
        *state.calls.entry(op).or_insert(0) += 1;
        if state.failing.contains(&op) {
            debug!("Simulated {:?} failure.", op);
            return Err(TransportError::Rejected(format!("simulated {:?} failure", op)));
        }
        Ok(state)
    }
}

impl Transport for SimTransport {
    fn list(&mut self) -> Result<Vec<DeviceRecord>, TransportError> {
        let state = self.enter(SimOp::List)?;
        Ok(state.devices.clone())
    }

    fn is_enabled(&mut self) -> Result<bool, TransportError> {
        let mut state = self.enter(SimOp::IsEnabled)?;
        if state.pending_polls > 0 {
            state.pending_polls -= 1;
            if state.pending_polls == 0 {
                state.enabled = true;
            }
            return Ok(false);
        }
        Ok(state.enabled)
    }

    fn enable(&mut self) -> Result<(), TransportError> {
        let mut state = self.enter(SimOp::Enable)?;
        if state.enabled {
            return Ok(());
        }
        if state.enable_latency == 0 {
            state.enabled = true;
        } else {
            state.pending_polls = state.enable_latency;
        }
        Ok(())
    }

    fn connect(&mut self, id: &str) -> Result<(), TransportError> {
        let delay = self.state().connect_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let mut state = self.enter(SimOp::Connect)?;
        if !state.enabled {
            return Err(TransportError::Rejected("adapter is powered off".to_string()));
        }
        if !state.devices.iter().any(|d| d.id == id) {
            return Err(TransportError::InvalidAddress(id.to_string()));
        }
        state.connected = Some(id.to_string());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        let mut state = self.enter(SimOp::Disconnect)?;
        state.connected = None;
        Ok(())
    }

    fn write(&mut self, data: &str) -> Result<(), TransportError> {
        let mut state = self.enter(SimOp::Write)?;
        if state.connected.is_none() {
            return Err(TransportError::NotConnected);
        }
        state.written.push(data.to_string());
        Ok(())
    }

    fn subscribe_adapter_disabled(
        &mut self,
        on_disabled: DisabledHandler,
    ) -> Result<Subscription, TransportError> {
        let id = {
            let mut state = self.state();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push((id, Arc::new(on_disabled)));
            id
        };
        let inner = self.inner.clone();
        Ok(Subscription::new(move || {
            let mut state = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            state.listeners.retain(|(listener, _)| *listener != id);
        }))
    }
}
