// Connection screen state. Every change goes through `Screen::update`,
// transport work leaves as `Effect`s and comes back as `Action`s.

use crate::color::{LampColor, LampCommand};
use crate::device::{find_device_index, DeviceRecord};
use crate::error::TransportError;
use crate::state::ConnectionState;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::collections::VecDeque;

pub const DEFAULT_DISPLAY_TEXT: &str = "L.A.M.P.";

pub const ADAPTER_OFF_TITLE: &str = "Moduł bluetooth jest wyłączony";
pub const ADAPTER_OFF_QUESTION: &str = "Chcesz włączyć moduł bluetooth?";
pub const CONNECT_FAILED_TITLE: &str = "Błąd połączenia";
pub const CONNECT_FAILED_MESSAGE: &str = "Nie można nawiązać połączenia!";
pub const ALREADY_CONNECTED_TITLE: &str = "Połączenie";

pub fn connected_text(device: &DeviceRecord) -> String {
    format!("Połączono z {}", device.name)
}

pub fn already_connected_text(device: &DeviceRecord) -> String {
    format!("Powiązane urządzenie {}", device.name)
}

/// Inputs to the screen: user intents and transport outcomes.
#[derive(Debug)]
pub enum Action {
    Mount,
    RefreshDevices,
    CheckAdapter,
    Connect(DeviceRecord),
    Disconnect,
    SendCommand(String),
    Command(LampCommand),
    ColorChanged(LampColor),
    ConfirmEnable,
    DeclineEnable,
    DismissNotice,

    DevicesListed(Result<Vec<DeviceRecord>, TransportError>),
    AdapterStatus(Result<bool, TransportError>),
    AdapterDisabled,
    AdapterEnabled(Result<(), TransportError>),
    ConnectFinished { ticket: u64, result: Result<(), TransportError> },
    DisconnectFinished { ticket: u64, result: Result<(), TransportError> },
    WriteFinished { payload: String, result: Result<(), TransportError> },
}

/// Transport work requested by the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListDevices,
    QueryAdapter,
    EnableAdapter,
    Connect { ticket: u64, id: String },
    Disconnect { ticket: u64 },
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTaskKind {
    Connect(DeviceRecord),
    Disconnect,
}

/// Single-slot token held while a connect or disconnect is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTask {
    pub ticket: u64,
    pub kind: LinkTaskKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Prompt {
    EnableAdapter,
}

#[derive(Debug, Clone)]
pub struct LastWrite {
    pub payload: String,
    pub at: DateTime<Local>,
}

#[derive(Debug)]
pub struct Screen {
    devices: Vec<DeviceRecord>,
    connection: ConnectionState,
    link_task: Option<LinkTask>,
    next_ticket: u64,
    selected_color: Option<LampColor>,
    display_text: String,
    prompt: Option<Prompt>,
    notices: VecDeque<Notice>,
    last_write: Option<LastWrite>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            connection: ConnectionState::Idle,
            link_task: None,
            next_ticket: 1,
            selected_color: None,
            display_text: DEFAULT_DISPLAY_TEXT.to_string(),
            prompt: None,
            notices: VecDeque::new(),
            last_write: None,
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn connected_device(&self) -> Option<&DeviceRecord> {
        self.connection.connected_device()
    }

    pub fn link_task(&self) -> Option<&LinkTask> {
        self.link_task.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.link_task.is_some()
    }

    pub fn selected_color(&self) -> Option<LampColor> {
        self.selected_color
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn last_write(&self) -> Option<&LastWrite> {
        self.last_write.as_ref()
    }

    /// Applies one action and returns the transport work it requires.
    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mount => vec![Effect::ListDevices, Effect::QueryAdapter],
            Action::RefreshDevices => vec![Effect::ListDevices],
            Action::CheckAdapter | Action::AdapterDisabled => vec![Effect::QueryAdapter],
            Action::Connect(device) => self.connect(device),
            Action::Disconnect => self.disconnect(),
            Action::SendCommand(payload) => self.send_command(payload),
            Action::Command(command) => self.send_command(command.payload().to_string()),
            Action::ColorChanged(color) => {
                self.selected_color = Some(color);
                self.send_command(color.command_string())
            }
            Action::ConfirmEnable => {
                if self.prompt.take() == Some(Prompt::EnableAdapter) {
                    vec![Effect::EnableAdapter]
                } else {
                    debug!("Enable confirmed without a pending prompt, ignoring.");
                    vec![]
                }
            }
            Action::DeclineEnable => {
                self.prompt = None;
                info!("User declined enabling the adapter.");
                vec![]
            }
            Action::DismissNotice => {
                self.notices.pop_front();
                vec![]
            }
            Action::DevicesListed(result) => {
                self.on_devices_listed(result);
                vec![]
            }
            Action::AdapterStatus(result) => {
                self.on_adapter_status(result);
                vec![]
            }
            Action::AdapterEnabled(Ok(())) => {
                info!("Adapter is up, refreshing paired devices.");
                vec![Effect::ListDevices]
            }
            Action::AdapterEnabled(Err(e)) => {
                warn!("Enabling the adapter failed: {}", e);
                vec![]
            }
            Action::ConnectFinished { ticket, result } => {
                self.on_connect_finished(ticket, result);
                vec![]
            }
            Action::DisconnectFinished { ticket, result } => {
                self.on_disconnect_finished(ticket, result);
                vec![]
            }
            Action::WriteFinished { payload, result } => {
                // A newer colour keeps its echo until its own write is done
                if self.selected_color.map(|c| c.command_string() == payload).unwrap_or(false) {
                    self.selected_color = None;
                }
                match result {
                    Ok(()) => {
                        self.last_write = Some(LastWrite {
                            payload,
                            at: Local::now(),
                        })
                    }
                    Err(e) => warn!("Write of {:?} failed, command lost: {}", payload, e),
                }
                vec![]
            }
        }
    }

    fn take_ticket(&mut self, kind: LinkTaskKind) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.link_task = Some(LinkTask { ticket, kind });
        ticket
    }

    // Hands back the held task if it matches `ticket`
    fn release_ticket(&mut self, ticket: u64) -> Option<LinkTask> {
        match &self.link_task {
            Some(task) if task.ticket == ticket => self.link_task.take(),
            Some(task) => {
                warn!("Ignoring outcome for ticket {}, holding ticket {}.", ticket, task.ticket);
                None
            }
            None => {
                warn!("Ignoring outcome for ticket {}, no link task held.", ticket);
                None
            }
        }
    }

    fn connect(&mut self, device: DeviceRecord) -> Vec<Effect> {
        if let Some(task) = &self.link_task {
            debug!("Connect to {} ignored, ticket {} in flight.", device.id, task.ticket);
            return vec![];
        }
        if self.connected_device().map(|d| d.id == device.id).unwrap_or(false) {
            self.raise(NoticeKind::Info, ALREADY_CONNECTED_TITLE, already_connected_text(&device));
            return vec![];
        }

        info!("Connecting to {}...", device);
        let id = device.id.clone();
        let ticket = self.take_ticket(LinkTaskKind::Connect(device));
        self.connection = ConnectionState::Connecting;
        vec![Effect::Connect { ticket, id }]
    }

    fn on_connect_finished(&mut self, ticket: u64, result: Result<(), TransportError>) {
        let Some(task) = self.release_ticket(ticket) else {
            return;
        };
        let LinkTaskKind::Connect(device) = task.kind else {
            warn!("Ticket {} belongs to a disconnect, not a connect.", ticket);
            self.connection = ConnectionState::Idle;
            return;
        };
        match result {
            Ok(()) => {
                info!("Connected to {}.", device);
                self.display_text = connected_text(&device);
                self.connection = ConnectionState::Connected(device);
            }
            Err(e) => {
                warn!("Connecting to {} failed: {}", device, e);
                self.connection = ConnectionState::Idle;
                self.raise(NoticeKind::Error, CONNECT_FAILED_TITLE, CONNECT_FAILED_MESSAGE.to_string());
            }
        }
    }

    fn disconnect(&mut self) -> Vec<Effect> {
        if let Some(task) = &self.link_task {
            debug!("Disconnect ignored, ticket {} in flight.", task.ticket);
            return vec![];
        }
        if self.connected_device().is_none() {
            debug!("Disconnect ignored, nothing connected.");
            return vec![];
        }

        info!("Disconnecting...");
        let ticket = self.take_ticket(LinkTaskKind::Disconnect);
        self.connection = ConnectionState::Connecting;
        vec![Effect::Disconnect { ticket }]
    }

    fn on_disconnect_finished(&mut self, ticket: u64, result: Result<(), TransportError>) {
        if self.release_ticket(ticket).is_none() {
            return;
        }
        // The link is treated as gone either way
        self.connection = ConnectionState::Idle;
        match result {
            Ok(()) => {
                info!("Disconnected.");
                self.display_text = DEFAULT_DISPLAY_TEXT.to_string();
            }
            Err(e) => warn!("Disconnect failed, dropping the link anyway: {}", e),
        }
    }

    fn send_command(&mut self, payload: String) -> Vec<Effect> {
        match &self.connection {
            ConnectionState::Connected(_) => {
                debug!("Sending {:?}.", payload);
                vec![Effect::Write(payload)]
            }
            state => {
                debug!("Dropping {:?}, link is {}.", payload, state);
                self.selected_color = None;
                vec![]
            }
        }
    }

    fn on_devices_listed(&mut self, result: Result<Vec<DeviceRecord>, TransportError>) {
        match result {
            Ok(devices) => {
                info!("Device list refreshed, {} paired device(s).", devices.len());
                self.devices = devices;
                if let Some(device) = self.connected_device() {
                    if find_device_index(&self.devices, &device.id).is_none() {
                        warn!("Connected device {} is no longer listed as paired.", device);
                    }
                }
            }
            Err(e) => warn!("Listing paired devices failed, keeping previous list: {}", e),
        }
    }

    fn on_adapter_status(&mut self, result: Result<bool, TransportError>) {
        match result {
            Ok(true) => debug!("Adapter is enabled."),
            Ok(false) => {
                info!("Adapter is disabled, asking the user to enable it.");
                if let ConnectionState::Connected(_) = self.connection {
                    self.connection = ConnectionState::Idle;
                }
                self.prompt = Some(Prompt::EnableAdapter);
            }
            Err(e) => warn!("Querying adapter state failed: {}", e),
        }
    }

    fn raise(&mut self, kind: NoticeKind, title: &str, message: String) {
        self.notices.push_back(Notice {
            kind,
            title: title.to_string(),
            message,
            raised_at: Local::now(),
        });
    }
}
