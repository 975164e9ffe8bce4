// BlueZ-backed transport: paired devices, adapter power and an RFCOMM serial link.

use super::{DisabledHandler, Subscription, Transport};
use crate::device::DeviceRecord;
use crate::error::TransportError;
use bluer::rfcomm::{SocketAddr, Stream};
use bluer::{Adapter, AdapterEvent, AdapterProperty, Address, Session};
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Runtime;

pub struct BluezTransport {
    runtime: Runtime,
    _session: Session, // Keeps the D-Bus connection alive for `adapter`
    adapter: Adapter,
    channel: u8,
    stream: Option<Stream>,
}

impl BluezTransport {
    /// Opens a BlueZ session on the default adapter. `channel` is the RFCOMM
    /// channel used for every connection.
    pub fn new(channel: u8) -> Result<Self, TransportError> {
        // One worker so the adapter event watcher keeps running between calls
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let (session, adapter) = runtime.block_on(async {
            let session = Session::new().await?;
            let adapter = session.default_adapter().await?;
            Ok::<_, bluer::Error>((session, adapter))
        })?;
        info!("Using Bluetooth adapter: {}", adapter.name());

        Ok(Self {
            runtime,
            _session: session,
            adapter,
            channel,
            stream: None,
        })
    }

    fn close_stream(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            self.runtime.block_on(stream.shutdown())?;
            debug!("RFCOMM stream shut down.");
        }
        Ok(())
    }
}

impl Transport for BluezTransport {
    fn list(&mut self) -> Result<Vec<DeviceRecord>, TransportError> {
        let adapter = &self.adapter;
        let devices = self.runtime.block_on(async {
            let mut devices = Vec::new();
            for address in adapter.device_addresses().await? {
                let device = adapter.device(address)?;
                if !device.is_paired().await? {
                    continue;
                }
                let name = device.alias().await?;
                devices.push(DeviceRecord::new(address.to_string(), name));
            }
            Ok::<_, bluer::Error>(devices)
        })?;
        debug!("BlueZ reports {} paired device(s).", devices.len());
        Ok(devices)
    }

    fn is_enabled(&mut self) -> Result<bool, TransportError> {
        Ok(self.runtime.block_on(self.adapter.is_powered())?)
    }

    fn enable(&mut self) -> Result<(), TransportError> {
        info!("Powering on Bluetooth adapter...");
        Ok(self.runtime.block_on(self.adapter.set_powered(true))?)
    }

    fn connect(&mut self, id: &str) -> Result<(), TransportError> {
        let address: Address = id
            .parse()
            .map_err(|_| TransportError::InvalidAddress(id.to_string()))?;

        if let Err(e) = self.close_stream() {
            warn!("Failed to close previous link: {}", e);
        }

        let target = SocketAddr::new(address, self.channel);
        let stream = self.runtime.block_on(Stream::connect(target))?;
        info!("RFCOMM link open to {} on channel {}.", address, self.channel);
        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.close_stream()
    }

    fn write(&mut self, data: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        self.runtime.block_on(async {
            stream.write_all(data.as_bytes()).await?;
            stream.flush().await
        })?;
        Ok(())
    }

    fn subscribe_adapter_disabled(
        &mut self,
        on_disabled: DisabledHandler,
    ) -> Result<Subscription, TransportError> {
        let events = self.runtime.block_on(self.adapter.events())?;
        let watcher = self.runtime.spawn(async move {
            let mut events = Box::pin(events);
            while let Some(event) = events.next().await {
                if let AdapterEvent::PropertyChanged(AdapterProperty::Powered(false)) = event {
                    info!("Adapter reported powered off.");
                    on_disabled();
                }
            }
        });
        Ok(Subscription::new(move || watcher.abort()))
    }
}

impl Drop for BluezTransport {
    fn drop(&mut self) {
        if let Err(e) = self.close_stream() {
            warn!("Failed to close link on shutdown: {}", e);
        }
    }
}
