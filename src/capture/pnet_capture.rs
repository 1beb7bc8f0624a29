//! pnet-based packet capture implementation.

use std::io;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};

use super::{CaptureOptions, FrameReceiver, PacketCapture};
use crate::error::CaptureError;

/// Packet capture using the pnet library.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnetCapture;

impl PnetCapture {
    /// Create a new pnet capture backend.
    pub fn new() -> Self {
        Self
    }

    fn find_interface(name: &str) -> Result<NetworkInterface, CaptureError> {
        datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| CaptureError::InterfaceNotFound(name.to_string()))
    }
}

impl PacketCapture for PnetCapture {
    fn open(
        &self,
        interface: &str,
        options: &CaptureOptions,
    ) -> Result<Box<dyn FrameReceiver>, CaptureError> {
        let iface = Self::find_interface(interface)?;

        let config = Config {
            read_buffer_size: options.buffer_size,
            read_timeout: options.read_timeout,
            promiscuous: options.promiscuous,
            ..Config::default()
        };

        match datalink::channel(&iface, config) {
            Ok(Channel::Ethernet(_tx, rx)) => Ok(Box::new(PnetReceiver { rx })),
            Ok(_) => Err(CaptureError::UnsupportedChannel(interface.to_string())),
            Err(e) => Err(open_error(interface, e)),
        }
    }
}

/// Map a failed `datalink::channel` call to a capture error, keeping the
/// underlying cause.
fn open_error(interface: &str, e: io::Error) -> CaptureError {
    let message = e.to_string();
    if e.kind() == io::ErrorKind::PermissionDenied
        || message.contains("permission")
        || message.contains("Operation not permitted")
    {
        return CaptureError::InsufficientPermissions {
            interface: interface.to_string(),
            message,
        };
    }
    CaptureError::ChannelCreation {
        interface: interface.to_string(),
        message,
    }
}

/// Receiving half of a pnet datalink channel.
struct PnetReceiver {
    rx: Box<dyn DataLinkReceiver>,
}

impl FrameReceiver for PnetReceiver {
    fn next_frame(&mut self) -> io::Result<&[u8]> {
        self.rx.next()
    }
}
