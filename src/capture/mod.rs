//! Packet capture abstraction.
//!
//! This module defines the `PacketCapture` trait and provides a pnet-based
//! implementation. Sessions depend on the trait only, so tests drive them
//! with scripted frames.

mod interfaces;
mod pnet_capture;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use interfaces::{list_interfaces, CaptureInterface};
pub use pnet_capture::PnetCapture;
pub use session::{CaptureSession, SessionEnd};

use std::io;
use std::time::Duration;

use crate::error::CaptureError;

/// Snapshot length large enough for any full-size frame.
pub const SNAPSHOT_LEN: usize = 65536;

/// Options used when opening a live capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Receive frames not addressed to this host
    pub promiscuous: bool,
    /// Maximum time a read may block; `None` blocks until a frame arrives
    pub read_timeout: Option<Duration>,
    /// Receive buffer size in bytes
    pub buffer_size: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            promiscuous: true,
            read_timeout: None,
            buffer_size: SNAPSHOT_LEN,
        }
    }
}

/// An open capture handle yielding raw link-layer frames.
///
/// Dropping the receiver releases the handle.
pub trait FrameReceiver: Send {
    /// Block until the next frame arrives.
    ///
    /// The returned slice is only valid until the next call.
    fn next_frame(&mut self) -> io::Result<&[u8]>;
}

/// Trait for capture backends.
///
/// Allows the listener to depend on an abstraction rather than a concrete
/// implementation, so that it can be tested with scripted frames or backed
/// by a different capture library.
pub trait PacketCapture: Send + Sync {
    /// Open a live capture on the named interface.
    fn open(
        &self,
        interface: &str,
        options: &CaptureOptions,
    ) -> Result<Box<dyn FrameReceiver>, CaptureError>;
}
