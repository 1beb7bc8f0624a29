//! Heimdall - passive listener for name-resolution leaks.
//!
//! Watches a network interface for LLMNR, mDNS and NetBIOS name queries and
//! WPAD configuration requests, the traffic that poisoning and rogue-proxy
//! attacks answer, and reports each one as a `ProtocolEvent`.

pub mod capture;
pub mod classifier;
pub mod config;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod filter;
pub mod listener;
pub mod reporter;
pub mod stream;

#[cfg(test)]
mod testutil;

pub use capture::{list_interfaces, CaptureInterface, PacketCapture, PnetCapture, SessionEnd};
pub use classifier::PacketClassifier;
pub use config::ListenerConfig;
pub use domain::{ProtocolEvent, ProtocolLabel};
pub use error::{CaptureError, ConfigError};
pub use filter::ProtocolFilter;
pub use listener::{Listener, SessionState};
pub use stream::EventStream;

const ELEVATED_PRIVILEGES_WARNING: &str =
    "Warning: This application must be run with elevated privileges";

/// Advisory shown before capturing.
///
/// Opening a live capture needs root (or CAP_NET_RAW) on Unix and
/// Administrator rights on Windows. Nothing here checks or enforces that.
pub fn check_elevated_privileges() -> &'static str {
    ELEVATED_PRIVILEGES_WARNING
}
