//! Domain models for name-resolution leak detection.
//!
//! This module contains the core domain types that are independent
//! of any capture or presentation concerns.

mod events;
mod protocol;

pub use events::ProtocolEvent;
pub use protocol::{ProtocolLabel, UnknownProtocol};
