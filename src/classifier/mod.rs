//! Packet classification module.
//!
//! This module is responsible for turning one captured frame into at most
//! one `ProtocolEvent`, separate from capture or reporting.

mod packet_classifier;

pub use packet_classifier::{PacketClassifier, LLMNR_PORT, MDNS_PORT, NETBIOS_NS_PORT, WPAD_MARKER};
