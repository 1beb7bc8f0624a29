//! Domain events for name-resolution monitoring.

use std::net::IpAddr;
use std::time::Instant;

use super::ProtocolLabel;

/// A name-resolution or proxy-discovery request observed on the network.
///
/// This is the primary domain event that our system produces.
#[derive(Debug, Clone)]
pub struct ProtocolEvent {
    /// Timestamp when the event was observed
    pub observed_at: Instant,
    /// Sender address taken from the IPv4 header
    pub source_ip: IpAddr,
    /// Recognised protocol, always reportable
    pub label: ProtocolLabel,
    /// The name being asked for
    pub requested_name: String,
    /// Transport payload rendered as text, for diagnostics
    pub raw_payload_text: String,
}

impl ProtocolEvent {
    /// Create an event for a recognised protocol.
    ///
    /// Returns `None` for the generic transport labels, which are never
    /// published.
    pub fn new(
        source_ip: impl Into<IpAddr>,
        label: ProtocolLabel,
        requested_name: impl Into<String>,
        raw_payload: &[u8],
    ) -> Option<Self> {
        if !label.is_reportable() {
            return None;
        }

        Some(Self {
            observed_at: Instant::now(),
            source_ip: source_ip.into(),
            label,
            requested_name: requested_name.into(),
            raw_payload_text: String::from_utf8_lossy(raw_payload).into_owned(),
        })
    }

    /// Whether the requested name itself is the WPAD host.
    ///
    /// A host asking LLMNR/NetBIOS/mDNS for `wpad` is looking for a proxy
    /// configuration server and can be answered by a rogue one.
    pub fn is_wpad_lookup(&self) -> bool {
        self.label == ProtocolLabel::Wpad || self.requested_name.eq_ignore_ascii_case("wpad")
    }
}
