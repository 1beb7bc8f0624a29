//! Protocol labels attached to classified traffic.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Label assigned to a classified packet.
///
/// `Udp` and `Tcp` are the generic transport labels a packet carries
/// before a specific protocol has been recognised. They are never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolLabel {
    Udp,
    Tcp,
    Llmnr,
    Mdns,
    NetBios,
    Wpad,
}

impl ProtocolLabel {
    /// Every label that can appear on a reported event.
    pub const REPORTABLE: [ProtocolLabel; 4] = [
        ProtocolLabel::Llmnr,
        ProtocolLabel::Mdns,
        ProtocolLabel::NetBios,
        ProtocolLabel::Wpad,
    ];

    /// Whether events with this label are published.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Udp | Self::Tcp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "UDP",
            Self::Tcp => "TCP",
            Self::Llmnr => "LLMNR",
            Self::Mdns => "mDNS",
            Self::NetBios => "NetBIOS",
            Self::Wpad => "WPAD",
        }
    }
}

impl fmt::Display for ProtocolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown protocol '{0}'")]
pub struct UnknownProtocol(pub String);

impl FromStr for ProtocolLabel {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            "llmnr" => Ok(Self::Llmnr),
            "mdns" => Ok(Self::Mdns),
            "netbios" | "nbns" => Ok(Self::NetBios),
            "wpad" => Ok(Self::Wpad),
            _ => Err(UnknownProtocol(s.to_string())),
        }
    }
}
