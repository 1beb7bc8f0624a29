//! Capturable interface enumeration.
//!
//! A thin pass-through to `pnet::datalink`, with the naming and filtering
//! helpers the CLI needs to offer sensible choices.

use std::fmt;
use std::net::IpAddr;

use pnet::datalink::{self, NetworkInterface};

/// A network interface that can be opened for capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureInterface {
    /// System identifier passed to `Listener::start`
    pub name: String,
    /// Human-readable description, when the platform provides one
    pub description: Option<String>,
    /// Addresses assigned to the interface
    pub addresses: Vec<IpAddr>,
    pub is_up: bool,
    pub is_loopback: bool,
}

impl CaptureInterface {
    /// Whether the interface has an address a peer could reach.
    ///
    /// Loopback and link-local addresses do not count.
    pub fn has_routable_address(&self) -> bool {
        self.addresses.iter().any(|ip| !ip.is_loopback() && !is_link_local(ip))
    }

    /// Name to show to a user.
    ///
    /// On Windows interface names are opaque device paths, so the
    /// description is preferred there when one is available.
    pub fn friendly_name(&self) -> &str {
        match &self.description {
            Some(desc) if cfg!(windows) && !desc.is_empty() => desc,
            _ => &self.name,
        }
    }
}

impl From<NetworkInterface> for CaptureInterface {
    fn from(iface: NetworkInterface) -> Self {
        let description = (!iface.description.is_empty()).then(|| iface.description.clone());
        Self {
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
            addresses: iface.ips.iter().map(|net| net.ip()).collect(),
            name: iface.name,
            description,
        }
    }
}

impl fmt::Display for CaptureInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_up { "UP" } else { "DOWN" };
        let ips: Vec<_> = self.addresses.iter().map(|ip| ip.to_string()).collect();
        write!(
            f,
            "{}: {} [{}]",
            self.friendly_name(),
            status,
            if ips.is_empty() {
                "no IP".to_string()
            } else {
                ips.join(", ")
            }
        )?;
        if self.friendly_name() != self.name {
            write!(f, " ({})", self.name)?;
        }
        Ok(())
    }
}

/// List all interfaces known to the capture library.
pub fn list_interfaces() -> Vec<CaptureInterface> {
    datalink::interfaces()
        .into_iter()
        .map(CaptureInterface::from)
        .collect()
}

fn is_link_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_link_local(),
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
    }
}
