//! Frame classification logic.

use std::net::Ipv4Addr;

use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;
use pnet::packet::vlan::VlanPacket;
use pnet::packet::Packet;

use crate::decoder::{decode_llmnr_name, decode_mdns_name, decode_netbios_name};
use crate::domain::{ProtocolEvent, ProtocolLabel};

/// LLMNR port
pub const LLMNR_PORT: u16 = 5355;
/// mDNS port
pub const MDNS_PORT: u16 = 5353;
/// NetBIOS Name Service port
pub const NETBIOS_NS_PORT: u16 = 137;

/// Byte sequence marking a WPAD configuration request in a TCP stream.
pub const WPAD_MARKER: &[u8] = b"wpad.dat";

/// Name reported for WPAD requests.
const WPAD_REQUEST_NAME: &str = "wpad.dat request";

/// Classifies captured frames into protocol events.
///
/// Stateless: every frame is judged on its own, with no correlation
/// across packets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketClassifier;

impl PacketClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify an Ethernet frame.
    ///
    /// Returns `Some(ProtocolEvent)` if the frame is LLMNR, mDNS, NetBIOS
    /// or WPAD traffic carried over IPv4, `None` otherwise.
    pub fn classify(&self, frame: &[u8]) -> Option<ProtocolEvent> {
        let ethernet = EthernetPacket::new(frame)?;

        match ethernet.get_ethertype() {
            EtherTypes::Ipv4 => self.classify_ipv4(ethernet.payload()),
            EtherTypes::Vlan => {
                let vlan = VlanPacket::new(ethernet.payload())?;
                if vlan.get_ethertype() != EtherTypes::Ipv4 {
                    return None;
                }
                self.classify_ipv4(vlan.payload())
            }
            _ => None,
        }
    }

    /// Classify a bare IPv4 packet.
    pub fn classify_ipv4(&self, data: &[u8]) -> Option<ProtocolEvent> {
        let ipv4 = Ipv4Packet::new(data)?;

        // Later fragments carry no transport header
        if ipv4.get_fragment_offset() != 0 {
            return None;
        }

        let source = ipv4.get_source();

        match ipv4.get_next_level_protocol() {
            IpNextHeaderProtocols::Udp => {
                let udp = UdpPacket::new(ipv4.payload())?;
                let payload = udp.payload();
                let (label, name) =
                    self.classify_udp(udp.get_source(), udp.get_destination(), payload);
                Self::event(source, label, name, payload)
            }
            IpNextHeaderProtocols::Tcp => {
                let tcp = TcpPacket::new(ipv4.payload())?;
                let payload = tcp.payload();
                let (label, name) = self.classify_tcp(payload);
                Self::event(source, label, name, payload)
            }
            _ => None,
        }
    }

    /// Label a UDP payload by port and decoded name.
    ///
    /// The port checks are independent: when a datagram matches more than
    /// one, the last successful decode (LLMNR, then mDNS, then NetBIOS)
    /// decides the label and name. A matching port whose decode is empty
    /// changes nothing, so a lone 5355 datagram without a name stays `Udp`.
    pub fn classify_udp(
        &self,
        src_port: u16,
        dst_port: u16,
        payload: &[u8],
    ) -> (ProtocolLabel, String) {
        let on_port = |port: u16| src_port == port || dst_port == port;

        let mut label = ProtocolLabel::Udp;
        let mut name = String::new();

        let checks: [(u16, ProtocolLabel, fn(&[u8]) -> String); 3] = [
            (LLMNR_PORT, ProtocolLabel::Llmnr, decode_llmnr_name),
            (MDNS_PORT, ProtocolLabel::Mdns, decode_mdns_name),
            (NETBIOS_NS_PORT, ProtocolLabel::NetBios, decode_netbios_name),
        ];

        for (port, candidate, decode) in checks {
            if !on_port(port) {
                continue;
            }
            let decoded = decode(payload);
            if !decoded.is_empty() {
                label = candidate;
                name = decoded;
            }
        }

        (label, name)
    }

    /// Label a TCP payload, looking for a WPAD configuration request.
    pub fn classify_tcp(&self, payload: &[u8]) -> (ProtocolLabel, String) {
        if contains(payload, WPAD_MARKER) {
            (ProtocolLabel::Wpad, WPAD_REQUEST_NAME.to_string())
        } else {
            (ProtocolLabel::Tcp, String::new())
        }
    }

    fn event(
        source: Ipv4Addr,
        label: ProtocolLabel,
        name: String,
        payload: &[u8],
    ) -> Option<ProtocolEvent> {
        if !label.is_reportable() {
            tracing::trace!("Dropping {} packet from {}", label, source);
            return None;
        }
        ProtocolEvent::new(source, label, name, payload)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
