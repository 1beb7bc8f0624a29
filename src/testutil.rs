//! Frame builders shared by the unit tests.

use std::net::Ipv4Addr;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_VLAN: u16 = 0x8100;

const IP_PROTO_TCP: u8 = 6;
const IP_PROTO_UDP: u8 = 17;

pub fn ethernet(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0xff; 6];
    frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    frame.extend_from_slice(&ethertype.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

pub fn ipv4(src: Ipv4Addr, protocol: u8, fragment_offset: u16, payload: &[u8]) -> Vec<u8> {
    let total_len = (20 + payload.len()) as u16;
    let mut packet = vec![0x45, 0x00];
    packet.extend_from_slice(&total_len.to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x01]);
    packet.extend_from_slice(&(fragment_offset & 0x1fff).to_be_bytes());
    packet.extend_from_slice(&[64, protocol, 0x00, 0x00]);
    packet.extend_from_slice(&src.octets());
    packet.extend_from_slice(&[224, 0, 0, 252]);
    packet.extend_from_slice(payload);
    packet
}

pub fn udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut segment = Vec::new();
    segment.extend_from_slice(&src_port.to_be_bytes());
    segment.extend_from_slice(&dst_port.to_be_bytes());
    segment.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
    segment.extend_from_slice(&[0x00, 0x00]);
    segment.extend_from_slice(payload);
    segment
}

pub fn tcp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut segment = Vec::new();
    segment.extend_from_slice(&src_port.to_be_bytes());
    segment.extend_from_slice(&dst_port.to_be_bytes());
    segment.extend_from_slice(&[0, 0, 0, 1]); // seq
    segment.extend_from_slice(&[0, 0, 0, 0]); // ack
    segment.extend_from_slice(&[0x50, 0x18]); // data offset 5, PSH|ACK
    segment.extend_from_slice(&[0xff, 0xff, 0x00, 0x00, 0x00, 0x00]);
    segment.extend_from_slice(payload);
    segment
}

pub fn udp_frame(src: Ipv4Addr, src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    ethernet(
        ETHERTYPE_IPV4,
        &ipv4(src, IP_PROTO_UDP, 0, &udp(src_port, dst_port, payload)),
    )
}

pub fn tcp_frame(src: Ipv4Addr, src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    ethernet(
        ETHERTYPE_IPV4,
        &ipv4(src, IP_PROTO_TCP, 0, &tcp(src_port, dst_port, payload)),
    )
}

pub fn fragment_frame(src: Ipv4Addr, offset: u16, payload: &[u8]) -> Vec<u8> {
    ethernet(ETHERTYPE_IPV4, &ipv4(src, IP_PROTO_UDP, offset, payload))
}

pub fn vlan_frame(vlan_id: u16, inner_ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut tagged = Vec::new();
    tagged.extend_from_slice(&(vlan_id & 0x0fff).to_be_bytes());
    tagged.extend_from_slice(&inner_ethertype.to_be_bytes());
    tagged.extend_from_slice(payload);
    ethernet(ETHERTYPE_VLAN, &tagged)
}

pub fn arp_frame(payload: &[u8]) -> Vec<u8> {
    let mut arp = vec![0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01];
    arp.extend_from_slice(&[0u8; 20]);
    arp.extend_from_slice(payload);
    ethernet(ETHERTYPE_ARP, &arp)
}

/// DNS-style query with a single question for `name`.
pub fn llmnr_query(name: &str) -> Vec<u8> {
    let mut packet = vec![0x12, 0x34, 0x00, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
    packet.push(name.len() as u8);
    packet.extend_from_slice(name.as_bytes());
    packet.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x01]);
    packet
}

/// mDNS query whose question is the dot-separated `name`.
pub fn mdns_query(name: &str) -> Vec<u8> {
    let mut packet = vec![0u8; 12];
    packet[5] = 1;
    for label in name.split('.') {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.extend_from_slice(&[0x00, 0x00, 0xff, 0x00, 0x01]);
    packet
}

/// NetBIOS payload with the half-ASCII encoded `name` at offset 57.
pub fn netbios_query(name: &str) -> Vec<u8> {
    let mut padded = format!("{:<15}", name).into_bytes();
    padded.truncate(15);
    padded.push(0x00);

    let mut packet = vec![0u8; 57];
    packet[12] = 0x20;
    for b in padded {
        packet.push(b'A' + (b >> 4));
        packet.push(b'A' + (b & 0x0f));
    }
    packet.push(0x00);
    packet
}
