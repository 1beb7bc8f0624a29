//! Requested-name decoding.
//!
//! One stateless decoder per protocol. Each takes the UDP payload of a single
//! datagram and returns the requested name, or an empty string when no name
//! can be decoded. Decoders never fail and never read out of bounds.

mod llmnr;
mod mdns;
mod netbios;

pub use llmnr::decode_llmnr_name;
pub use mdns::decode_mdns_name;
pub use netbios::decode_netbios_name;

/// Size of the DNS-style header shared by LLMNR and mDNS.
const DNS_HEADER_LEN: usize = 12;
