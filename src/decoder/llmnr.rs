//! LLMNR name decoding.
//!
//! LLMNR shares the DNS query wire format. Only the first label of the
//! question is read; multi-label names and compression are not handled.

use super::DNS_HEADER_LEN;

/// Decode the requested name from an LLMNR query payload.
///
/// Reads the one-byte label length right after the 12-byte header and
/// returns that many bytes. Returns an empty string if the payload is too
/// short to hold the label.
pub fn decode_llmnr_name(payload: &[u8]) -> String {
    if payload.len() <= DNS_HEADER_LEN + 1 {
        return String::new();
    }

    let len = payload[DNS_HEADER_LEN] as usize;
    let start = DNS_HEADER_LEN + 1;

    match payload.get(start..start + len) {
        Some(label) => String::from_utf8_lossy(label).into_owned(),
        None => String::new(),
    }
}
