//! mDNS name decoding.

use super::DNS_HEADER_LEN;

/// Bytes below this value are label lengths, rendered as separators.
const LABEL_LENGTH_LIMIT: u8 = 32;

/// Decode the requested name from an mDNS payload.
///
/// Scans from the end of the header up to the zero terminator (or the end
/// of the buffer). Length bytes are rendered as `.`, so `3foo3bar0` becomes
/// `.foo.bar`. Compression pointers are not followed.
pub fn decode_mdns_name(payload: &[u8]) -> String {
    if payload.len() <= DNS_HEADER_LEN {
        return String::new();
    }

    let bytes: Vec<u8> = payload[DNS_HEADER_LEN..]
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| if b < LABEL_LENGTH_LIMIT { b'.' } else { b })
        .collect();

    String::from_utf8_lossy(&bytes).into_owned()
}
