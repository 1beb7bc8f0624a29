//! NetBIOS Name Service name decoding.
//!
//! NetBIOS names are half-ASCII encoded: each byte of the 16-byte name is
//! split into two nibbles, each stored as `'A' + nibble`.

/// Offset of the first encoded name byte.
const NAME_OFFSET: usize = 57;

/// Number of encoded bytes scanned.
const ENCODED_NAME_LEN: usize = 16;

/// Decode the requested name from a NetBIOS Name Service payload.
///
/// Decodes up to 16 encoded bytes starting at offset 57, stopping at a zero
/// byte or the end of the buffer, and trims trailing spaces. Returns an
/// empty string for payloads shorter than 58 bytes.
pub fn decode_netbios_name(payload: &[u8]) -> String {
    if payload.len() <= NAME_OFFSET {
        return String::new();
    }

    let end = (NAME_OFFSET + ENCODED_NAME_LEN).min(payload.len());
    let mut name = String::new();

    for pair in payload[NAME_OFFSET..end].chunks_exact(2) {
        let (hi, lo) = (pair[0], pair[1]);
        if hi == 0 {
            break;
        }
        let decoded = (hi.wrapping_sub(b'A') << 4) | lo.wrapping_sub(b'A');
        name.push(char::from(decoded));
    }

    name.trim_end_matches(' ').to_string()
}
