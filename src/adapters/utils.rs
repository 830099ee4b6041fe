//! Shared helpers for the adapter layer: credential validation and URL
//! query encoding.

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
///
/// Used to validate WiFi SSID strings.
pub(crate) fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Percent-encode `s` for use as a URL query value.
///
/// Only the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`) passes through;
/// every other byte of the UTF-8 encoding becomes `%XX`. Chat texts carry
/// newlines, spaces, `&` and `°`, all of which must be escaped.
pub fn escape_query(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}
