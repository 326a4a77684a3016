//! Text encodings for raw random bytes.

/// Number of random bytes behind every identifier.
pub const ID_BYTES: usize = 16;

const fn hex_digit(nibble: u8) -> u8 {
    match nibble {
        0..=9 => b'0' + nibble,
        10..=15 => b'a' + (nibble - 10),
        // Callers provide only 0..=15.
        _ => b'0',
    }
}

/// Encode `bytes` as lowercase hex, two characters per byte, no separators.
#[must_use]
pub fn lower_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for &b in bytes {
        out.push(char::from(hex_digit(b >> 4)));
        out.push(char::from(hex_digit(b & 0x0f)));
    }
    out
}

/// Lay out 16 random bytes as canonical UUID-v4 text.
///
/// The version nibble is forced to `4` and the variant bits to `10xx`, so the output always
/// matches `xxxxxxxx-xxxx-4xxx-[89ab]xxx-xxxxxxxxxxxx` in lowercase.
#[must_use]
pub fn uuid_v4(bytes: [u8; ID_BYTES]) -> String {
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}
