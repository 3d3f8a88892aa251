//! Lossless binary-string <-> hex-string conversion, and left-padding.

use crate::error::Error;

/// Maximum width accepted by [`pad_left`].
pub const MAX_PAD_WIDTH: usize = 1024;

/// Converts a hex string (case-insensitive) into a string of `'0'`/`'1'`
/// characters, four bits per hex digit.
pub fn hex_to_bin(hex: &str) -> Result<String, Error> {
    let mut out = String::with_capacity(hex.len() * 4);
    for c in hex.chars() {
        let nibble = c.to_digit(16).ok_or(Error::InvalidHexChar(c))?;
        out.push_str(&format!("{:04b}", nibble));
    }
    Ok(out)
}

/// Converts a binary string into a lowercase hex string, left-padding to a
/// multiple of 4 bits first.
///
/// Non-`'0'`/`'1'` characters are not validated by contract; any 4-bit
/// window is simply parsed as if it were binary digits (this path is only
/// ever fed actual bit strings internally, so the leniency is cosmetic, not
/// a behavior callers should rely on).
pub fn bin_to_hex(bin: &str) -> String {
    let padded = pad_left(bin, 4);
    let mut out = String::with_capacity(padded.len() / 4);
    for chunk in padded.as_bytes().chunks(4) {
        let mut nibble = 0u8;
        for &b in chunk {
            nibble = (nibble << 1) | u8::from(b == b'1');
        }
        out.push(std::char::from_digit(nibble as u32, 16).expect("nibble < 16"));
    }
    out
}

/// Left-pads `s` with `'0'` characters until its length is a multiple of
/// `width`. `width == 0` disables padding. Fails with
/// [`Error::PaddingTooLarge`] when `width > 1024`.
pub fn pad_left(s: &str, width: usize) -> String {
    if width == 0 || s.is_empty() {
        return s.to_string();
    }
    let remainder = s.len() % width;
    if remainder == 0 {
        return s.to_string();
    }
    let needed = width - remainder;
    let mut out = "0".repeat(needed);
    out.push_str(s);
    out
}

/// Checked variant of [`pad_left`] that enforces the 1024-bit bound from
/// spec §4.3.
pub fn checked_pad_left(s: &str, width: usize) -> Result<String, Error> {
    if width > MAX_PAD_WIDTH {
        return Err(Error::PaddingTooLarge(width as i64));
    }
    Ok(pad_left(s, width))
}
