//! Unicode text <-> hex codec, at UTF-16 code-unit granularity.
//!
//! Operating on UTF-16 code units (rather than UTF-8 bytes, or Unicode
//! scalar values) matches the original library's wire format: a surrogate
//! pair becomes two hex-encoded code units, exactly as it would in a
//! JavaScript host where strings are UTF-16 under the hood.

use super::bin_hex::pad_left;
use crate::error::Error;

const MIN_BYTES_PER_CHAR: u32 = 1;
const MAX_BYTES_PER_CHAR: u32 = 6;

fn validate_bytes_per_char(bpc: u32) -> Result<(), Error> {
    if !(MIN_BYTES_PER_CHAR..=MAX_BYTES_PER_CHAR).contains(&bpc) {
        return Err(Error::InvalidBytesPerChar(bpc as i64));
    }
    Ok(())
}

/// Encodes `s` as hex, `2 * bytes_per_char` hex digits per UTF-16 code unit.
pub fn str2hex(s: &str, bytes_per_char: u32) -> Result<String, Error> {
    validate_bytes_per_char(bytes_per_char)?;
    let width = (2 * bytes_per_char) as usize;
    let mut out = String::with_capacity(s.len() * width);
    for unit in s.encode_utf16() {
        out.push_str(&format!("{:0width$x}", unit, width = width));
    }
    Ok(out)
}

/// Decodes hex produced by [`str2hex`] back into a string.
pub fn hex2str(hex: &str, bytes_per_char: u32) -> Result<String, Error> {
    validate_bytes_per_char(bytes_per_char)?;
    let width = (2 * bytes_per_char) as usize;
    let padded = pad_left(hex, width);

    let mut units = Vec::with_capacity(padded.len() / width.max(1));
    for chunk in padded.as_bytes().chunks(width) {
        let chunk_str = std::str::from_utf8(chunk).map_err(|_| Error::InputNotHex)?;
        let value = u64::from_str_radix(chunk_str, 16).map_err(|_| Error::InputNotHex)?;
        let unit: u16 = value.try_into().map_err(|_| Error::InputNotHex)?;
        units.push(unit);
    }
    String::from_utf16(&units).map_err(|_| Error::InputNotHex)
}
