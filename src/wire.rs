//! The on-wire share string format: `<base36 bits><hex id><hex data>`.
//!
//! This is the sole externally observable encoding this crate produces and
//! must stay stable — any implementation of this scheme that shares the
//! primitive polynomial table (see [`crate::field`]) should be able to
//! decode shares produced here, and vice versa.

use crate::error::Error;
use crate::field::BIT_RANGE;

/// Minimum number of hex digits needed to represent `2^bits - 1`.
pub fn pad_width(bits: u32) -> usize {
    bits.div_ceil(4) as usize
}

fn bits_to_base36(bits: u32) -> char {
    std::char::from_digit(bits, 36).expect("bits within BIT_RANGE always has a base36 digit")
}

fn base36_to_bits(c: char) -> Result<u32, Error> {
    let v = c.to_digit(36).ok_or(Error::InvalidBitWidth)?;
    if !BIT_RANGE.contains(&v) {
        return Err(Error::InvalidBitWidth);
    }
    Ok(v)
}

/// A share, decoded into its three wire components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedShare {
    /// The field exponent this share was produced under.
    pub bits: u32,
    /// The share's identifier, in `[1, 2^bits - 1]`.
    pub id: u32,
    /// The raw hex payload (the per-symbol evaluations, concatenated).
    pub data: String,
}

/// Assembles the wire string for one share.
pub(crate) fn encode(bits: u32, id: u32, hexdata: &str) -> Result<String, Error> {
    let max = (1u32 << bits) - 1;
    if id < 1 || id > max {
        return Err(Error::InvalidShareId { id: id as i64, max });
    }
    let width = pad_width(bits);
    let mut out = String::with_capacity(1 + width + hexdata.len());
    out.push(bits_to_base36(bits));
    out.push_str(&format!("{:0width$x}", id, width = width));
    out.push_str(hexdata);
    Ok(out)
}

/// Parses a share string into its `(bits, id, data)` components.
pub fn decode(s: &str) -> Result<DecodedShare, Error> {
    let mut chars = s.chars();
    let bits_char = chars
        .next()
        .ok_or_else(|| Error::InvalidShareFormat(s.to_string()))?;
    let bits = base36_to_bits(bits_char)?;

    let width = pad_width(bits);
    let rest: String = chars.collect();
    if rest.len() <= width {
        return Err(Error::InvalidShareFormat(s.to_string()));
    }
    let (id_hex, data) = rest.split_at(width);
    let id =
        u32::from_str_radix(id_hex, 16).map_err(|_| Error::InvalidShareFormat(s.to_string()))?;

    let max = (1u32 << bits) - 1;
    if id < 1 || id > max {
        return Err(Error::InvalidShareId { id: id as i64, max });
    }
    if !data.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidShareFormat(s.to_string()));
    }

    Ok(DecodedShare {
        bits,
        id,
        data: data.to_string(),
    })
}
