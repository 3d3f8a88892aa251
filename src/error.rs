use crate::field::BIT_RANGE;

/// Errors returned by this crate's public API.
///
/// Every variant names the offending parameter and, where useful, the
/// accepted range, so a caller can report a precise message without
/// re-deriving the bounds.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Number of bits must be an integer between {} and {}, inclusive.", BIT_RANGE.start(), BIT_RANGE.end())]
    InvalidBitWidth,

    #[error("Unknown RNG name '{0}'. Register a source or pass a generator directly.")]
    InvalidRngName(String),

    #[error("No secure CSPRNG source is available on this platform.")]
    NoSecureRng,

    #[error("RNG producer must return a string.")]
    RngNotString,

    #[error("RNG producer returned a string containing characters other than '0'/'1'.")]
    RngNotBinary,

    #[error("RNG producer returned {got} bits, expected exactly {expected}.")]
    RngLengthMismatch { expected: usize, got: usize },

    #[error("RNG producer returned an all-zero bit string; refusing a broken or truncated source.")]
    RngAllZero,

    #[error("Input must be a string.")]
    InputNotString,

    #[error("Input must be a valid hexadecimal string.")]
    InputNotHex,

    #[error("Secret must be a hexadecimal string.")]
    SecretNotString,

    #[error("Invalid hexadecimal character '{0}'.")]
    InvalidHexChar(char),

    #[error("bytesPerChar must be an integer between 1 and 6, inclusive; got {0}.")]
    InvalidBytesPerChar(i64),

    #[error("Padding width must be between 0 and 1024 bits; got {0}.")]
    PaddingTooLarge(i64),

    #[error("Number of bits to generate must be between 1 and 65536, inclusive; got {0}.")]
    InvalidBitLength(i64),

    #[error("pad must be an integer between 0 and 1024, inclusive; got {0}.")]
    InvalidPad(i64),

    #[error("Number of shares must be an integer between 2 and {max}, inclusive; got {n}.")]
    InvalidShareCount { n: i64, max: u32 },

    #[error("Threshold must be an integer between 2 and the number of shares ({n}), inclusive; got {t}.")]
    InvalidThreshold { t: i64, n: usize },

    #[error("Share id must be an integer between 1 and {max}, inclusive; got {id}.")]
    InvalidShareId { id: i64, max: u32 },

    #[error("Share string '{0}' is not in the expected <bits><id><data> format.")]
    InvalidShareFormat(String),

    #[error("Shares have mixed bit widths: expected {expected}, found {found}.")]
    MixedBitWidths { expected: u32, found: u32 },

    #[error("Share id {id} appears twice with conflicting data.")]
    ConflictingShares { id: u32 },
}
