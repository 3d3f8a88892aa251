//! Pluggable bit-string sources.
//!
//! Mirrors the registry described for the original JS library: a handful of
//! named, secure built-ins plus a deterministic test source, and an escape
//! hatch for a caller-supplied generator. Every producer here returns a
//! string of exactly `n` ASCII `'0'`/`'1'` characters; validation of a
//! caller-supplied generator happens once, at bind time, in [`Rng::bind`].

use rand::rngs::OsRng;
use rand_core::RngCore;

use crate::error::Error;

/// Name of the default secure source bound by [`crate::Engine::new`].
pub const DEFAULT_SECURE_RNG: &str = "nodeCryptoRandomBytes";

/// Name of the deterministic test source. Only selectable by explicit name.
pub const TEST_RNG: &str = "testRandom";

/// A bound random bit producer together with the name it was bound under.
pub struct Rng {
    kind: Kind,
}

enum Kind {
    NodeCryptoRandomBytes,
    BrowserCryptoGetRandomValues,
    TestRandom(Lcg),
    Custom(Box<dyn FnMut(usize) -> String + Send>),
}

impl Rng {
    /// Binds a built-in source by name, or fails with [`Error::InvalidRngName`].
    pub fn by_name(name: &str) -> Result<Self, Error> {
        let kind = match name {
            "nodeCryptoRandomBytes" => Kind::NodeCryptoRandomBytes,
            "browserCryptoGetRandomValues" => Kind::BrowserCryptoGetRandomValues,
            "testRandom" => Kind::TestRandom(Lcg::seeded()),
            other => return Err(Error::InvalidRngName(other.to_string())),
        };
        Ok(Self { kind })
    }

    /// Binds a caller-supplied producer, validating it once at `n = bits`.
    ///
    /// On validation failure the caller's previous binding is left untouched
    /// by convention: this constructor only ever returns a fresh, valid `Rng`
    /// or an error, and never mutates an existing one.
    pub fn from_fn<F>(bits: u32, mut f: F) -> Result<Self, Error>
    where
        F: FnMut(usize) -> String + Send + 'static,
    {
        let sample = f(bits as usize);
        validate_bits(&sample, bits as usize)?;
        Ok(Self {
            kind: Kind::Custom(Box::new(f)),
        })
    }

    /// The platform default: the native secure source, or [`Error::NoSecureRng`]
    /// if none is reachable.
    pub fn default_secure() -> Result<Self, Error> {
        // A trivial probe read confirms the platform RNG is reachable before we
        // commit to it as the bound default.
        let mut probe = [0u8; 1];
        OsRng.try_fill_bytes(&mut probe).map_err(|_| Error::NoSecureRng)?;
        Ok(Self {
            kind: Kind::NodeCryptoRandomBytes,
        })
    }

    /// The stable name this binding reports through `getConfig().typeCSPRNG`.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            Kind::NodeCryptoRandomBytes => "nodeCryptoRandomBytes",
            Kind::BrowserCryptoGetRandomValues => "browserCryptoGetRandomValues",
            Kind::TestRandom(_) => "testRandom",
            Kind::Custom(_) => "custom",
        }
    }

    /// Requests `n` random bits, returned as a string of `'0'`/`'1'` characters.
    pub fn next_bits(&mut self, n: usize) -> String {
        match &mut self.kind {
            Kind::NodeCryptoRandomBytes => node_crypto_random_bytes(n),
            Kind::BrowserCryptoGetRandomValues => browser_crypto_get_random_values(n),
            Kind::TestRandom(lcg) => lcg.next_bits(n),
            Kind::Custom(f) => f(n),
        }
    }
}

/// Reads `floor(n/8)+1` secure bytes and truncates to the leading `n` bits.
fn node_crypto_random_bytes(n: usize) -> String {
    let byte_len = n / 8 + 1;
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    let bits: String = bytes.iter().map(|b| format!("{:08b}", b)).collect();
    bits[..n].to_string()
}

/// Concatenates as many 32-bit secure words as needed and truncates to `n` bits.
fn browser_crypto_get_random_values(n: usize) -> String {
    let word_len = n.div_ceil(32);
    let mut bits = String::with_capacity(word_len * 32);
    for _ in 0..word_len {
        bits.push_str(&format!("{:032b}", OsRng.next_u32()));
    }
    bits.truncate(n);
    bits
}

/// Deterministic xorshift64-based producer, reseeded to a fixed constant on
/// every bind. Exclusively for reproducible tests; never chosen by default.
struct Lcg {
    state: u64,
}

impl Lcg {
    /// The fixed seed reproducibility depends on: any change here changes
    /// every deterministic test vector produced with `testRandom`.
    const SEED: u64 = 0x2545_f491_4f6c_dd1d;

    fn seeded() -> Self {
        Self { state: Self::SEED }
    }

    fn next_bits(&mut self, n: usize) -> String {
        let mut out = String::with_capacity(n);
        while out.len() < n {
            self.state ^= self.state << 13;
            self.state ^= self.state >> 7;
            self.state ^= self.state << 17;
            out.push_str(&format!("{:064b}", self.state));
        }
        out.truncate(n);
        out
    }
}

/// Validates a raw producer output against the contract every bound RNG must
/// satisfy: a binary string of exactly the requested length, not all-zero.
pub(crate) fn validate_bits(sample: &str, expected: usize) -> Result<(), Error> {
    if !sample.chars().all(|c| c == '0' || c == '1') {
        return Err(Error::RngNotBinary);
    }
    if sample.len() != expected {
        return Err(Error::RngLengthMismatch {
            expected,
            got: sample.len(),
        });
    }
    if sample.chars().all(|c| c == '0') {
        return Err(Error::RngAllZero);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_deterministic_across_binds() {
        let mut a = Rng::by_name(TEST_RNG).unwrap();
        let mut b = Rng::by_name(TEST_RNG).unwrap();
        assert_eq!(a.next_bits(37), b.next_bits(37));
    }

    #[test]
    fn test_random_never_all_zero_for_small_widths() {
        let mut rng = Rng::by_name(TEST_RNG).unwrap();
        for bits in 3..=20 {
            let s = rng.next_bits(bits);
            assert_eq!(s.len(), bits);
            assert!(s.chars().any(|c| c == '1'));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(Rng::by_name("not-a-real-rng"), Err(Error::InvalidRngName(_))));
    }

    #[test]
    fn custom_producer_must_be_binary() {
        let err = Rng::from_fn(8, |n| "x".repeat(n)).unwrap_err();
        assert!(matches!(err, Error::RngNotBinary));
    }

    #[test]
    fn custom_producer_must_match_length() {
        let err = Rng::from_fn(8, |_| "0101".to_string()).unwrap_err();
        assert!(matches!(err, Error::RngLengthMismatch { .. }));
    }

    #[test]
    fn custom_producer_rejects_all_zero() {
        let err = Rng::from_fn(8, |n| "0".repeat(n)).unwrap_err();
        assert!(matches!(err, Error::RngAllZero));
    }

    #[test]
    fn custom_producer_accepted_when_valid() {
        let mut rng = Rng::from_fn(4, |n| "1010".chars().take(n).collect()).unwrap();
        assert_eq!(rng.type_name(), "custom");
        assert_eq!(rng.next_bits(4).len(), 4);
    }
}
