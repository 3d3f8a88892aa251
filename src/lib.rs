//! Shamir's Secret Sharing over GF(2^b), for b in `3..=20`.
//!
//! A hexadecimal secret is split into N shares such that any T of them
//! reconstruct it exactly; additional shares can be issued from an existing
//! quorum without ever reconstructing the secret in plaintext. The wire
//! format, the field tables, and the CSPRNG registry are documented on the
//! modules that implement them.

#![deny(missing_docs)]
#![deny(unused_crate_dependencies)]
#![deny(unused_results)]

mod codec;
mod error;
mod field;
mod poly;
mod rng;
mod share;
mod wire;


pub use error::Error;
pub use field::BIT_RANGE;
pub use wire::DecodedShare;

use field::FieldTables;
use rng::Rng;

/// Default field width bound by [`Engine::new`] when no `bits` is given,
/// matching the convention assumed across the reference JS library's test
/// suite and examples.
pub const DEFAULT_BITS: u32 = 8;

/// A snapshot of the engine's current configuration, mirroring `getConfig()`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Always 16: shares and secrets are hex-encoded.
    pub radix: u32,
    /// The bound field exponent.
    pub bits: u32,
    /// `2^bits - 1`: the maximum share id and the maximum share count.
    pub max_shares: u32,
    /// Whether the bound RNG is one of the CSPRNG-backed sources.
    pub has_csprng: bool,
    /// The name the bound RNG was bound under (`"custom"` for a
    /// caller-supplied producer).
    pub type_csprng: String,
}

/// Owns one field configuration (bit width, log/antilog tables) and one
/// bound random source.
///
/// Per §5 of the scheme this implements, a single `Engine` is not meant to
/// be shared across threads that might concurrently reconfigure it (via
/// `combine` observing a foreign `bits`, or via `set_rng_*`); callers needing
/// concurrent use with differing bit widths should hold one `Engine` per
/// call site rather than share a process-global instance.
pub struct Engine {
    tables: FieldTables,
    rng: Rng,
}

impl Engine {
    /// Builds an engine for `bits` (defaulting to [`DEFAULT_BITS`]), bound to
    /// the named RNG source (defaulting to the platform secure source).
    ///
    /// Fails with [`Error::InvalidBitWidth`] if `bits` is given and outside
    /// `3..=20`, or with [`Error::NoSecureRng`] if no `rng_name` is given and
    /// the platform's secure source is unreachable.
    pub fn new(bits: Option<u32>, rng_name: Option<&str>) -> Result<Self, Error> {
        let tables = FieldTables::new(bits.unwrap_or(DEFAULT_BITS))?;
        let rng = match rng_name {
            Some(name) => Rng::by_name(name)?,
            None => Rng::default_secure()?,
        };
        Ok(Self { tables, rng })
    }

    /// Reports the bound field width, share/id bounds, and RNG binding.
    pub fn get_config(&self) -> Config {
        Config {
            radix: 16,
            bits: self.tables.bits(),
            max_shares: self.tables.max(),
            has_csprng: self.rng.type_name() != rng::TEST_RNG,
            type_csprng: self.rng.type_name().to_string(),
        }
    }

    /// Binds a built-in named RNG source. Leaves the previous binding intact
    /// on failure.
    pub fn set_rng_name(&mut self, name: &str) -> Result<(), Error> {
        let rng = Rng::by_name(name)?;
        self.rng = rng;
        Ok(())
    }

    /// Binds a caller-supplied bit-string producer, validated once at
    /// `n = bits` per spec. Leaves the previous binding intact on failure.
    pub fn set_rng_fn<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnMut(usize) -> String + Send + 'static,
    {
        let rng = Rng::from_fn(self.tables.bits(), f)?;
        self.rng = rng;
        Ok(())
    }

    /// Splits `hex_secret` into `n` shares, any `t` of which reconstruct it.
    ///
    /// `pad` (bits) widens the padded secret before symbol splitting;
    /// `0` means "only pad up to a multiple of `bits`".
    pub fn share(
        &mut self,
        hex_secret: &str,
        n: i64,
        t: i64,
        pad: i64,
    ) -> Result<Vec<String>, Error> {
        share::share(&self.tables, &mut self.rng, hex_secret, n, t, pad)
    }

    /// Reconstructs the hex secret from `shares` (at least `t` of one batch).
    ///
    /// The engine auto-reconfigures its field tables to the first share's
    /// `bits` if it differs from the currently bound width; every other
    /// decoded share must agree with that width, or this fails with
    /// [`Error::MixedBitWidths`].
    pub fn combine(&mut self, shares: &[String]) -> Result<String, Error> {
        let decoded = decode_all(shares)?;
        self.ensure_tables_for(&decoded)?;
        let symbols = share::combine_symbols(&self.tables, &decoded, 0)?;
        let bitstring = share::symbols_to_bits(self.tables.bits(), &symbols);
        Ok(share::strip_sentinel_to_hex(bitstring))
    }

    /// Issues a new share with identifier `id` from an existing quorum,
    /// without ever reconstructing the secret in plaintext.
    pub fn new_share(&mut self, id: i64, shares: &[String]) -> Result<String, Error> {
        let decoded = decode_all(shares)?;
        self.ensure_tables_for(&decoded)?;
        let max = self.tables.max();
        if id < 1 || id > i64::from(max) {
            return Err(Error::InvalidShareId { id, max });
        }
        let symbols = share::combine_symbols(&self.tables, &decoded, id as u32)?;
        let bitstring = share::symbols_to_bits(self.tables.bits(), &symbols);
        let hexdata = share::bits_to_hex(&bitstring);
        wire::encode(self.tables.bits(), id as u32, &hexdata)
    }

    /// Requests `n_bits` random bits from the bound RNG, hex-encoded.
    pub fn random(&mut self, n_bits: i64) -> Result<String, Error> {
        share::random(&mut self.rng, n_bits)
    }

    /// Decodes every share, reconfiguring to the first share's `bits` if
    /// needed, and validating the rest agree with it.
    fn ensure_tables_for(&mut self, decoded: &[DecodedShare]) -> Result<(), Error> {
        let first = decoded
            .first()
            .ok_or_else(|| Error::InvalidShareFormat(String::new()))?;
        if first.bits != self.tables.bits() {
            self.tables = FieldTables::new(first.bits)?;
        }
        for d in &decoded[1..] {
            if d.bits != first.bits {
                return Err(Error::MixedBitWidths {
                    expected: first.bits,
                    found: d.bits,
                });
            }
        }
        Ok(())
    }
}

fn decode_all(shares: &[String]) -> Result<Vec<DecodedShare>, Error> {
    shares.iter().map(|s| wire::decode(s)).collect()
}

/// Encodes `s` as hex, at UTF-16 code-unit granularity, `bytes_per_char` in
/// `[1, 6]` bytes per code unit (default 1 if not otherwise constrained by
/// the caller).
pub fn str2hex(s: &str, bytes_per_char: u32) -> Result<String, Error> {
    codec::text::str2hex(s, bytes_per_char)
}

/// Decodes hex produced by [`str2hex`] back into a string.
pub fn hex2str(hex: &str, bytes_per_char: u32) -> Result<String, Error> {
    codec::text::hex2str(hex, bytes_per_char)
}

/// Parses a share string into its `(bits, id, data)` components, a.k.a.
/// `extractShareComponents`.
pub fn extract_share_components(s: &str) -> Result<DecodedShare, Error> {
    wire::decode(s)
}
