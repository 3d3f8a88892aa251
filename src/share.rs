//! The share engine: splitting a secret into shares, recombining a quorum,
//! and issuing additional shares from an existing quorum.

use std::collections::BTreeMap;

use bitvec::field::BitField;
use bitvec::prelude::*;
use zeroize::Zeroize;

use crate::codec::bin_hex::{bin_to_hex, checked_pad_left, hex_to_bin};
use crate::error::Error;
use crate::field::FieldTables;
use crate::poly::{horner, lagrange};
use crate::rng::Rng;
use crate::wire::{self, DecodedShare};

/// Maximum symbol-padding width accepted as the `pad` argument to [`share`].
const MAX_PAD: i64 = 1024;
/// Maximum number of bits [`random`] will generate in one call.
const MAX_RANDOM_BITS: i64 = 65536;

/// The leading sentinel bit prepended before padding, so that leading zero
/// hex digits of the original secret survive the round trip. See
/// [`strip_sentinel_to_hex`].
const SENTINEL: char = '1';

/// Splits `hex_secret` into `n` shares, any `t` of which reconstruct it.
///
/// `pad` (symbol-padding width, in bits) defaults to 0, meaning the padded
/// secret is only ever widened to a multiple of `tables.bits()`.
pub fn share(
    tables: &FieldTables,
    rng: &mut Rng,
    hex_secret: &str,
    n: i64,
    t: i64,
    pad: i64,
) -> Result<Vec<String>, Error> {
    let bits = tables.bits();
    let max = tables.max();

    if n < 2 || n > i64::from(max) {
        return Err(Error::InvalidShareCount { n, max });
    }
    let n = n as usize;
    if t < 2 || t > n as i64 {
        return Err(Error::InvalidThreshold { t, n });
    }
    let t = t as usize;
    if !(0..=MAX_PAD).contains(&pad) {
        return Err(Error::InvalidPad(pad));
    }

    let mut secret_bits = hex_to_bin(hex_secret)?;
    let mut sentinel_prefixed = String::with_capacity(secret_bits.len() + 1);
    sentinel_prefixed.push(SENTINEL);
    sentinel_prefixed.push_str(&secret_bits);
    secret_bits.zeroize();

    let width = symbol_aligned_width(pad as usize, bits as usize);
    let mut padded_str = checked_pad_left(&sentinel_prefixed, width)?;
    sentinel_prefixed.zeroize();

    let mut padded: BitVec<u8, Msb0> = padded_str.chars().map(|c| c == SENTINEL).collect();
    padded_str.zeroize();
    let symbols = split_into_symbols(&padded, bits as usize);
    for mut b in padded.iter_mut() {
        *b = false;
    }

    let mut share_bits: Vec<BitVec<u8, Msb0>> =
        vec![BitVec::with_capacity(symbols.len() * bits as usize); n];

    for &symbol in &symbols {
        let mut coeffs = Vec::with_capacity(t);
        for _ in 0..t - 1 {
            let mut bits_str = rng.next_bits(bits as usize);
            coeffs.push(
                u32::from_str_radix(&bits_str, 2)
                    .expect("bound RNG always returns a valid binary string of the right length"),
            );
            bits_str.zeroize();
        }
        coeffs.push(symbol); // constant term, evaluated last by Horner

        for id in 1..=n as u32 {
            let y = horner(tables, id, &coeffs);
            let mut chunk: BitVec<u8, Msb0> = BitVec::repeat(false, bits as usize);
            chunk.store_be(y);
            share_bits[(id - 1) as usize].extend_from_bitslice(&chunk);
        }
        coeffs.zeroize();
    }

    share_bits
        .iter()
        .enumerate()
        .map(|(i, bits_for_id)| wire::encode(bits, (i + 1) as u32, &bits_to_hex(bits_for_id)))
        .collect()
}

/// Rounds `max(pad, bits)` up to the nearest multiple of `bits`, so the
/// padded secret always splits into whole `bits`-wide symbols.
fn symbol_aligned_width(pad: usize, bits: usize) -> usize {
    let base = pad.max(bits);
    base.div_ceil(bits) * bits
}

/// Splits a padded bit string into `bits`-wide symbols, most-significant
/// chunk first, mirroring the teacher's own use of `BitVec<_, Msb0>` for
/// bit-level work in `SetInProgress::combine`.
fn split_into_symbols(padded: &BitSlice<u8, Msb0>, bits: usize) -> Vec<u32> {
    padded.chunks(bits).map(|chunk| chunk.load_be::<u32>()).collect()
}

/// Recovers each symbol position by Lagrange interpolation at `at`, from a
/// set of already-decoded, same-`bits` shares.
///
/// Duplicate ids with identical data are collapsed into one; duplicate ids
/// with differing data fail with [`Error::ConflictingShares`].
pub fn combine_symbols(
    tables: &FieldTables,
    decoded: &[DecodedShare],
    at: u32,
) -> Result<Vec<u32>, Error> {
    let bits = tables.bits() as usize;

    let mut by_id: BTreeMap<u32, BitVec<u8, Msb0>> = BTreeMap::new();
    for d in decoded {
        let bin = hex_to_bin(&d.data)?;
        let bitvec: BitVec<u8, Msb0> = bin.chars().map(|c| c == SENTINEL).collect();
        match by_id.get(&d.id) {
            Some(existing) if existing != &bitvec => {
                return Err(Error::ConflictingShares { id: d.id })
            }
            Some(_) => {}
            None => {
                let _ = by_id.insert(d.id, bitvec);
            }
        }
    }

    let max_len = by_id.values().map(|v| v.len()).max().unwrap_or(0);
    let num_symbols = max_len / bits;
    let skip = max_len - num_symbols * bits;

    let ids: Vec<u32> = by_id.keys().copied().collect();
    let mut normalized: Vec<BitVec<u8, Msb0>> = by_id
        .values()
        .map(|v| left_pad_bits(v, max_len))
        .collect();
    for v in by_id.values_mut() {
        for mut b in v.iter_mut() {
            *b = false;
        }
    }

    let mut recovered = Vec::with_capacity(num_symbols);
    for k in 0..num_symbols {
        let start = skip + k * bits;
        let ys: Vec<u32> = normalized
            .iter()
            .map(|bv| bv[start..start + bits].load_be::<u32>())
            .collect();
        recovered.push(lagrange(tables, at, &ids, &ys));
    }
    for v in normalized.iter_mut() {
        for mut b in v.iter_mut() {
            *b = false;
        }
    }
    Ok(recovered)
}

fn left_pad_bits(bits: &BitSlice<u8, Msb0>, len: usize) -> BitVec<u8, Msb0> {
    if bits.len() >= len {
        return bits.to_bitvec();
    }
    let mut out: BitVec<u8, Msb0> = BitVec::repeat(false, len - bits.len());
    out.extend_from_bitslice(bits);
    out
}

/// Re-assembles recovered symbols into one bit vector, in original
/// left-to-right symbol order.
pub fn symbols_to_bits(bits: u32, symbols: &[u32]) -> BitVec<u8, Msb0> {
    let mut out: BitVec<u8, Msb0> = BitVec::with_capacity(symbols.len() * bits as usize);
    for &s in symbols {
        let mut chunk: BitVec<u8, Msb0> = BitVec::repeat(false, bits as usize);
        chunk.store_be(s);
        out.extend_from_bitslice(&chunk);
    }
    out
}

/// Hex-encodes a bit vector at nibble granularity, left-padding as needed.
pub fn bits_to_hex(bits: &BitSlice<u8, Msb0>) -> String {
    let bin: String = bits.iter().map(|b| if *b { '1' } else { '0' }).collect();
    bin_to_hex(&bin)
}

/// Locates the sentinel bit prepended by [`share`] and drops everything up
/// to and including it, then hex-encodes the remainder.
///
/// The sentinel is specifically the bit [`share`] prepended, not merely
/// "the first `1` bit" of the original data — for an all-zero secret those
/// coincide, but the distinction is what makes the scheme length-agnostic.
pub fn strip_sentinel_to_hex(padded_bits: BitVec<u8, Msb0>) -> String {
    let stripped: BitVec<u8, Msb0> =
        padded_bits.into_iter().skip_while(|x| !*x).skip(1).collect();
    bits_to_hex(&stripped)
}

/// Requests `n_bits` random bits from `rng` and returns them hex-encoded.
pub fn random(rng: &mut Rng, n_bits: i64) -> Result<String, Error> {
    if !(1..=MAX_RANDOM_BITS).contains(&n_bits) {
        return Err(Error::InvalidBitLength(n_bits));
    }
    Ok(bin_to_hex(&rng.next_bits(n_bits as usize)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Rng, TEST_RNG};

    fn tables(bits: u32) -> FieldTables {
        FieldTables::new(bits).unwrap()
    }

    fn test_rng() -> Rng {
        Rng::by_name(TEST_RNG).unwrap()
    }

    fn combine_hex(tables: &FieldTables, shares: &[String]) -> String {
        let decoded: Vec<DecodedShare> = shares.iter().map(|s| wire::decode(s).unwrap()).collect();
        let symbols = combine_symbols(tables, &decoded, 0).unwrap();
        strip_sentinel_to_hex(symbols_to_bits(tables.bits(), &symbols))
    }

    #[test]
    fn round_trips_minimal_case() {
        let t = tables(8);
        let mut rng = test_rng();
        let shares = share(&t, &mut rng, "ab", 3, 2, 0).unwrap();
        assert_eq!(shares.len(), 3);
        for s in &shares {
            assert!(regex_like_share_format(s));
        }
        assert_eq!(combine_hex(&t, &shares[0..2]), "ab");
        assert_eq!(combine_hex(&t, &shares[1..3]), "ab");
    }

    #[test]
    fn preserves_leading_zero_hex_digits() {
        let t = tables(8);
        let mut rng = test_rng();
        let secret = "000000000000000123";
        let shares = share(&t, &mut rng, secret, 10, 5, 0).unwrap();
        assert_eq!(combine_hex(&t, &shares), secret);
        assert_eq!(combine_hex(&t, &shares[2..7]), secret);
    }

    #[test]
    fn rejects_invalid_share_count_and_threshold() {
        let t = tables(8);
        let mut rng = test_rng();
        assert!(matches!(
            share(&t, &mut rng, "deadbeef", 1, 2, 0),
            Err(Error::InvalidShareCount { .. })
        ));
        assert!(matches!(
            share(&t, &mut rng, "deadbeef", 3, 1, 0),
            Err(Error::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn rejects_padding_that_rounds_past_the_hard_cap() {
        // bits=20, pad=1024 rounds up to 1040, past the 1024-bit ceiling.
        let t = tables(20);
        let mut rng = test_rng();
        assert!(matches!(
            share(&t, &mut rng, "ffff", 3, 2, 1024),
            Err(Error::PaddingTooLarge(1040))
        ));
    }

    #[test]
    fn new_share_style_recombination_matches_threshold() {
        let t = tables(8);
        let mut rng = test_rng();
        let shares = share(&t, &mut rng, "abcd", 5, 3, 0).unwrap();
        let decoded: Vec<DecodedShare> = shares[0..3].iter().map(|s| wire::decode(s).unwrap()).collect();
        let issued_symbols = combine_symbols(&t, &decoded, 4).unwrap();
        let issued_bits = symbols_to_bits(t.bits(), &issued_symbols);
        let issued_hex = bits_to_hex(&issued_bits);
        let issued = wire::encode(t.bits(), 4, &issued_hex).unwrap();

        // The issued share plus 2 of the originals should recombine the secret.
        let quorum = vec![issued, shares[0].clone(), shares[1].clone()];
        assert_eq!(combine_hex(&t, &quorum), "abcd");
    }

    #[test]
    fn duplicate_identical_shares_do_not_conflict() {
        let t = tables(8);
        let mut rng = test_rng();
        let shares = share(&t, &mut rng, "ab", 3, 2, 0).unwrap();
        let quorum = vec![shares[0].clone(), shares[0].clone(), shares[1].clone()];
        assert_eq!(combine_hex(&t, &quorum), "ab");
    }

    #[test]
    fn conflicting_duplicate_ids_are_rejected() {
        let t = tables(8);
        let decoded = vec![
            DecodedShare { bits: 8, id: 1, data: "aa".into() },
            DecodedShare { bits: 8, id: 1, data: "bb".into() },
        ];
        assert!(matches!(
            combine_symbols(&t, &decoded, 0),
            Err(Error::ConflictingShares { id: 1 })
        ));
    }

    #[test]
    fn random_bounds_are_enforced() {
        let mut rng = test_rng();
        assert!(matches!(random(&mut rng, 0), Err(Error::InvalidBitLength(0))));
        assert!(matches!(random(&mut rng, 65537), Err(Error::InvalidBitLength(65537))));
        assert_eq!(random(&mut rng, 8).unwrap().len(), 2);
    }

    fn regex_like_share_format(s: &str) -> bool {
        let mut chars = s.chars();
        let first = chars.next().unwrap();
        if !('3'..='9').contains(&first) && !('a'..='k').contains(&first) {
            return false;
        }
        chars.all(|c| c.is_ascii_hexdigit())
    }
}
