//! Polynomial evaluation and interpolation over GF(2^b).

use crate::field::FieldTables;

/// Evaluates a polynomial at `x` using Horner's method, in GF(2^b).
///
/// `coeffs[0]` is the *highest*-degree coefficient, matching the convention
/// the share engine builds its per-symbol polynomials under: the random
/// coefficients come first, the symbol itself (the degree-0 term) comes
/// last.
///
/// `horner(0, coeffs)` always equals `coeffs[last]`: multiplying by zero
/// collapses every higher-degree term, which is exactly the property the
/// sentinel-free combine-at-zero path relies on.
pub fn horner(tables: &FieldTables, x: u32, coeffs: &[u32]) -> u32 {
    let mut fx = 0u32;
    for &c in coeffs {
        fx = tables.mul(fx, x) ^ c;
    }
    fx
}

/// Lagrange-interpolates the polynomial implied by `(xs[i], ys[i])` at the
/// point `at`, in GF(2^b).
///
/// `xs` and `ys` must have equal length. A `ys[i] == 0` contributes nothing
/// (its term vanishes) and is skipped without touching the log tables,
/// since `log(0)` is undefined.
pub fn lagrange(tables: &FieldTables, at: u32, xs: &[u32], ys: &[u32]) -> u32 {
    debug_assert_eq!(xs.len(), ys.len());
    let max = tables.max();
    let mut sum = 0u32;

    for i in 0..xs.len() {
        if ys[i] == 0 {
            continue;
        }
        let mut log_acc = tables.log_nonzero(ys[i]);
        let mut vanishes = false;
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            let numerator = at ^ xj;
            if numerator == 0 {
                // `at` coincides with another share's x-coordinate: this
                // basis polynomial is zero there by construction.
                vanishes = true;
                break;
            }
            let denominator = xs[i] ^ xj;
            let log_num = tables.log_nonzero(numerator);
            let log_den = tables.log_nonzero(denominator);
            log_acc = (max + log_acc + log_num - log_den) % max;
        }
        if vanishes {
            continue;
        }
        sum ^= tables.exp(log_acc);
    }
    sum
}
