//! Montgomery and Barrett modular reduction for the ML-KEM field (q = 3329).

use crate::Q;

/// q^{-1} mod 2^{16}, negated (Montgomery inverse).
pub const QINV: i16 = -3327;

/// Barrett multiplier `round(2^{26} / q)`.
pub const BARRETT_V: i32 = ((1i32 << 26) + (Q as i32) / 2) / (Q as i32);

/// Montgomery reduction: computes `a * R^{-1} mod q` where R = 2^{16}.
///
/// Input: `a in {-q*2^{15}, ..., q*2^{15} - 1}`. Output: `r in {-q+1, ...,
/// q-1}` with `r \equiv a*R^{-1} (mod q)`.
#[inline]
#[must_use]
pub const fn montgomery_reduce(a: i32) -> i16 {
    let t = (a as i16).wrapping_mul(QINV);
    ((a - (t as i32) * (Q as i32)) >> 16) as i16
}

/// Barrett reduction: centered reduction modulo q.
///
/// Accepts any `i16`. Output: `r in {-floor(q/2), ..., floor(q/2)}` with
/// `r \equiv a (mod q)`.
#[inline]
#[must_use]
pub const fn barrett_reduce(a: i16) -> i16 {
    let t = ((BARRETT_V * (a as i32) + (1 << 25)) >> 26) as i16;
    a.wrapping_sub(t.wrapping_mul(Q))
}

/// Field multiplication followed by Montgomery reduction: `a*b*R^{-1} mod q`.
#[inline]
#[must_use]
pub const fn fqmul(a: i16, b: i16) -> i16 {
    montgomery_reduce((a as i32) * (b as i32))
}

/// Conditionally add q, mapping `(-q, q)` onto `[0, q)`.
#[inline]
#[must_use]
pub const fn csubq(a: i16) -> u16 {
    (a as u16).wrapping_add(((a >> 15) as u16) & (Q as u16))
}
