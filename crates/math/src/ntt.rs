//! Number-Theoretic Transform and base multiplication in `Z_q[X]/(X^2 - gamma)`.
//!
//! - `forward_ntt`: forward NTT, standard order -> bit-reversed order.
//! - `inverse_ntt`: inverse NTT, bit-reversed order -> standard order,
//!   including the `1/128` scaling.
//! - `basemul_add`: accumulating degree-1 multiplication in the NTT domain.

use crate::{
    N, Q,
    reduce::{barrett_reduce, fqmul},
};

const Q64: i64 = Q as i64;

const fn pow_mod(mut base: i64, mut exp: i64, modulus: i64) -> i64 {
    let mut result: i64 = 1;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        exp >>= 1;
        base = base * base % modulus;
    }
    result
}

const fn bitrev7(x: usize) -> usize {
    ((x >> 6) & 1)
        | (((x >> 5) & 1) << 1)
        | (((x >> 4) & 1) << 2)
        | (((x >> 3) & 1) << 3)
        | (((x >> 2) & 1) << 4)
        | (((x >> 1) & 1) << 5)
        | ((x & 1) << 6)
}

/// Centred representative of `val mod q` in `[−(q−1)/2, (q−1)/2]`.
const fn centred(val: i64) -> i16 {
    if val > Q64 / 2 {
        (val - Q64) as i16
    } else {
        val as i16
    }
}

/// Primitive 256th root of unity modulo q.
const ZETA: i64 = 17;

/// Twiddle factors in Montgomery form, bit-reversed indexing.
///
/// `ZETAS[i] = ζ^{BitRev₇(i)} · 2¹⁶  (mod q)`, centred to signed.
/// Multiplying by an entry through [`fqmul`] multiplies by the plain `ζ`
/// power.
pub const ZETAS: [i16; 128] = {
    const MONT: i64 = 1 << 16;

    let mut zetas = [0i16; 128];
    let mut i = 0;
    while i < 128 {
        let val = pow_mod(ZETA, bitrev7(i) as i64, Q64) * MONT % Q64;
        zetas[i] = centred(val);
        i += 1;
    }
    zetas
};

/// Base-multiplication moduli in plain form.
///
/// `GAMMAS[i] = ζ^{BitRev₇(64 + i)} = ζ^{2·BitRev₆(i) + 1} (mod q)`, centred.
/// Coefficient quadruple `4i..4i+4` is split into the pairs taken modulo
/// `X² − GAMMAS[i]` and `X² + GAMMAS[i]`.
pub const GAMMAS: [i16; 64] = {
    let mut gammas = [0i16; 64];
    let mut i = 0;
    while i < 64 {
        gammas[i] = centred(pow_mod(ZETA, bitrev7(64 + i) as i64, Q64));
        i += 1;
    }
    gammas
};

/// Montgomery compensation for the inverse transform: `2¹⁶ / 128`.
///
/// `montgomery_reduce(a · 512) = a · 128⁻¹ (mod q)`.
pub const INVERSE_SCALE: i16 = 512;

/// Forward NTT (in-place). Standard order in, bit-reversed order out.
///
/// Input coefficients must satisfy `|a| < q`; every output coefficient is
/// Barrett-reduced into `[−(q−1)/2, (q−1)/2]`.
pub fn forward_ntt(r: &mut [i16; N]) {
    let mut k: usize = 1;
    let mut len = 128;
    while len >= 2 {
        for block in r.chunks_exact_mut(2 * len) {
            let zeta = ZETAS[k];
            k += 1;
            let (lo, hi) = block.split_at_mut(len);
            for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
                let t = fqmul(*b, zeta);
                *b = *a - t;
                *a += t;
            }
        }
        len >>= 1;
    }
    for c in r.iter_mut() {
        *c = barrett_reduce(*c);
    }
}

/// Inverse NTT (in-place). Bit-reversed order in, standard order out.
///
/// Input coefficients must satisfy `|a| < 4q`. Output coefficients lie in
/// `(−q, q)` and satisfy `inverse_ntt(forward_ntt(p)) ≡ p (mod q)`.
pub fn inverse_ntt(r: &mut [i16; N]) {
    let mut k: usize = 127;
    let mut len = 2;
    while len <= 128 {
        for block in r.chunks_exact_mut(2 * len) {
            let zeta = ZETAS[k];
            k = k.wrapping_sub(1);
            let (lo, hi) = block.split_at_mut(len);
            for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
                let t = *a;
                *a = barrett_reduce(t + *b);
                *b = fqmul(zeta, *b - t);
            }
        }
        len <<= 1;
    }
    for c in r.iter_mut() {
        *c = fqmul(*c, INVERSE_SCALE);
    }
}

/// One degree-1 product modulo `X² − gamma`, added onto `h`.
///
/// Operands must satisfy `|f|, |g| < q`. Each added term lies in `(−q, q)`.
#[inline]
pub fn basemul_add(h: &mut [i16; 2], f: &[i16; 2], g: &[i16; 2], gamma: i16) {
    let q = Q as i32;
    let [f0, f1] = f.map(i32::from);
    let [g0, g1] = g.map(i32::from);
    let gamma = gamma as i32;
    h[0] += ((f0 * g0 + (f1 * g1 % q) * gamma) % q) as i16;
    h[1] += ((f0 * g1 + f1 * g0) % q) as i16;
}

/// `h += f ∘ g`: the full 128-pair NTT-domain product, accumulated.
pub fn poly_basemul_add(h: &mut [i16; N], f: &[i16; N], g: &[i16; N]) {
    let (h_pairs, _) = h.as_chunks_mut::<2>();
    let (f_pairs, _) = f.as_chunks::<2>();
    let (g_pairs, _) = g.as_chunks::<2>();
    for (i, ((h, f), g)) in h_pairs.iter_mut().zip(f_pairs).zip(g_pairs).enumerate() {
        let gamma = GAMMAS[i / 2];
        let gamma = if i & 1 == 0 { gamma } else { -gamma };
        basemul_add(h, f, g, gamma);
    }
}
