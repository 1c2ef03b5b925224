use core::ops;

use zeroize::Zeroize;

use super::Polynomial;
use crate::{
    Error, N,
    encode::{self, Width},
    ntt,
    reduce::barrett_reduce,
    sample,
};

/// Polynomial in NTT (bit-reversed) domain.
#[derive(Clone, Copy, PartialEq, Eq, Zeroize)]
pub struct NttPolynomial(pub(crate) [i16; N]);

impl NttPolynomial {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0i16; N])
    }

    /// Consuming inverse NTT. Coefficients must satisfy `|c| < 4q`; the
    /// result lies in `(-q, q)`.
    #[must_use]
    pub fn ntt_inverse(mut self) -> Polynomial {
        ntt::inverse_ntt(&mut self.0);
        Polynomial(self.0)
    }

    pub fn reduce(&mut self) {
        for c in &mut self.0 {
            *c = barrett_reduce(*c);
        }
    }

    /// `self += a ∘ b`: 128 degree-1 multiplications, accumulated without a
    /// final reduction.
    pub fn basemul_add(&mut self, a: &Self, b: &Self) {
        ntt::poly_basemul_add(&mut self.0, &a.0, &b.0);
    }

    /// Serialize to bytes (12-bit packing, 384 bytes).
    pub fn to_bytes(&self, r: &mut [u8]) {
        encode::byte_encode(r, &self.0, Width::D12);
    }

    /// Deserialize from bytes (12-bit unpacking).
    ///
    /// # Errors
    ///
    /// [`Error::KeyOverflow`] if any coefficient is `>= q`.
    pub fn from_bytes(a: &[u8]) -> Result<Self, Error> {
        let mut p = Self::zero();
        encode::byte_decode(&mut p.0, a, Width::D12)?;
        Ok(p)
    }

    /// Uniform sampling by rejection over an XOF stream (`Parse`).
    ///
    /// # Errors
    ///
    /// [`Error::KeyLength`] if `bytes` is exhausted first.
    pub fn sample_uniform(bytes: &[u8]) -> Result<Self, Error> {
        let mut p = Self::zero();
        sample::parse(&mut p.0, bytes)?;
        Ok(p)
    }

    #[must_use]
    pub const fn coeffs(&self) -> &[i16; N] {
        &self.0
    }

    #[must_use]
    pub const fn coeffs_mut(&mut self) -> &mut [i16; N] {
        &mut self.0
    }
}

impl From<[i16; N]> for NttPolynomial {
    #[inline]
    fn from(coeffs: [i16; N]) -> Self {
        Self(coeffs)
    }
}

impl Default for NttPolynomial {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl core::fmt::Debug for NttPolynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NttPolynomial")
            .field("coeffs[..4]", &&self.0[..4])
            .finish_non_exhaustive()
    }
}

impl<'b> ops::Add<&'b NttPolynomial> for &NttPolynomial {
    type Output = NttPolynomial;
    #[inline]
    fn add(self, rhs: &'b NttPolynomial) -> NttPolynomial {
        let mut r = *self;
        r += rhs;
        r
    }
}

impl ops::AddAssign<&Self> for NttPolynomial {
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        for (a, b) in self.0.iter_mut().zip(&rhs.0) {
            *a += b;
        }
    }
}
