use core::ops;

use zeroize::Zeroize;

use super::{NttPolynomial, Polynomial};
use crate::{
    Error, POLYBYTES, SYMBYTES,
    compress::CompressWidth,
    sample::{XOF_OUTPUT_BYTES, Xof},
};

const fn check_len(actual: usize, expected: usize) -> Result<(), Error> {
    if actual == expected { Ok(()) } else { Err(Error::InvalidLength { expected, actual }) }
}

/// A vector of `K` polynomials in standard (coefficient) form.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct Vector<const K: usize> {
    pub(crate) polys: [Polynomial; K],
}

/// A vector of `K` polynomials in NTT domain.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct NttVector<const K: usize> {
    pub(crate) polys: [NttPolynomial; K],
}

impl<const K: usize> Vector<K> {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            polys: [Polynomial::zero(); K],
        }
    }

    #[must_use]
    pub fn ntt(self) -> NttVector<K> {
        let polys = self.polys.map(Polynomial::ntt);
        NttVector { polys }
    }

    pub fn reduce(&mut self) {
        for p in &mut self.polys {
            p.reduce();
        }
    }

    /// Compress every row to `D` bits: `K * D::POLY_BYTES` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] unless `r` is exactly `K * D::POLY_BYTES`.
    pub fn compress<D: CompressWidth>(&self, r: &mut [u8]) -> Result<(), Error> {
        check_len(r.len(), K * D::POLY_BYTES)?;
        for (chunk, p) in r.chunks_exact_mut(D::POLY_BYTES).zip(&self.polys) {
            p.compress::<D>(chunk);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`Error::InvalidLength`] unless `a` is exactly `K * D::POLY_BYTES`.
    pub fn decompress<D: CompressWidth>(a: &[u8]) -> Result<Self, Error> {
        check_len(a.len(), K * D::POLY_BYTES)?;
        let mut v = Self::zero();
        for (p, chunk) in v.polys.iter_mut().zip(a.chunks_exact(D::POLY_BYTES)) {
            *p = Polynomial::decompress::<D>(chunk);
        }
        Ok(v)
    }

    #[must_use]
    pub const fn polys(&self) -> &[Polynomial; K] {
        &self.polys
    }

    #[must_use]
    pub const fn polys_mut(&mut self) -> &mut [Polynomial; K] {
        &mut self.polys
    }
}

impl<const K: usize> From<[Polynomial; K]> for Vector<K> {
    fn from(polys: [Polynomial; K]) -> Self {
        Self { polys }
    }
}

impl<const K: usize> NttVector<K> {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            polys: [NttPolynomial::zero(); K],
        }
    }

    #[must_use]
    pub fn ntt_inverse(self) -> Vector<K> {
        let polys = self.polys.map(NttPolynomial::ntt_inverse);
        Vector { polys }
    }

    pub fn reduce(&mut self) {
        for p in &mut self.polys {
            p.reduce();
        }
    }

    /// `out += sum_i(self[i] ∘ other[i])` in NTT domain, unreduced.
    pub fn inner_product_add(&self, other: &Self, out: &mut NttPolynomial) {
        for (a, b) in self.polys.iter().zip(&other.polys) {
            out.basemul_add(a, b);
        }
    }

    /// Serialize to `K * 384` bytes (12-bit packing).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] unless `r` is exactly `K * 384` bytes.
    pub fn to_bytes(&self, r: &mut [u8]) -> Result<(), Error> {
        check_len(r.len(), K * POLYBYTES)?;
        for (chunk, p) in r.chunks_exact_mut(POLYBYTES).zip(&self.polys) {
            p.to_bytes(chunk);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// - [`Error::InvalidLength`] unless `a` is exactly `K * 384` bytes.
    /// - [`Error::KeyOverflow`] if any coefficient is `>= q`.
    pub fn from_bytes(a: &[u8]) -> Result<Self, Error> {
        check_len(a.len(), K * POLYBYTES)?;
        let mut v = Self::zero();
        for (p, chunk) in v.polys.iter_mut().zip(a.chunks_exact(POLYBYTES)) {
            *p = NttPolynomial::from_bytes(chunk)?;
        }
        Ok(v)
    }

    #[must_use]
    pub const fn polys(&self) -> &[NttPolynomial; K] {
        &self.polys
    }

    #[must_use]
    pub const fn polys_mut(&mut self) -> &mut [NttPolynomial; K] {
        &mut self.polys
    }
}

impl<const K: usize> From<[NttPolynomial; K]> for NttVector<K> {
    fn from(polys: [NttPolynomial; K]) -> Self {
        Self { polys }
    }
}

/// K x K matrix of NTT-domain polynomials (public matrix A), row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NttMatrix<const K: usize> {
    pub(crate) rows: [NttVector<K>; K],
}

impl<const K: usize> NttMatrix<K> {
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            rows: core::array::from_fn(|_| NttVector::zero()),
        }
    }

    /// Expands `rho` into `Â` by rejection sampling each entry.
    ///
    /// Entry `(i, j)` is parsed from `xof(rho || i || j)` when `transposed`
    /// (the matrix an encryptor multiplies by) and from `xof(rho || j || i)`
    /// otherwise (the key generator's matrix).
    ///
    /// # Errors
    ///
    /// [`Error::KeyLength`] if an entry exhausts its XOF output.
    pub fn generate(xof: &impl Xof, rho: &[u8; SYMBYTES], transposed: bool) -> Result<Self, Error> {
        let mut matrix = Self::zero();
        let mut input = [0u8; SYMBYTES + 2];
        input[..SYMBYTES].copy_from_slice(rho);
        let mut buf = [0u8; XOF_OUTPUT_BYTES];

        for (i, row) in matrix.rows.iter_mut().enumerate() {
            for (j, entry) in row.polys.iter_mut().enumerate() {
                let (b0, b1) = if transposed { (i, j) } else { (j, i) };
                input[SYMBYTES] = b0 as u8;
                input[SYMBYTES + 1] = b1 as u8;
                xof.squeeze(&input, &mut buf);
                *entry = NttPolynomial::sample_uniform(&buf)?;
            }
        }
        Ok(matrix)
    }

    #[must_use]
    pub const fn entry(&self, i: usize, j: usize) -> &NttPolynomial {
        &self.rows[i].polys[j]
    }

    #[must_use]
    pub const fn rows(&self) -> &[NttVector<K>; K] {
        &self.rows
    }

    /// `out[i] += sum_j(A[i][j] ∘ v[j])`, then Barrett-reduce each row.
    pub fn mul_vec_add(&self, v: &NttVector<K>, out: &mut NttVector<K>) {
        for (acc, row) in out.polys.iter_mut().zip(&self.rows) {
            row.inner_product_add(v, acc);
            acc.reduce();
        }
    }

    /// `out[i] += sum_j(A[j][i] ∘ v[j])`, then Barrett-reduce each row.
    pub fn transpose_mul_vec_add(&self, v: &NttVector<K>, out: &mut NttVector<K>) {
        for (i, acc) in out.polys.iter_mut().enumerate() {
            for (j, vj) in v.polys.iter().enumerate() {
                acc.basemul_add(self.entry(j, i), vj);
            }
            acc.reduce();
        }
    }

    /// `A ∘ v` into a fresh vector.
    #[must_use]
    pub fn mul_vec(&self, v: &NttVector<K>) -> NttVector<K> {
        let mut result = NttVector::zero();
        self.mul_vec_add(v, &mut result);
        result
    }
}

impl<'b, const K: usize> ops::Add<&'b Vector<K>> for &Vector<K> {
    type Output = Vector<K>;
    fn add(self, rhs: &'b Vector<K>) -> Vector<K> {
        let mut r = self.clone();
        r += rhs;
        r
    }
}

impl<const K: usize> ops::AddAssign<&Self> for Vector<K> {
    fn add_assign(&mut self, rhs: &Self) {
        for (a, b) in self.polys.iter_mut().zip(&rhs.polys) {
            *a += b;
        }
    }
}

impl<const K: usize> ops::AddAssign<&Self> for NttVector<K> {
    fn add_assign(&mut self, rhs: &Self) {
        for (a, b) in self.polys.iter_mut().zip(&rhs.polys) {
            *a += b;
        }
    }
}

impl<const K: usize> Default for Vector<K> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const K: usize> Default for NttVector<K> {
    fn default() -> Self {
        Self::zero()
    }
}
