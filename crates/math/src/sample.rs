//! Deterministic sampling: sealed CBD noise traits, rejection sampling of
//! uniform coefficients (`Parse`), and the injected XOF capability.

use crate::{Error, N, Q};

mod sealed {
    pub trait Sealed {}
}

/// Sealed trait for CBD noise sampling width.
pub trait CbdWidth: sealed::Sealed {
    const ETA: usize;
    /// `64 * eta` bytes of PRF output per polynomial.
    const BUF_BYTES: usize;

    /// Samples `CBD_eta` from `buf[..BUF_BYTES]`. Output lies in `[-eta, eta]`.
    fn sample(r: &mut [i16; N], buf: &[u8]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Eta2;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Eta3;

impl sealed::Sealed for Eta2 {}
impl CbdWidth for Eta2 {
    const ETA: usize = 2;
    const BUF_BYTES: usize = 2 * N / 4;

    #[inline]
    fn sample(r: &mut [i16; N], buf: &[u8]) {
        debug_assert!(buf.len() >= Self::BUF_BYTES);
        let (in_chunks, _) = buf.as_chunks::<2>();
        let (out_chunks, _) = r.as_chunks_mut::<4>();
        for (o, &b) in out_chunks.iter_mut().zip(in_chunks) {
            let t = u16::from_le_bytes(b);
            let d = (t & 0x5555) + ((t >> 1) & 0x5555);
            for (c, j) in o.iter_mut().zip(0..4) {
                let a = ((d >> (4 * j)) & 3) as i16;
                let b = ((d >> (4 * j + 2)) & 3) as i16;
                *c = a - b;
            }
        }
    }
}

impl sealed::Sealed for Eta3 {}
impl CbdWidth for Eta3 {
    const ETA: usize = 3;
    const BUF_BYTES: usize = 3 * N / 4;

    #[inline]
    fn sample(r: &mut [i16; N], buf: &[u8]) {
        debug_assert!(buf.len() >= Self::BUF_BYTES);
        let (in_chunks, _) = buf.as_chunks::<3>();
        let (out_chunks, _) = r.as_chunks_mut::<4>();
        for (o, &[b0, b1, b2]) in out_chunks.iter_mut().zip(in_chunks) {
            let t = u32::from_le_bytes([b0, b1, b2, 0]);
            let d = (t & 0x0024_9249) + ((t >> 1) & 0x0024_9249) + ((t >> 2) & 0x0024_9249);
            for (c, j) in o.iter_mut().zip(0..4) {
                let a = ((d >> (6 * j)) & 7) as i16;
                let b = ((d >> (6 * j + 3)) & 7) as i16;
                *c = a - b;
            }
        }
    }
}

/// `Parse`: rejection-samples 256 coefficients in `[0, q)` from `bytes`.
///
/// Each 3-byte group yields two 12-bit candidates; candidates `>= q` are
/// dropped.
///
/// # Errors
///
/// [`Error::KeyLength`] if `bytes` runs out before 256 coefficients are
/// accepted.
pub fn parse(r: &mut [i16; N], bytes: &[u8]) -> Result<(), Error> {
    let mut ctr = 0;
    let (groups, _) = bytes.as_chunks::<3>();
    for &[b0, b1, b2] in groups {
        let [b0, b1, b2] = [b0, b1, b2].map(u16::from);
        let d1 = b0 | ((b1 & 0x0F) << 8);
        let d2 = (b1 >> 4) | (b2 << 4);
        if d1 < Q as u16 {
            r[ctr] = d1 as i16;
            ctr += 1;
        }
        if ctr < N && d2 < Q as u16 {
            r[ctr] = d2 as i16;
            ctr += 1;
        }
        if ctr == N {
            return Ok(());
        }
    }
    Err(Error::KeyLength)
}

/// SHAKE-128 rate in bytes.
pub const XOF_BLOCK_BYTES: usize = 168;

/// XOF output drawn per matrix entry: five SHAKE-128 blocks.
pub const XOF_OUTPUT_BYTES: usize = 5 * XOF_BLOCK_BYTES;

/// Extendable-output function used to expand the matrix seed.
///
/// Implementations must be deterministic: equal inputs give equal outputs,
/// and distinct inputs give independent-looking streams.
pub trait Xof {
    /// Absorbs `input` and squeezes `output.len()` bytes into `output`.
    fn squeeze(&self, input: &[u8], output: &mut [u8]);
}

impl<X: Xof + ?Sized> Xof for &X {
    fn squeeze(&self, input: &[u8], output: &mut [u8]) {
        (**self).squeeze(input, output);
    }
}

/// Non-cryptographic deterministic [`Xof`] for tests and benchmarks.
///
/// Folds the input into a 64-bit state with FNV-1a and expands it with
/// SplitMix64.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitMixXof;

impl SplitMixXof {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

    const fn mix(mut z: u64) -> u64 {
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl Xof for SplitMixXof {
    fn squeeze(&self, input: &[u8], output: &mut [u8]) {
        let mut state = input
            .iter()
            .fold(Self::FNV_OFFSET, |h, &b| (h ^ b as u64).wrapping_mul(Self::FNV_PRIME));
        for chunk in output.chunks_mut(8) {
            state = state.wrapping_add(Self::GOLDEN_GAMMA);
            let word = Self::mix(state).to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}
