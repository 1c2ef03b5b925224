//! Sealed compression-width traits and compress/decompress operations.
//!
//! Each compression width (D=1,4,5,10,11) is a zero-sized marker type
//! implementing [`CompressWidth`], carrying its Barrett reciprocal so that
//! `Compress_d` needs no division by q. There is no width-12 marker: 12-bit
//! data is only ever encoded losslessly.

use crate::{
    N, Q, SYMBYTES,
    encode::{Width, byte_decode, byte_encode},
    reduce::csubq,
};

mod sealed {
    pub trait Sealed {}
}

/// Fixed-point reciprocal of q for one width:
/// `Compress_d(x) = (((x << d) + half_q) * multiplier) >> shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barrett {
    pub multiplier: u64,
    pub shift: u32,
    pub half_q: u64,
}

pub trait CompressWidthParams: sealed::Sealed {
    const D: u32;
    const WIDTH: Width;
    const POLY_BYTES: usize;
    const BARRETT: Barrett;
}

pub trait CompressWidth: CompressWidthParams {
    /// `Compress_d`: maps `x` in `(-q, q)` to `round(x * 2^d / q) mod 2^d`.
    #[inline]
    #[must_use]
    fn compress(x: i16) -> u16 {
        let Barrett { multiplier, shift, half_q } = Self::BARRETT;
        let x = csubq(x) as u64;
        let t = (((x << Self::D) + half_q) * multiplier) >> shift;
        (t & ((1 << Self::D) - 1)) as u16
    }

    /// `Decompress_d`: maps `y` in `[0, 2^d)` to `round(y * q / 2^d)`.
    #[inline]
    #[must_use]
    fn decompress(y: u16) -> i16 {
        let p = (y as u32) * (Q as u32);
        ((p >> Self::D) + ((p & ((1 << Self::D) - 1)) >> (Self::D - 1))) as i16
    }

    /// Compresses every coefficient and packs the result with
    /// `ByteEncode_d` into `r[..POLY_BYTES]`.
    fn compress_poly(r: &mut [u8], a: &[i16; N]) {
        let t = a.map(|c| Self::compress(c) as i16);
        byte_encode(r, &t, Self::WIDTH);
    }

    /// Unpacks `a[..POLY_BYTES]` with `ByteDecode_d` and decompresses every
    /// coefficient.
    fn decompress_poly(r: &mut [i16; N], a: &[u8]) {
        let decoded = byte_decode(r, a, Self::WIDTH);
        debug_assert!(decoded.is_ok(), "only 12-bit decoding can fail");
        for c in r.iter_mut() {
            *c = Self::decompress(*c as u16);
        }
    }
}

macro_rules! compress_width {
    ($($name:ident: $d:expr, $poly_bytes:expr, ($mult:expr, $shift:expr, $half_q:expr)),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct $name;
            impl sealed::Sealed for $name {}
            impl CompressWidthParams for $name {
                const D: u32 = $d;
                const WIDTH: Width = Width::$name;
                const POLY_BYTES: usize = $poly_bytes;
                const BARRETT: Barrett = Barrett { multiplier: $mult, shift: $shift, half_q: $half_q };
            }
            impl CompressWidth for $name {}
        )*
    };
}

compress_width!(
    D1: 1, SYMBYTES, (80635, 28, 1665),
    D4: 4, 128, (80635, 28, 1665),
    D5: 5, 160, (40318, 27, 1664),
    D10: 10, 320, (1290167, 32, 1665),
    D11: 11, 352, (645084, 31, 1664),
);
