//! `ByteEncode_d` / `ByteDecode_d`: little-endian bit packing of 256
//! coefficients into `32 * d` bytes.
//!
//! Widths below 12 are pure bit shuffles. Width 12 canonicalises on encode
//! and rejects coefficients `>= q` on decode.

use crate::{Error, N, Q, reduce::csubq};

/// Supported packing widths, in bits per coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Width {
    D1  = 1,
    D4  = 4,
    D5  = 5,
    D10 = 10,
    D11 = 11,
    D12 = 12,
}

impl Width {
    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Encoded size of one polynomial: `32 * d` bytes.
    #[must_use]
    pub const fn poly_bytes(self) -> usize {
        32 * self as usize
    }

    #[must_use]
    const fn mask(self) -> u16 {
        ((1u32 << self.bits()) - 1) as u16
    }
}

impl TryFrom<u8> for Width {
    type Error = Error;

    fn try_from(d: u8) -> Result<Self, Self::Error> {
        Ok(match d {
            1 => Self::D1,
            4 => Self::D4,
            5 => Self::D5,
            10 => Self::D10,
            11 => Self::D11,
            12 => Self::D12,
            _ => return Err(Error::InvalidParameter),
        })
    }
}

/// Packs `f` into `r[..width.poly_bytes()]`.
///
/// For `d < 12` each coefficient is taken modulo `2^d`. For `d = 12` each
/// coefficient in `(-q, q)` is first mapped into `[0, q)`.
pub fn byte_encode(r: &mut [u8], f: &[i16; N], width: Width) {
    debug_assert!(r.len() >= width.poly_bytes());
    let r = &mut r[..width.poly_bytes()];
    let masked = || f.map(|c| c as u16 & width.mask());
    match width {
        Width::D1 => encode_1(r, &masked()),
        Width::D4 => encode_4(r, &masked()),
        Width::D5 => encode_5(r, &masked()),
        Width::D10 => encode_10(r, &masked()),
        Width::D11 => encode_11(r, &masked()),
        Width::D12 => encode_12(r, &f.map(csubq)),
    }
}

/// Unpacks `a[..width.poly_bytes()]` into `f`.
///
/// # Errors
///
/// [`Error::KeyOverflow`] when `width` is 12 and a decoded coefficient is
/// `>= q`. `f` is fully written either way.
pub fn byte_decode(f: &mut [i16; N], a: &[u8], width: Width) -> Result<(), Error> {
    debug_assert!(a.len() >= width.poly_bytes());
    let a = &a[..width.poly_bytes()];
    let mut words = [0u16; N];
    let mut overflow = false;
    match width {
        Width::D1 => decode_1(&mut words, a),
        Width::D4 => decode_4(&mut words, a),
        Width::D5 => decode_5(&mut words, a),
        Width::D10 => decode_10(&mut words, a),
        Width::D11 => decode_11(&mut words, a),
        Width::D12 => overflow = decode_12(&mut words, a),
    }
    *f = words.map(|w| w as i16);
    if overflow { Err(Error::KeyOverflow) } else { Ok(()) }
}

fn encode_1(r: &mut [u8], a: &[u16; N]) {
    let (chunks, _) = a.as_chunks::<8>();
    for (byte, chunk) in r.iter_mut().zip(chunks) {
        let mut b = 0u8;
        for (&c, j) in chunk.iter().zip(0..8) {
            b |= (c as u8) << j;
        }
        *byte = b;
    }
}

fn decode_1(r: &mut [u16; N], a: &[u8]) {
    let (chunks, _) = r.as_chunks_mut::<8>();
    for (chunk, &byte) in chunks.iter_mut().zip(a) {
        for (b, j) in chunk.iter_mut().zip(0..8) {
            *b = ((byte >> j) & 1) as u16;
        }
    }
}

fn encode_4(r: &mut [u8], a: &[u16; N]) {
    let (chunks, _) = a.as_chunks::<2>();
    for (byte, &[lo, hi]) in r.iter_mut().zip(chunks) {
        *byte = (lo as u8) | ((hi as u8) << 4);
    }
}

fn decode_4(r: &mut [u16; N], a: &[u8]) {
    let (chunks, _) = r.as_chunks_mut::<2>();
    for (chunk, &byte) in chunks.iter_mut().zip(a) {
        *chunk = [byte & 0x0F, byte >> 4].map(u16::from);
    }
}

fn encode_5(r: &mut [u8], a: &[u16; N]) {
    let (in_chunks, _) = a.as_chunks::<8>();
    let (out_chunks, _) = r.as_chunks_mut::<5>();
    for (o, chunk) in out_chunks.iter_mut().zip(in_chunks) {
        let s = chunk.map(|x| x as u8);
        *o = [
            s[0] | (s[1] << 5),
            (s[1] >> 3) | (s[2] << 2) | (s[3] << 7),
            (s[3] >> 1) | (s[4] << 4),
            (s[4] >> 4) | (s[5] << 1) | (s[6] << 6),
            (s[6] >> 2) | (s[7] << 3),
        ];
    }
}

fn decode_5(r: &mut [u16; N], a: &[u8]) {
    let (in_chunks, _) = a.as_chunks::<5>();
    let (out_chunks, _) = r.as_chunks_mut::<8>();
    for (o, b) in out_chunks.iter_mut().zip(in_chunks) {
        *o = [
            (b[0] & 0x1F),
            ((b[0] >> 5) | ((b[1] & 0x03) << 3)),
            ((b[1] >> 2) & 0x1F),
            ((b[1] >> 7) | ((b[2] & 0x0F) << 1)),
            ((b[2] >> 4) | ((b[3] & 0x01) << 4)),
            ((b[3] >> 1) & 0x1F),
            ((b[3] >> 6) | ((b[4] & 0x07) << 2)),
            (b[4] >> 3),
        ]
        .map(u16::from);
    }
}

fn encode_10(r: &mut [u8], a: &[u16; N]) {
    let (in_chunks, _) = a.as_chunks::<4>();
    let (out_chunks, _) = r.as_chunks_mut::<5>();
    for (o, s) in out_chunks.iter_mut().zip(in_chunks) {
        *o = [
            s[0],
            ((s[0] >> 8) | (s[1] << 2)),
            ((s[1] >> 6) | (s[2] << 4)),
            ((s[2] >> 4) | (s[3] << 6)),
            (s[3] >> 2),
        ]
        .map(|x| x as u8);
    }
}

fn decode_10(r: &mut [u16; N], a: &[u8]) {
    let (in_chunks, _) = a.as_chunks::<5>();
    let (out_chunks, _) = r.as_chunks_mut::<4>();
    for (o, chunk) in out_chunks.iter_mut().zip(in_chunks) {
        let b = chunk.map(u16::from);
        *o = [
            (b[0] | ((b[1] & 0x03) << 8)),
            ((b[1] >> 2) | ((b[2] & 0x0F) << 6)),
            ((b[2] >> 4) | ((b[3] & 0x3F) << 4)),
            ((b[3] >> 6) | (b[4] << 2)),
        ];
    }
}

fn encode_11(r: &mut [u8], a: &[u16; N]) {
    let (in_chunks, _) = a.as_chunks::<8>();
    let (out_chunks, _) = r.as_chunks_mut::<11>();
    for (o, s) in out_chunks.iter_mut().zip(in_chunks) {
        *o = [
            s[0],
            ((s[0] >> 8) | (s[1] << 3)),
            ((s[1] >> 5) | (s[2] << 6)),
            (s[2] >> 2),
            ((s[2] >> 10) | (s[3] << 1)),
            ((s[3] >> 7) | (s[4] << 4)),
            ((s[4] >> 4) | (s[5] << 7)),
            (s[5] >> 1),
            ((s[5] >> 9) | (s[6] << 2)),
            ((s[6] >> 6) | (s[7] << 5)),
            (s[7] >> 3),
        ]
        .map(|x| x as u8);
    }
}

fn decode_11(r: &mut [u16; N], a: &[u8]) {
    let (in_chunks, _) = a.as_chunks::<11>();
    let (out_chunks, _) = r.as_chunks_mut::<8>();
    for (o, chunk) in out_chunks.iter_mut().zip(in_chunks) {
        let b = chunk.map(u16::from);
        *o = [
            (b[0] | ((b[1] & 0x07) << 8)),
            ((b[1] >> 3) | ((b[2] & 0x3F) << 5)),
            ((b[2] >> 6) | (b[3] << 2) | ((b[4] & 0x01) << 10)),
            ((b[4] >> 1) | ((b[5] & 0x0F) << 7)),
            ((b[5] >> 4) | ((b[6] & 0x7F) << 4)),
            ((b[6] >> 7) | (b[7] << 1) | ((b[8] & 0x03) << 9)),
            ((b[8] >> 2) | ((b[9] & 0x1F) << 6)),
            ((b[9] >> 5) | (b[10] << 3)),
        ];
    }
}

fn encode_12(r: &mut [u8], a: &[u16; N]) {
    let (in_chunks, _) = a.as_chunks::<2>();
    let (out_chunks, _) = r.as_chunks_mut::<3>();
    for (o, &[t0, t1]) in out_chunks.iter_mut().zip(in_chunks) {
        *o = [t0, (t0 >> 8) | (t1 << 4), t1 >> 4].map(|x| x as u8);
    }
}

/// Returns `true` if any decoded coefficient is `>= q`.
fn decode_12(r: &mut [u16; N], a: &[u8]) -> bool {
    let (in_chunks, _) = a.as_chunks::<3>();
    let (out_chunks, _) = r.as_chunks_mut::<2>();
    let mut overflow = false;
    for (o, chunk) in out_chunks.iter_mut().zip(in_chunks) {
        let b = chunk.map(u16::from);
        let d1 = b[0] | ((b[1] & 0x0F) << 8);
        let d2 = (b[1] >> 4) | (b[2] << 4);
        overflow |= d1 >= Q as u16 || d2 >= Q as u16;
        *o = [d1, d2];
    }
    overflow
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const ALL_WIDTHS: [Width; 6] = [Width::D1, Width::D4, Width::D5, Width::D10, Width::D11, Width::D12];

    #[test]
    fn width_from_u8() {
        for w in ALL_WIDTHS {
            assert_eq!(Width::try_from(w.bits() as u8), Ok(w));
        }
        for d in [0u8, 2, 3, 6, 7, 8, 9, 13, 16, 255] {
            assert_eq!(Width::try_from(d), Err(Error::InvalidParameter), "d={d}");
        }
    }

    #[test]
    fn poly_bytes_per_width() {
        let sizes = ALL_WIDTHS.map(Width::poly_bytes);
        assert_eq!(sizes, [32, 128, 160, 320, 352, 384]);
    }

    #[test]
    fn decode_inverts_encode_for_every_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x6b70_6b65);
        for w in ALL_WIDTHS {
            let bound = if w == Width::D12 { Q as u16 } else { 1u16 << w.bits() };
            for _ in 0..16 {
                let v: [i16; N] = core::array::from_fn(|_| rng.gen_range(0..bound) as i16);
                let mut buf = [0u8; 384];
                byte_encode(&mut buf, &v, w);
                assert!(buf[w.poly_bytes()..].iter().all(|&b| b == 0), "{w:?} wrote past its length");

                let mut back = [0i16; N];
                byte_decode(&mut back, &buf, w).unwrap();
                assert_eq!(back, v, "{w:?}");
            }
        }
    }

    #[test]
    fn encode_extremes() {
        for w in ALL_WIDTHS {
            let top = if w == Width::D12 { Q - 1 } else { ((1u32 << w.bits()) - 1) as i16 };
            let mut buf = [0u8; 384];
            byte_encode(&mut buf, &[top; N], w);
            let mut back = [0i16; N];
            byte_decode(&mut back, &buf, w).unwrap();
            assert_eq!(back, [top; N], "{w:?}");

            byte_encode(&mut buf, &[0; N], w);
            assert!(buf[..w.poly_bytes()].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn narrow_widths_keep_low_bits() {
        for w in ALL_WIDTHS.into_iter().filter(|&w| w != Width::D12) {
            let mut buf = [0u8; 384];
            byte_encode(&mut buf, &[-1; N], w);
            assert!(buf[..w.poly_bytes()].iter().all(|&b| b == 0xFF), "{w:?}");

            let high = (1i16 << w.bits()) | 1;
            byte_encode(&mut buf, &[high; N], w);
            let mut back = [0i16; N];
            byte_decode(&mut back, &buf, w).unwrap();
            assert_eq!(back, [1; N], "{w:?}");
        }
    }

    #[test]
    fn encode_1_bit_order() {
        let mut f = [0i16; N];
        f[0] = 1;
        f[9] = 1;
        f[255] = 1;
        let mut buf = [0u8; 32];
        byte_encode(&mut buf, &f, Width::D1);
        assert_eq!(buf[0], 0x01);
        assert_eq!(buf[1], 0x02);
        assert_eq!(buf[31], 0x80);
    }

    #[test]
    fn encode_12_layout() {
        let mut f = [0i16; N];
        f[0] = 0xABC;
        f[1] = 0x123;
        let mut buf = [0u8; 384];
        byte_encode(&mut buf, &f, Width::D12);
        assert_eq!(hex::encode(&buf[..3]), "bc3a12");
    }

    #[test]
    fn encode_12_canonicalises_negative_coefficients() {
        let mut f = [0i16; N];
        f[0] = -1;
        f[1] = -(Q - 1);
        let mut buf = [0u8; 384];
        byte_encode(&mut buf, &f, Width::D12);

        let mut back = [0i16; N];
        byte_decode(&mut back, &buf, Width::D12).unwrap();
        assert_eq!(back[0], Q - 1);
        assert_eq!(back[1], 1);
    }

    #[test]
    fn decode_12_rejects_overflow() {
        // 0xFFF in the first slot.
        let mut buf = [0u8; 384];
        buf[..3].copy_from_slice(&hex::decode("ff0f00").unwrap());
        let mut f = [0i16; N];
        assert_eq!(byte_decode(&mut f, &buf, Width::D12), Err(Error::KeyOverflow));
        assert_eq!(f[0], 0xFFF);

        // q itself (0xD01) in the second slot of the last pair.
        let mut buf = [0u8; 384];
        buf[381..].copy_from_slice(&hex::decode("0010d0").unwrap());
        assert_eq!(byte_decode(&mut f, &buf, Width::D12), Err(Error::KeyOverflow));
        assert_eq!(f[255], Q);

        // q - 1 passes.
        let mut buf = [0u8; 384];
        buf[381..].copy_from_slice(&hex::decode("0000d0").unwrap());
        assert_eq!(byte_decode(&mut f, &buf, Width::D12), Ok(()));
        assert_eq!(f[255], Q - 1);
    }

    #[test]
    fn narrow_widths_never_validate() {
        let buf = [0xFFu8; 384];
        let mut f = [0i16; N];
        for w in [Width::D1, Width::D4, Width::D5, Width::D10, Width::D11] {
            assert_eq!(byte_decode(&mut f, &buf, w), Ok(()));
            assert!(f.iter().all(|&c| c == ((1u32 << w.bits()) - 1) as i16));
        }
    }
}
