//! Matrix expansion, noise sampling and the encoders driven together with
//! SHAKE as the XOF and PRF.

use kpke::{
    Shake128Xof,
    hash::prf,
    math::{
        N, Q, SYMBYTES,
        compress::{CompressWidth, CompressWidthParams, D10},
        encode::{Width, byte_decode},
        poly::{NttMatrix, NttPolynomial, NttVector, Polynomial, Vector},
        sample::{CbdWidth, Eta2, XOF_OUTPUT_BYTES, Xof},
    },
};

fn xof_entry(rho: &[u8; SYMBYTES], x: u8, y: u8) -> NttPolynomial {
    let mut input = [0u8; SYMBYTES + 2];
    input[..SYMBYTES].copy_from_slice(rho);
    input[SYMBYTES] = x;
    input[SYMBYTES + 1] = y;
    let mut buf = [0u8; XOF_OUTPUT_BYTES];
    Shake128Xof.squeeze(&input, &mut buf);
    NttPolynomial::sample_uniform(&buf).unwrap()
}

fn noise_vec<const K: usize>(seed: &[u8; SYMBYTES], first_nonce: u8) -> Vector<K> {
    Vector::from(core::array::from_fn(|i| {
        let mut buf = [0u8; Eta2::BUF_BYTES];
        prf(seed, first_nonce + i as u8, &mut buf);
        Polynomial::sample_cbd::<Eta2>(&buf)
    }))
}

#[test]
fn shake128_parse_known_answers() {
    let rho = [0u8; SYMBYTES];

    let a00 = xof_entry(&rho, 0, 0);
    assert_eq!(&a00.coeffs()[..8], &[2944, 3017, 340, 1184, 3243, 1708, 2458, 2285]);
    assert_eq!(&a00.coeffs()[N - 4..], &[3223, 2753, 355, 2067]);

    let a10 = xof_entry(&rho, 1, 0);
    assert_eq!(&a10.coeffs()[..8], &[1389, 3170, 1440, 2480, 679, 1601, 3244, 1600]);

    let a01 = xof_entry(&rho, 0, 1);
    assert_eq!(&a01.coeffs()[..8], &[3236, 77, 320, 991, 2431, 3064, 1471, 615]);
}

#[test]
fn generated_matrix_uses_swapped_indices_for_keygen() {
    let rho = [0u8; SYMBYTES];
    let a = NttMatrix::<2>::generate(&Shake128Xof, &rho, false).unwrap();
    let at = NttMatrix::<2>::generate(&Shake128Xof, &rho, true).unwrap();

    // Key generation reads entry (i, j) from XOF(rho || j || i).
    assert_eq!(a.entry(0, 1), &xof_entry(&rho, 1, 0));
    assert_eq!(a.entry(1, 0), &xof_entry(&rho, 0, 1));
    // Encryption reads entry (i, j) from XOF(rho || i || j).
    assert_eq!(at.entry(0, 1), &xof_entry(&rho, 0, 1));
    assert_eq!(at.entry(1, 1), a.entry(1, 1));
}

#[test]
fn public_vector_encodes_and_compresses_exactly() {
    const K: usize = 2;
    let seed = [0u8; SYMBYTES];

    let a = NttMatrix::<K>::generate(&Shake128Xof, &seed, false).unwrap();
    let s_hat = noise_vec::<K>(&seed, 0).ntt();
    let mut t_hat = noise_vec::<K>(&seed, K as u8).ntt();
    a.mul_vec_add(&s_hat, &mut t_hat);

    for p in t_hat.polys() {
        assert!(p.coeffs().iter().all(|&c| c.abs() <= Q / 2), "rows are Barrett-reduced");
    }

    // 12-bit round trip of the NTT-domain vector.
    let mut packed = [0u8; K * 384];
    t_hat.to_bytes(&mut packed).unwrap();
    let decoded = NttVector::<K>::from_bytes(&packed).unwrap();
    for (got, want) in decoded.polys().iter().zip(t_hat.polys()) {
        for (&g, &w) in got.coeffs().iter().zip(want.coeffs()) {
            assert!((0..Q).contains(&g));
            assert_eq!((g - w).rem_euclid(Q), 0);
        }
    }
    let mut repacked = [0u8; K * 384];
    decoded.to_bytes(&mut repacked).unwrap();
    assert_eq!(packed, repacked);

    // 10-bit compression of the coefficient-form vector: 640 bytes that
    // decode to exactly the compressed words.
    let t = t_hat.ntt_inverse();
    let mut compressed = [0u8; K * D10::POLY_BYTES];
    assert_eq!(compressed.len(), 640);
    t.compress::<D10>(&mut compressed).unwrap();

    for (chunk, p) in compressed.chunks_exact(D10::POLY_BYTES).zip(t.polys()) {
        let mut words = [0i16; N];
        byte_decode(&mut words, chunk, Width::D10).unwrap();
        for (&w, &c) in words.iter().zip(p.coeffs()) {
            assert_eq!(w as u16, D10::compress(c));
        }
    }
}
