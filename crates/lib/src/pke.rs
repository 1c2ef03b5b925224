//! K-PKE: the IND-CPA public-key encryption scheme inside ML-KEM.
//!
//! All three transforms are deterministic. Randomness enters only through
//! the caller-supplied seeds `d` (key generation) and `r` (encryption).

use kpke_math::{
    SYMBYTES,
    poly::{NttMatrix, NttPolynomial, NttVector, Polynomial, Vector},
    sample::{CbdWidth, Xof},
};
use zeroize::Zeroize;

use crate::{
    Error,
    hash::{self, Shake128Xof},
    params::{ByteArray, ParameterSet},
    types::DecryptionKey,
};

fn check_len(what: &str, bytes: &[u8], expected: usize) -> Result<(), Error> {
    if bytes.len() == expected {
        return Ok(());
    }
    tracing::warn!(expected, actual = bytes.len(), "{what} has the wrong length");
    Err(Error::InvalidLength {
        expected,
        actual: bytes.len(),
    })
}

/// Draws one `CBD_eta` polynomial from `PRF(seed, nonce)` and advances the
/// nonce.
fn sample_noise<Eta: CbdWidth>(seed: &[u8; SYMBYTES], nonce: &mut u8) -> Polynomial {
    let mut buf = [0u8; 3 * kpke_math::N / 4];
    let buf = &mut buf[..Eta::BUF_BYTES];
    hash::prf(seed, *nonce, buf);
    *nonce += 1;
    let p = Polynomial::sample_cbd::<Eta>(buf);
    buf.zeroize();
    p
}

fn sample_noise_vec<Eta: CbdWidth, const K: usize>(
    seed: &[u8; SYMBYTES], nonce: &mut u8,
) -> Vector<K> {
    Vector::from(core::array::from_fn(|_| sample_noise::<Eta>(seed, nonce)))
}

// -- Key generation ----------------------------------------------------------

/// `K-PKE.KeyGen(d)` with SHAKE-128 matrix expansion.
///
/// Returns `(ek, dk)` with `ek = ByteEncode_12(t̂) || rho` and
/// `dk = ByteEncode_12(ŝ)`.
///
/// # Errors
///
/// [`Error::KeyLength`] if matrix expansion exhausts its XOF output.
pub fn keygen<P: ParameterSet>(d: &[u8; SYMBYTES]) -> Result<(P::EkArray, DecryptionKey<P>), Error> {
    keygen_with_xof::<P>(&Shake128Xof, d)
}

/// [`keygen`] with an injected matrix-expansion XOF.
///
/// # Errors
///
/// [`Error::KeyLength`] if matrix expansion exhausts its XOF output.
#[tracing::instrument(level = "debug", skip_all, fields(k = P::K))]
pub fn keygen_with_xof<P: ParameterSet>(
    xof: &impl Xof, d: &[u8; SYMBYTES],
) -> Result<(P::EkArray, DecryptionKey<P>), Error> {
    let mut ek = P::EkArray::zeroed();
    let mut dk = DecryptionKey::<P>::zeroed();
    match P::K {
        2 => keygen_inner::<P, 2>(xof, d, ek.as_mut(), dk.bytes.as_mut())?,
        3 => keygen_inner::<P, 3>(xof, d, ek.as_mut(), dk.bytes.as_mut())?,
        4 => keygen_inner::<P, 4>(xof, d, ek.as_mut(), dk.bytes.as_mut())?,
        _ => unreachable!(),
    }
    tracing::debug!("generated key pair");
    Ok((ek, dk))
}

fn keygen_inner<P: ParameterSet, const K: usize>(
    xof: &impl Xof, d: &[u8; SYMBYTES], ek: &mut [u8], dk: &mut [u8],
) -> Result<(), Error> {
    // G(d || k) -> (rho || sigma)
    let mut g_input = [0u8; SYMBYTES + 1];
    g_input[..SYMBYTES].copy_from_slice(d);
    g_input[SYMBYTES] = K as u8;
    let mut g = hash::hash_g(g_input);
    g_input.zeroize();

    let mut rho = [0u8; SYMBYTES];
    let mut sigma = [0u8; SYMBYTES];
    rho.copy_from_slice(&g[..SYMBYTES]);
    sigma.copy_from_slice(&g[SYMBYTES..]);
    g.zeroize();

    let a_hat = NttMatrix::<K>::generate(xof, &rho, false)?;

    let mut nonce = 0u8;
    let s = sample_noise_vec::<P::Eta1, K>(&sigma, &mut nonce);
    let e = sample_noise_vec::<P::Eta1, K>(&sigma, &mut nonce);
    sigma.zeroize();

    let mut s_hat = s.ntt();
    let mut t_hat = e.ntt();

    // t̂ = Â ∘ ŝ + ê
    a_hat.mul_vec_add(&s_hat, &mut t_hat);

    let packed = t_hat
        .to_bytes(&mut ek[..P::POLYVEC_BYTES])
        .and_then(|()| s_hat.to_bytes(dk));
    ek[P::POLYVEC_BYTES..].copy_from_slice(&rho);

    s_hat.zeroize();
    t_hat.zeroize();
    packed.map_err(Error::from)
}

// -- Encryption --------------------------------------------------------------

/// `K-PKE.Encrypt(ek, m, r)` with SHAKE-128 matrix expansion.
///
/// # Errors
///
/// - [`Error::InvalidLength`] if `ek` is not `P::EK_BYTES` long.
/// - [`Error::KeyOverflow`] if `ek` fails the modulus check.
/// - [`Error::KeyLength`] if matrix expansion exhausts its XOF output.
pub fn encrypt<P: ParameterSet>(
    ek: &[u8], m: &[u8; SYMBYTES], r: &[u8; SYMBYTES],
) -> Result<P::CtArray, Error> {
    encrypt_with_xof::<P>(&Shake128Xof, ek, m, r)
}

/// [`encrypt`] with an injected matrix-expansion XOF.
///
/// # Errors
///
/// See [`encrypt`].
#[tracing::instrument(level = "debug", skip_all, fields(k = P::K))]
pub fn encrypt_with_xof<P: ParameterSet>(
    xof: &impl Xof, ek: &[u8], m: &[u8; SYMBYTES], r: &[u8; SYMBYTES],
) -> Result<P::CtArray, Error> {
    check_len("encryption key", ek, P::EK_BYTES)?;
    let mut ct = P::CtArray::zeroed();
    match P::K {
        2 => encrypt_inner::<P, 2>(xof, ek, m, r, ct.as_mut())?,
        3 => encrypt_inner::<P, 3>(xof, ek, m, r, ct.as_mut())?,
        4 => encrypt_inner::<P, 4>(xof, ek, m, r, ct.as_mut())?,
        _ => unreachable!(),
    }
    Ok(ct)
}

fn encrypt_inner<P: ParameterSet, const K: usize>(
    xof: &impl Xof, ek: &[u8], m: &[u8; SYMBYTES], coins: &[u8; SYMBYTES], ct: &mut [u8],
) -> Result<(), Error> {
    let t_hat = NttVector::<K>::from_bytes(&ek[..P::POLYVEC_BYTES]).inspect_err(|_| {
        tracing::debug!("encryption key failed the modulus check");
    })?;
    let mut rho = [0u8; SYMBYTES];
    rho.copy_from_slice(&ek[P::POLYVEC_BYTES..]);

    let at_hat = NttMatrix::<K>::generate(xof, &rho, true)?;

    let mut nonce = 0u8;
    let r = sample_noise_vec::<P::Eta1, K>(coins, &mut nonce);
    let mut e1 = sample_noise_vec::<P::Eta2, K>(coins, &mut nonce);
    let mut e2 = sample_noise::<P::Eta2>(coins, &mut nonce);
    let mut r_hat = r.ntt();

    // u = NTT⁻¹(Âᵀ ∘ r̂) + e1
    let mut u_hat = NttVector::<K>::zero();
    at_hat.mul_vec_add(&r_hat, &mut u_hat);
    let mut u = u_hat.ntt_inverse();
    u += &e1;
    u.reduce();

    // v = NTT⁻¹(t̂ᵀ ∘ r̂) + e2 + Decompress_1(m)
    let mut v_hat = NttPolynomial::zero();
    t_hat.inner_product_add(&r_hat, &mut v_hat);
    v_hat.reduce();
    let mut v = v_hat.ntt_inverse();
    v += &e2;
    v += &Polynomial::from_message(m);
    v.reduce();

    let (c1, c2) = ct.split_at_mut(P::POLYVEC_COMPRESSED_BYTES);
    let packed = u.compress::<P::Du>(c1);
    v.compress::<P::Dv>(c2);

    r_hat.zeroize();
    e1.zeroize();
    e2.zeroize();
    v.zeroize();
    packed.map_err(Error::from)
}

// -- Decryption --------------------------------------------------------------

/// `K-PKE.Decrypt(dk, c)`.
///
/// # Errors
///
/// - [`Error::InvalidLength`] if `dk` or `ct` has the wrong length.
/// - [`Error::KeyOverflow`] if `dk` holds a coefficient `>= q`.
#[tracing::instrument(level = "debug", skip_all, fields(k = P::K))]
pub fn decrypt<P: ParameterSet>(dk: &[u8], ct: &[u8]) -> Result<[u8; SYMBYTES], Error> {
    check_len("decryption key", dk, P::DK_BYTES)?;
    check_len("ciphertext", ct, P::CT_BYTES)?;
    match P::K {
        2 => decrypt_inner::<P, 2>(dk, ct),
        3 => decrypt_inner::<P, 3>(dk, ct),
        4 => decrypt_inner::<P, 4>(dk, ct),
        _ => unreachable!(),
    }
}

fn decrypt_inner<P: ParameterSet, const K: usize>(
    dk: &[u8], ct: &[u8],
) -> Result<[u8; SYMBYTES], Error> {
    let (c1, c2) = ct.split_at(P::POLYVEC_COMPRESSED_BYTES);
    let u = Vector::<K>::decompress::<P::Du>(c1)?;
    let v = Polynomial::decompress::<P::Dv>(c2);
    let mut s_hat = NttVector::<K>::from_bytes(dk).inspect_err(|_| {
        tracing::debug!("decryption key failed the modulus check");
    })?;

    // w = v - NTT⁻¹(ŝᵀ ∘ NTT(u))
    let u_hat = u.ntt();
    let mut su_hat = NttPolynomial::zero();
    s_hat.inner_product_add(&u_hat, &mut su_hat);
    su_hat.reduce();
    let mut w = &v - &su_hat.ntt_inverse();
    w.reduce();

    let m = w.to_message();
    s_hat.zeroize();
    su_hat.zeroize();
    w.zeroize();
    Ok(m)
}

#[cfg(test)]
mod tests {
    use kpke_math::{compress::CompressWidthParams, sample::SplitMixXof};

    use super::*;
    use crate::params::{MlKem512, MlKem768, MlKem1024};

    fn roundtrip<P: ParameterSet>() {
        let d = [42u8; SYMBYTES];
        let (ek, dk) = keygen::<P>(&d).unwrap();

        for tag in 0..4u8 {
            let m: [u8; SYMBYTES] = core::array::from_fn(|i| (i as u8).wrapping_mul(tag + 3));
            let coins = [tag; SYMBYTES];
            let ct = encrypt::<P>(ek.as_ref(), &m, &coins).unwrap();
            let recovered = decrypt::<P>(dk.as_ref(), ct.as_ref()).unwrap();
            assert_eq!(m, recovered, "K-PKE roundtrip failed (tag={tag})");
        }
    }

    #[test]
    fn roundtrip_512() {
        roundtrip::<MlKem512>();
    }
    #[test]
    fn roundtrip_768() {
        roundtrip::<MlKem768>();
    }
    #[test]
    fn roundtrip_1024() {
        roundtrip::<MlKem1024>();
    }

    #[test]
    fn roundtrip_with_injected_xof() {
        let d = [7u8; SYMBYTES];
        let (ek, dk) = keygen_with_xof::<MlKem768>(&SplitMixXof, &d).unwrap();
        let m = [0xA5u8; SYMBYTES];
        let ct = encrypt_with_xof::<MlKem768>(&SplitMixXof, &ek, &m, &[1u8; SYMBYTES]).unwrap();
        assert_eq!(decrypt::<MlKem768>(dk.as_ref(), &ct).unwrap(), m);

        // The key was expanded with a different XOF, so SHAKE-128 encryption
        // under it does not decrypt.
        let ct = encrypt::<MlKem768>(&ek, &m, &[1u8; SYMBYTES]).unwrap();
        assert_ne!(decrypt::<MlKem768>(dk.as_ref(), &ct).unwrap(), m);
    }

    #[test]
    fn keygen_returns_self_wiping_decryption_key() {
        fn wiped_on_drop<T: zeroize::ZeroizeOnDrop>(_: &T) {}
        let (_, dk) = keygen::<MlKem512>(&[4u8; SYMBYTES]).unwrap();
        wiped_on_drop(&dk);
        assert_eq!(dk.as_ref().len(), MlKem512::DK_BYTES);
    }

    #[test]
    fn noise_vectors_use_consecutive_nonces() {
        let seed = [3u8; SYMBYTES];
        let mut nonce = 0u8;
        let v = sample_noise_vec::<kpke_math::sample::Eta2, 3>(&seed, &mut nonce);
        assert_eq!(nonce, 3);

        let mut nonce = 2u8;
        let third = sample_noise::<kpke_math::sample::Eta2>(&seed, &mut nonce);
        assert_eq!(v.polys()[2], third);
    }

    #[test]
    fn encrypt_rejects_unreduced_key() {
        let (mut ek, _) = keygen::<MlKem512>(&[9u8; SYMBYTES]).unwrap();
        // Last coefficient of the second row set to 0xFFF.
        ek[MlKem512::POLYVEC_BYTES - 2] |= 0xF0;
        ek[MlKem512::POLYVEC_BYTES - 1] = 0xFF;
        let res = encrypt::<MlKem512>(&ek, &[0u8; SYMBYTES], &[5u8; SYMBYTES]);
        assert_eq!(res.unwrap_err(), Error::KeyOverflow);
    }

    #[test]
    fn ciphertext_layout_follows_widths() {
        let (ek, _) = keygen::<MlKem1024>(&[9u8; SYMBYTES]).unwrap();
        let ct = encrypt::<MlKem1024>(&ek, &[0u8; SYMBYTES], &[5u8; SYMBYTES]).unwrap();
        let c2_len = <<MlKem1024 as ParameterSet>::Dv as CompressWidthParams>::POLY_BYTES;
        assert_eq!(ct.len(), MlKem1024::POLYVEC_COMPRESSED_BYTES + c2_len);
    }
}
