//! Byte-for-byte comparison against the RustCrypto `ml-kem` crate.
//!
//! ML-KEM's encapsulation key is exactly the K-PKE encryption key, its
//! decapsulation key starts with the K-PKE decryption key, and its
//! ciphertext is `K-PKE.Encrypt(ek, m, r)` with `(K, r) = G(m || H(ek))`.
//! Deterministic operations must therefore produce identical bytes.

use kpke::{
    MlKem512, MlKem768, MlKem1024, ParameterSet, decrypt, encrypt,
    hash::{hash_g, hash_h},
    keygen,
    params::SYMBYTES,
};
use ml_kem::{EncapsulateDeterministic, EncodedSizeUser, KemCore};

fn keygen_coins(tag: u8) -> ([u8; 32], [u8; 32]) {
    let full: [u8; 64] = core::array::from_fn(|i| (i as u8).wrapping_add(tag.wrapping_mul(37)));
    (
        full[..32].try_into().unwrap(),
        full[32..].try_into().unwrap(),
    )
}

fn enc_coins(tag: u8) -> [u8; 32] {
    core::array::from_fn(|i| (i as u8).wrapping_add(tag.wrapping_mul(53)))
}

/// `(K, r) = G(m || H(ek))` as ML-KEM.Encaps derives them.
fn encaps_derive(m: &[u8; SYMBYTES], ek: &[u8]) -> ([u8; 32], [u8; 32]) {
    let mut input = [0u8; 2 * SYMBYTES];
    input[..SYMBYTES].copy_from_slice(m);
    input[SYMBYTES..].copy_from_slice(&hash_h(ek));
    let g = hash_g(input);
    (g[..32].try_into().unwrap(), g[32..].try_into().unwrap())
}

macro_rules! compare_tests {
    ($ours:ty, $theirs:ty, $mod:ident) => {
        mod $mod {
            use super::*;

            #[test]
            fn keygen_bytes_match() {
                for tag in 0..8u8 {
                    let (d, z) = keygen_coins(tag);
                    let (our_ek, our_dk) = keygen::<$ours>(&d).unwrap();
                    let (rc_dk, rc_ek) = <$theirs>::generate_deterministic(&d.into(), &z.into());

                    let rc_ek = rc_ek.as_bytes();
                    let rc_dk = rc_dk.as_bytes();
                    assert_eq!(&our_ek[..], &rc_ek[..], "ek mismatch (tag={tag})");
                    assert_eq!(
                        our_dk.as_ref(),
                        &rc_dk[..<$ours>::DK_BYTES],
                        "dk mismatch (tag={tag})"
                    );
                }
            }

            #[test]
            fn encrypt_bytes_match() {
                let (d, z) = keygen_coins(0);
                let (our_ek, _) = keygen::<$ours>(&d).unwrap();
                let (_, rc_ek) = <$theirs>::generate_deterministic(&d.into(), &z.into());

                for tag in 0..8u8 {
                    let m = enc_coins(tag);
                    let (shared, r) = encaps_derive(&m, &our_ek[..]);
                    let our_ct = encrypt::<$ours>(&our_ek[..], &m, &r).unwrap();
                    let (rc_ct, rc_ss) = rc_ek.encapsulate_deterministic(&m.into()).unwrap();

                    assert_eq!(&our_ct[..], &rc_ct[..], "ct mismatch (tag={tag})");
                    assert_eq!(&shared[..], &rc_ss[..], "K mismatch (tag={tag})");
                }
            }

            #[test]
            fn decrypt_recovers_their_message() {
                for tag in 0..8u8 {
                    let (d, z) = keygen_coins(tag);
                    let m = enc_coins(tag);

                    let (_, our_dk) = keygen::<$ours>(&d).unwrap();
                    let (_, rc_ek) = <$theirs>::generate_deterministic(&d.into(), &z.into());
                    let (rc_ct, _) = rc_ek.encapsulate_deterministic(&m.into()).unwrap();

                    let recovered = decrypt::<$ours>(our_dk.as_ref(), &rc_ct[..]).unwrap();
                    assert_eq!(recovered, m, "decrypt mismatch (tag={tag})");
                }
            }
        }
    };
}

compare_tests!(MlKem512, ml_kem::MlKem512, mlkem512);
compare_tests!(MlKem768, ml_kem::MlKem768, mlkem768);
compare_tests!(MlKem1024, ml_kem::MlKem1024, mlkem1024);
