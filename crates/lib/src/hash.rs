//! Hash and extendable-output function (XOF) adapters.
//!
//! Wraps the SHA-3 family as used by K-PKE (FIPS 203):
//! `G` = SHA3-512, `H` = SHA3-256, `PRF` = SHAKE-256, `XOF` = SHAKE-128.

use kpke_math::{SYMBYTES, sample::Xof};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256, digest::ExtendableOutput};

/// H(input) = SHA3-256(input) -> 32 bytes.
#[inline]
pub fn hash_h(input: impl AsRef<[u8]>) -> [u8; 32] {
    Sha3_256::digest(input).into()
}

/// G(input) = SHA3-512(input) -> 64 bytes.
#[inline]
pub fn hash_g(input: impl AsRef<[u8]>) -> [u8; 64] {
    Sha3_512::digest(input).into()
}

/// `PRF(seed, nonce) = SHAKE-256(seed || nonce)`, squeezed into `output`.
pub fn prf(seed: &[u8; SYMBYTES], nonce: u8, output: &mut [u8]) {
    let mut buf = [0; SYMBYTES + 1];
    buf[..SYMBYTES].copy_from_slice(seed);
    buf[SYMBYTES] = nonce;
    Shake256::digest_xof(buf, output);
}

/// SHAKE-128 as the matrix-expansion [`Xof`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Shake128Xof;

impl Xof for Shake128Xof {
    fn squeeze(&self, input: &[u8], output: &mut [u8]) {
        Shake128::digest_xof(input, output);
    }
}
