//! `kpke-math` -- arithmetic and encoding core of ML-KEM's K-PKE.
//!
//! `no_std`, zero-allocation polynomial arithmetic over `Z_q[X]/(X^{256}+1)`.
//! Sub-modules cover modular reduction, the Number-Theoretic Transform, the
//! `ByteEncode`/`ByteDecode` codec, compression, deterministic sampling, and
//! typed polynomial / vector / matrix containers that keep coefficient form
//! and NTT form apart.

#![no_std]
#![deny(unsafe_code)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

#[cfg(test)]
extern crate std;

pub mod compress;
pub mod encode;
mod error;
pub mod ntt;
pub mod poly;
pub mod reduce;
pub mod sample;

pub use error::Error;

/// Polynomial ring degree.
pub const N: usize = 256;

/// Field modulus.
pub const Q: i16 = 3329;

/// Size in bytes of hashes and seeds.
pub const SYMBYTES: usize = 32;

/// Size in bytes of a serialised polynomial (12 bits * 256 / 8).
pub const POLYBYTES: usize = 384;
