//! `kpke` -- the K-PKE component of ML-KEM (FIPS 203).
//!
//! Key generation, encryption and decryption for all three parameter sets
//! (ML-KEM-512, ML-KEM-768, ML-KEM-1024), built on the arithmetic and
//! encoding core in [`kpke_math`]. The FO transform and the ML-KEM
//! key/ciphertext blob layout live outside this crate.

#![deny(unsafe_code)]

pub mod hash;
pub mod params;
pub mod pke;
pub mod types;

pub use hash::Shake128Xof;
pub use kpke_math as math;
pub use params::{MlKem512, MlKem768, MlKem1024, ParameterSet};
pub use pke::{decrypt, encrypt, encrypt_with_xof, keygen, keygen_with_xof};
pub use types::DecryptionKey;

/// Errors returned by the K-PKE transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input byte slice has wrong length for this parameter set.
    InvalidLength {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
    /// Key bytes failed the FIPS 203 §7.2 modulus check.
    KeyOverflow,
    /// Matrix expansion ran out of XOF output.
    KeyLength,
    /// Unsupported encoding width.
    InvalidParameter,
}

impl From<math::Error> for Error {
    fn from(err: math::Error) -> Self {
        match err {
            math::Error::KeyOverflow => Self::KeyOverflow,
            math::Error::KeyLength => Self::KeyLength,
            math::Error::InvalidParameter => Self::InvalidParameter,
            math::Error::InvalidLength { expected, actual } => {
                Self::InvalidLength { expected, actual }
            }
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected}, got {actual}")
            }
            Self::KeyOverflow => f.write_str("key coefficient is not reduced modulo q"),
            Self::KeyLength => f.write_str("XOF output exhausted during matrix expansion"),
            Self::InvalidParameter => f.write_str("invalid parameter"),
        }
    }
}

impl core::error::Error for Error {}
