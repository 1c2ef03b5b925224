/// Failures reported by the decoding and sampling routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A 12-bit decoded coefficient was `>= q`; the bytes are not a valid
    /// ring element (FIPS 203 §7.2 modulus check).
    KeyOverflow,
    /// The rejection-sampling input ran out before 256 coefficients were
    /// accepted.
    KeyLength,
    /// Unsupported packing width.
    InvalidParameter,
    /// A vector buffer does not hold exactly `K` packed polynomials.
    InvalidLength {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::KeyOverflow => f.write_str("decoded coefficient is not reduced modulo q"),
            Self::KeyLength => f.write_str("sampling input exhausted before 256 coefficients"),
            Self::InvalidParameter => f.write_str("unsupported encoding width"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid buffer length: expected {expected}, got {actual}")
            }
        }
    }
}

impl core::error::Error for Error {}
