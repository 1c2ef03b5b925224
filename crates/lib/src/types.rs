//! Owned K-PKE key material.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::params::{ByteArray, ParameterSet};

/// K-PKE decryption key `ByteEncode_12(ŝ)`, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DecryptionKey<P: ParameterSet> {
    pub(crate) bytes: P::DkArray,
}

impl<P: ParameterSet> DecryptionKey<P> {
    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: P::DkArray::zeroed(),
        }
    }

    pub fn from_bytes(bytes: &P::DkArray) -> Self {
        Self {
            bytes: bytes.clone(),
        }
    }
}

impl<P: ParameterSet> From<&P::DkArray> for DecryptionKey<P> {
    #[inline]
    fn from(arr: &P::DkArray) -> Self {
        Self { bytes: arr.clone() }
    }
}

impl<P: ParameterSet> AsRef<[u8]> for DecryptionKey<P> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl<P: ParameterSet> Clone for DecryptionKey<P> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
        }
    }
}

impl<P: ParameterSet> core::fmt::Debug for DecryptionKey<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecryptionKey")
            .field("len", &self.bytes.as_ref().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MlKem512;

    #[test]
    fn zeroize_clears_bytes() {
        let mut dk = DecryptionKey::<MlKem512>::from_bytes(&[0xA5; 768]);
        assert!(dk.as_ref().iter().all(|&b| b == 0xA5));
        dk.zeroize();
        assert!(dk.as_ref().iter().all(|&b| b == 0));
    }

    #[test]
    fn debug_hides_key_bytes() {
        let dk = DecryptionKey::<MlKem512>::from_bytes(&[0x42; 768]);
        let shown = format!("{dk:?}");
        assert_eq!(shown, "DecryptionKey { len: 768, .. }");
    }
}
