//! K-PKE parameter definitions. [`ParameterSet`] trait and marker types
//! [`MlKem512`], [`MlKem768`], [`MlKem1024`].

pub use kpke_math::{N, POLYBYTES, Q, SYMBYTES};
use kpke_math::{
    compress::{CompressWidth, D4, D5, D10, D11},
    sample::{CbdWidth, Eta2, Eta3},
};
use zeroize::Zeroize;

/// Fixed-size byte buffer usable as a K-PKE key/ciphertext backing store.
pub trait ByteArray:
    AsRef<[u8]> + AsMut<[u8]> + Clone + core::fmt::Debug + Zeroize + Send + Sync + 'static {
    /// Array length in bytes.
    const LEN: usize;

    /// Return a zero-filled instance.
    fn zeroed() -> Self;
}

impl<const SIZE: usize> ByteArray for [u8; SIZE] {
    const LEN: usize = SIZE;

    #[inline]
    fn zeroed() -> Self {
        [0u8; SIZE]
    }
}

/// K-PKE parameter set implemented by MlKem512, MlKem768, MlKem1024.
pub trait ParameterSet: 'static {
    /// Module rank (k = 2, 3, or 4).
    const K: usize;
    /// CBD noise width for the key-generation secrets and the encryption
    /// vector `r`.
    type Eta1: CbdWidth;
    /// CBD noise width for the encryption errors `e1` and `e2`.
    type Eta2: CbdWidth;
    /// Compression width of the ciphertext vector `u`.
    type Du: CompressWidth;
    /// Compression width of the ciphertext polynomial `v`.
    type Dv: CompressWidth;

    /// K * POLYBYTES - serialised NTT-domain vector.
    const POLYVEC_BYTES: usize;
    /// Compressed bytes for one polynomial (N * d_v / 8).
    const POLY_COMPRESSED_BYTES: usize;
    /// Compressed bytes for the polynomial vector (K * N * d_u / 8).
    const POLYVEC_COMPRESSED_BYTES: usize;
    /// Plaintext bytes (= [`SYMBYTES`]).
    const MSG_BYTES: usize = SYMBYTES;
    /// Encryption key bytes (POLYVEC_BYTES + SYMBYTES).
    const EK_BYTES: usize;
    /// Decryption key bytes (`POLYVEC_BYTES`).
    const DK_BYTES: usize;
    /// Ciphertext bytes.
    const CT_BYTES: usize;

    /// Backing array for encryption keys.
    type EkArray: ByteArray;
    /// Backing array for decryption keys.
    type DkArray: ByteArray;
    /// Backing array for ciphertexts.
    type CtArray: ByteArray;
}

/// ML-KEM-512 parameter set (k = 2, NIST security level 1).
#[derive(Debug, Clone, Copy)]
pub struct MlKem512;

impl ParameterSet for MlKem512 {
    const K: usize = 2;
    type Eta1 = Eta3;
    type Eta2 = Eta2;
    type Du = D10;
    type Dv = D4;

    const POLYVEC_BYTES: usize = 768; // 2 * 384
    const POLY_COMPRESSED_BYTES: usize = 128; // 256 * 4 / 8
    const POLYVEC_COMPRESSED_BYTES: usize = 640; // 2 * 256 * 10 / 8
    const EK_BYTES: usize = 800; // 768 + 32
    const DK_BYTES: usize = 768;
    const CT_BYTES: usize = 768; // 640 + 128

    type EkArray = [u8; 800];
    type DkArray = [u8; 768];
    type CtArray = [u8; 768];
}

/// ML-KEM-768 parameter set (k = 3, NIST security level 3).
#[derive(Debug, Clone, Copy)]
pub struct MlKem768;

impl ParameterSet for MlKem768 {
    const K: usize = 3;
    type Eta1 = Eta2;
    type Eta2 = Eta2;
    type Du = D10;
    type Dv = D4;

    const POLYVEC_BYTES: usize = 1152; // 3 * 384
    const POLY_COMPRESSED_BYTES: usize = 128; // 256 * 4 / 8
    const POLYVEC_COMPRESSED_BYTES: usize = 960; // 3 * 256 * 10 / 8
    const EK_BYTES: usize = 1184; // 1152 + 32
    const DK_BYTES: usize = 1152;
    const CT_BYTES: usize = 1088; // 960 + 128

    type EkArray = [u8; 1184];
    type DkArray = [u8; 1152];
    type CtArray = [u8; 1088];
}

/// ML-KEM-1024 parameter set (k = 4, NIST security level 5).
#[derive(Debug, Clone, Copy)]
pub struct MlKem1024;

impl ParameterSet for MlKem1024 {
    const K: usize = 4;
    type Eta1 = Eta2;
    type Eta2 = Eta2;
    type Du = D11;
    type Dv = D5;

    const POLYVEC_BYTES: usize = 1536; // 4 * 384
    const POLY_COMPRESSED_BYTES: usize = 160; // 256 * 5 / 8
    const POLYVEC_COMPRESSED_BYTES: usize = 1408; // 4 * 256 * 11 / 8
    const EK_BYTES: usize = 1568; // 1536 + 32
    const DK_BYTES: usize = 1536;
    const CT_BYTES: usize = 1568; // 1408 + 160

    type EkArray = [u8; 1568];
    type DkArray = [u8; 1536];
    type CtArray = [u8; 1568];
}

const _: () = {
    use kpke_math::compress::CompressWidthParams;

    // --- Structural invariants ---
    macro_rules! check_params {
        ($t:ty) => {
            assert!(<$t>::K >= 2 && <$t>::K <= 4);
            assert!(<$t>::POLYVEC_BYTES == <$t>::K * POLYBYTES);
            assert!(
                <$t>::POLY_COMPRESSED_BYTES == N * <<$t as ParameterSet>::Dv>::D as usize / 8
            );
            assert!(<$t>::POLY_COMPRESSED_BYTES == <<$t as ParameterSet>::Dv>::POLY_BYTES);
            assert!(
                <$t>::POLYVEC_COMPRESSED_BYTES
                    == <$t>::K * N * <<$t as ParameterSet>::Du>::D as usize / 8
            );
            assert!(<$t>::EK_BYTES == <$t>::POLYVEC_BYTES + SYMBYTES);
            assert!(<$t>::DK_BYTES == <$t>::POLYVEC_BYTES);
            assert!(
                <$t>::CT_BYTES == <$t>::POLYVEC_COMPRESSED_BYTES + <$t>::POLY_COMPRESSED_BYTES
            );
            assert!(<<$t as ParameterSet>::EkArray as ByteArray>::LEN == <$t>::EK_BYTES);
            assert!(<<$t as ParameterSet>::DkArray as ByteArray>::LEN == <$t>::DK_BYTES);
            assert!(<<$t as ParameterSet>::CtArray as ByteArray>::LEN == <$t>::CT_BYTES);
        };
    }
    check_params!(MlKem512);
    check_params!(MlKem768);
    check_params!(MlKem1024);

    // --- Cross-check against FIPS 203 Table 3 ---
    assert!(MlKem512::EK_BYTES == 800);
    assert!(MlKem512::CT_BYTES == 768);

    assert!(MlKem768::EK_BYTES == 1184);
    assert!(MlKem768::CT_BYTES == 1088);

    assert!(MlKem1024::EK_BYTES == 1568);
    assert!(MlKem1024::CT_BYTES == 1568);
};
