//! Cryptographic error types for `dvote-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
///
/// Every variant maps to a stable numeric [`code`](CryptoError::code) so the
/// native call surface can report failures without string matching.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed hex, base64, UTF-8 or JSON input, or a wrong byte length.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// BIP39 mnemonic has an unknown word, wrong word count or bad checksum.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Requested mnemonic entropy is not one of 128/160/192/224/256 bits.
    #[error("unsupported entropy length: {0} bits (expected 128, 160, 192, 224 or 256)")]
    UnsupportedEntropyLength(i64),

    /// BIP32 derivation path could not be parsed or yields an invalid child.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// Scalar is zero or not below the secp256k1 group order.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Bytes do not encode a point on secp256k1.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signature components out of range, unknown recovery id, or recovery failed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Authentication tag verification failed: wrong passphrase or tampered data.
    #[error("decryption failed: authentication tag mismatch")]
    AuthenticationFailed,

    /// Key derivation failed (Argon2id parameter validation, memory allocation).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Symmetric sealing failure (AES-256-GCM key setup or seal).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Secure memory allocation or CSPRNG failure.
    #[error("secure memory error: {0}")]
    SecureMemory(String),

    /// The private witness does not satisfy the eligibility circuit.
    #[error("witness does not satisfy the statement")]
    WitnessDoesNotSatisfyStatement,

    /// Malformed or unsupported statement, key or proof parameters.
    #[error("invalid statement parameters: {0}")]
    InvalidStatementParameters(String),

    /// Groth16 setup, proving or verification failed internally.
    #[error("proof system error: {0}")]
    ProofSystem(String),

    /// Proof generation stopped at the caller's cancellation boundary.
    #[error("operation cancelled")]
    Cancelled,
}

impl CryptoError {
    /// Stable numeric code reported across the native boundary.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidEncoding(_) => 100,
            Self::InvalidMnemonic(_) => 200,
            Self::UnsupportedEntropyLength(_) => 201,
            Self::InvalidDerivationPath(_) => 202,
            Self::InvalidPrivateKey(_) => 300,
            Self::InvalidPublicKey(_) => 301,
            Self::InvalidSignature(_) => 400,
            Self::AuthenticationFailed => 500,
            Self::KeyDerivation(_) => 501,
            Self::Encryption(_) => 502,
            Self::SecureMemory(_) => 503,
            Self::WitnessDoesNotSatisfyStatement => 600,
            Self::InvalidStatementParameters(_) => 601,
            Self::ProofSystem(_) => 602,
            Self::Cancelled => 603,
        }
    }
}
