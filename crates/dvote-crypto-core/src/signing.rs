//! Recoverable secp256k1 signatures over EIP-191 personal messages.
//!
//! This module provides:
//! - [`sign_message`]: deterministic (RFC 6979) low-S signature with recovery id
//! - [`recover_signer`] / [`recover_address`]: public key or address from a signature
//! - [`is_valid`]: compare the recovered signer with an expected address or key
//!
//! # Message hashing
//!
//! Messages are hashed as `keccak256("\x19Ethereum Signed Message:\n" || len || msg)`
//! where `len` is the decimal byte length. A signature over a personal message
//! can therefore never be replayed as a transaction signature.
//!
//! # Wire format
//!
//! 65 bytes `r || s || v`. Signatures are emitted with `v = 27 + recovery_id`;
//! `v` of 0, 1, 27 or 28 is accepted on input. High-S signatures are rejected.

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

use crate::encoding;
use crate::error::CryptoError;
use crate::keys::{keccak256, Address, PrivateKey, PublicKey, ADDRESS_LEN};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

/// Offset added to the recovery id in the emitted `v` byte.
const V_OFFSET: u8 = 27;

const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A 65-byte recoverable signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    rs: [u8; 64],
    recovery_id: u8,
}

impl Signature {
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidSignature` on a wrong length or an
    /// unknown `v` byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(CryptoError::InvalidSignature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let recovery_id = match bytes[64] {
            0 | 27 => 0,
            1 | 28 => 1,
            v => {
                return Err(CryptoError::InvalidSignature(format!(
                    "unsupported recovery byte {v}"
                )))
            }
        };
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&bytes[..64]);
        Ok(Self { rs, recovery_id })
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidSignature` for bad hex or any
    /// [`Signature::from_bytes`] failure.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let bytes = encoding::decode_hex(input)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// `r || s || (27 + recovery_id)`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&self.rs);
        out[64] = self.recovery_id.saturating_add(V_OFFSET);
        out
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        encoding::encode_hex(&self.to_bytes())
    }

    #[must_use]
    pub const fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Parsed ECDSA components, rejecting zero, out-of-range and high `s`.
    fn components(&self) -> Result<(EcdsaSignature, RecoveryId), CryptoError> {
        let sig = EcdsaSignature::from_slice(&self.rs)
            .map_err(|_| CryptoError::InvalidSignature("r or s out of range".into()))?;
        if sig.normalize_s().is_some() {
            return Err(CryptoError::InvalidSignature("s is not in the lower half".into()));
        }
        let recid = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| CryptoError::InvalidSignature("bad recovery id".into()))?;
        Ok((sig, recid))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Who a signature is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedSigner {
    Address(Address),
    PublicKey(PublicKey),
}

impl ExpectedSigner {
    /// Accepts a 20-byte address or a 33/65-byte public key in hex.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` for anything else, including a
    /// key-sized value that is not a curve point.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let bytes = encoding::decode_hex(input)?;
        if bytes.len() == ADDRESS_LEN {
            return Address::from_hex(input).map(Self::Address);
        }
        PublicKey::from_bytes(&bytes)
            .map(Self::PublicKey)
            .map_err(|e| CryptoError::InvalidEncoding(format!("expected signer: {e}")))
    }

    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Address(a) => *a,
            Self::PublicKey(pk) => pk.address(),
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// EIP-191 personal message hash.
#[must_use]
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let len = message.len().to_string();
    let mut buf = Vec::with_capacity(
        PERSONAL_MESSAGE_PREFIX
            .len()
            .saturating_add(len.len())
            .saturating_add(message.len()),
    );
    buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    buf.extend_from_slice(len.as_bytes());
    buf.extend_from_slice(message);
    keccak256(&buf)
}

/// Sign `message` with `key`. Same inputs always give the same signature.
///
/// # Errors
///
/// Returns `CryptoError::InvalidSignature` if the signer fails, which only
/// happens for a degenerate nonce.
pub fn sign_message(message: &[u8], key: &PrivateKey) -> Result<Signature, CryptoError> {
    let prehash = hash_message(message);
    let signing_key = SigningKey::from(key.as_secret());
    let (sig, recid) = signing_key
        .sign_prehash_recoverable(&prehash)
        .map_err(|e| CryptoError::InvalidSignature(format!("signing failed: {e}")))?;
    let mut rs = [0u8; 64];
    rs.copy_from_slice(&sig.to_bytes());
    Ok(Signature {
        rs,
        recovery_id: recid.to_byte(),
    })
}

/// Public key that produced `signature` over `message`.
///
/// # Errors
///
/// Returns `CryptoError::InvalidSignature` for out-of-range components,
/// high `s`, or when no point satisfies the signature equation.
pub fn recover_signer(signature: &Signature, message: &[u8]) -> Result<PublicKey, CryptoError> {
    let (sig, recid) = signature.components()?;
    let prehash = hash_message(message);
    let vk = VerifyingKey::recover_from_prehash(&prehash, &sig, recid)
        .map_err(|_| CryptoError::InvalidSignature("public key recovery failed".into()))?;
    Ok(PublicKey::from_inner(k256::PublicKey::from(&vk)))
}

/// Address that produced `signature` over `message`.
///
/// # Errors
///
/// See [`recover_signer`].
pub fn recover_address(signature: &Signature, message: &[u8]) -> Result<Address, CryptoError> {
    recover_signer(signature, message).map(|pk| pk.address())
}

/// Whether `signature` over `message` was produced by `expected`.
///
/// A different signer is `Ok(false)`; a signature that cannot be evaluated
/// is an error.
///
/// # Errors
///
/// See [`recover_signer`].
pub fn is_valid(
    signature: &Signature,
    message: &[u8],
    expected: &ExpectedSigner,
) -> Result<bool, CryptoError> {
    let recovered = recover_address(signature, message)?;
    Ok(recovered == expected.address())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
