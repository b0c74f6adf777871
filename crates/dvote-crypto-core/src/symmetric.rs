//! Passphrase-based authenticated encryption.
//!
//! This module provides:
//! - [`encrypt_symmetric`] / [`decrypt_symmetric`]: self-describing passphrase envelopes
//! - [`encrypt`] / [`decrypt`]: the raw AES-256-GCM primitive under a 32-byte key
//! - [`SealedData`]: nonce + ciphertext + tag container
//!
//! # Envelope layout
//!
//! ```text
//! version (1) || m_cost (4, BE) || t_cost (4, BE) || p_cost (4, BE) || salt (16)
//!   || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! The 29-byte header is the AES-GCM associated data, so a header edit fails
//! authentication just like a ciphertext edit.

use crate::error::CryptoError;
use crate::kdf::{self, Argon2idParams, SALT_LEN};
use crate::memory::{SecretBuffer, SecretBytes};
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// AES-256-GCM key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Current envelope format.
pub const ENVELOPE_VERSION: u8 = 0x01;

/// version + three u32 costs + salt.
pub const HEADER_LEN: usize = 1 + 4 * 3 + SALT_LEN;

/// Minimum valid serialized length: nonce + empty ciphertext + tag.
const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Authenticated ciphertext: `nonce (12) || ciphertext || tag (16)`.
#[must_use = "encrypted data must be stored or transmitted"]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedData {
    /// 96-bit random nonce, unique per encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Same length as the plaintext.
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl SealedData {
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let capacity = NONCE_LEN
            .saturating_add(self.ciphertext.len())
            .saturating_add(TAG_LEN);
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` if the input is shorter than
    /// 28 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (nonce, rest) = bytes
            .split_first_chunk::<NONCE_LEN>()
            .filter(|_| bytes.len() >= MIN_SEALED_LEN)
            .ok_or_else(|| {
                CryptoError::InvalidEncoding(format!(
                    "sealed data too short: {} bytes (minimum {MIN_SEALED_LEN})",
                    bytes.len()
                ))
            })?;
        let (ciphertext, tag) = rest
            .split_last_chunk::<TAG_LEN>()
            .ok_or_else(|| CryptoError::InvalidEncoding("missing authentication tag".into()))?;
        Ok(Self {
            nonce: *nonce,
            ciphertext: ciphertext.to_vec(),
            tag: *tag,
        })
    }
}

/// Parsed envelope header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub version: u8,
    pub params: Argon2idParams,
    pub salt: [u8; SALT_LEN],
}

impl EnvelopeHeader {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0] = self.version;
        out[1..5].copy_from_slice(&self.params.m_cost.to_be_bytes());
        out[5..9].copy_from_slice(&self.params.t_cost.to_be_bytes());
        out[9..13].copy_from_slice(&self.params.p_cost.to_be_bytes());
        out[13..].copy_from_slice(&self.salt);
        out
    }

    /// Parse and bounds-check a header.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` on an unknown version or
    /// parameters outside the accepted bounds.
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Result<Self, CryptoError> {
        let version = bytes[0];
        if version != ENVELOPE_VERSION {
            return Err(CryptoError::InvalidEncoding(format!(
                "unsupported envelope version {version}"
            )));
        }
        let word = |at: usize| {
            let mut w = [0u8; 4];
            w.copy_from_slice(&bytes[at..at.saturating_add(4)]);
            u32::from_be_bytes(w)
        };
        let params = Argon2idParams {
            m_cost: word(1),
            t_cost: word(5),
            p_cost: word(9),
        };
        params
            .validate()
            .map_err(|e| CryptoError::InvalidEncoding(format!("envelope header: {e}")))?;
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[13..]);
        Ok(Self {
            version,
            params,
            salt,
        })
    }
}

// ---------------------------------------------------------------------------
// Raw AES-256-GCM
// ---------------------------------------------------------------------------

fn aes_key(key: &[u8]) -> Result<aead::LessSafeKey, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key)
        .map_err(|_| CryptoError::Encryption("failed to create AES-256-GCM key".into()))?;
    Ok(aead::LessSafeKey::new(unbound))
}

/// Encrypt under a 32-byte key with a fresh random nonce.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the key is not 32 bytes or sealing
/// fails, and `CryptoError::SecureMemory` if the CSPRNG fails.
pub fn encrypt(plaintext: &[u8], key: &[u8], aad: &[u8]) -> Result<SealedData, CryptoError> {
    let key = aes_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
    let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    let Ok(tag) = key.seal_in_place_separate_tag(nonce, aead::Aad::from(aad), &mut in_out) else {
        in_out.zeroize();
        return Err(CryptoError::Encryption("AES-256-GCM encryption failed".into()));
    };

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_ref());

    Ok(SealedData {
        nonce: nonce_bytes,
        ciphertext: in_out,
        tag: tag_bytes,
    })
}

/// Open [`SealedData`] under a 32-byte key.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the key is not 32 bytes and
/// `CryptoError::AuthenticationFailed` on a wrong key, wrong AAD or any
/// modification of nonce, ciphertext or tag.
pub fn decrypt(sealed: &SealedData, key: &[u8], aad: &[u8]) -> Result<SecretBuffer, CryptoError> {
    let key = aes_key(key)?;
    let nonce = aead::Nonce::assume_unique_for_key(sealed.nonce);

    let mut ct_tag = Vec::with_capacity(sealed.ciphertext.len().saturating_add(TAG_LEN));
    ct_tag.extend_from_slice(&sealed.ciphertext);
    ct_tag.extend_from_slice(&sealed.tag);

    let plain_len = key
        .open_in_place(nonce, aead::Aad::from(aad), &mut ct_tag)
        .map_err(|_| CryptoError::AuthenticationFailed)?
        .len();
    ct_tag.truncate(plain_len);
    Ok(SecretBuffer::from_vec(ct_tag))
}

// ---------------------------------------------------------------------------
// Passphrase envelopes
// ---------------------------------------------------------------------------

/// Encrypt with the default Argon2id preset.
///
/// Every call draws a fresh salt and nonce, so equal inputs produce
/// different envelopes.
///
/// # Errors
///
/// See [`encrypt_symmetric_with_params`].
pub fn encrypt_symmetric(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    encrypt_symmetric_with_params(plaintext, passphrase, &Argon2idParams::default())
}

/// Encrypt with explicit Argon2id parameters.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` for out-of-bounds parameters,
/// `CryptoError::SecureMemory` if the CSPRNG fails, and
/// `CryptoError::Encryption` if sealing fails.
pub fn encrypt_symmetric_with_params(
    plaintext: &[u8],
    passphrase: &str,
    params: &Argon2idParams,
) -> Result<Vec<u8>, CryptoError> {
    params.validate()?;
    let salt = SecretBytes::<SALT_LEN>::random()?;
    let header = EnvelopeHeader {
        version: ENVELOPE_VERSION,
        params: *params,
        salt: *salt.expose(),
    };
    let header_bytes = header.to_bytes();

    let key = kdf::derive(passphrase.as_bytes(), &header.salt, params)?;
    let sealed = encrypt(plaintext, key.expose(), &header_bytes)?;

    let sealed_bytes = sealed.to_bytes();
    let mut out = Vec::with_capacity(HEADER_LEN.saturating_add(sealed_bytes.len()));
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&sealed_bytes);
    Ok(out)
}

/// Open an envelope produced by [`encrypt_symmetric`].
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` for a truncated envelope, unknown
/// version or out-of-bounds parameters, and `CryptoError::AuthenticationFailed`
/// for a wrong passphrase or any tampering.
pub fn decrypt_symmetric(envelope: &[u8], passphrase: &str) -> Result<SecretBuffer, CryptoError> {
    let (header_bytes, body) = envelope
        .split_first_chunk::<HEADER_LEN>()
        .ok_or_else(|| {
            CryptoError::InvalidEncoding(format!(
                "envelope too short: {} bytes (minimum {})",
                envelope.len(),
                HEADER_LEN.saturating_add(MIN_SEALED_LEN)
            ))
        })?;
    let header = EnvelopeHeader::from_bytes(header_bytes)?;
    let sealed = SealedData::from_bytes(body)?;
    let key = kdf::derive(passphrase.as_bytes(), &header.salt, &header.params)?;
    decrypt(&sealed, key.expose(), header_bytes)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
