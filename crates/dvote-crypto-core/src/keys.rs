//! secp256k1 keys and Ethereum-style addresses.
//!
//! Address = last 20 bytes of `keccak256(uncompressed_pubkey[1..])`, rendered
//! with the EIP-55 mixed-case checksum.

use std::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::encoding;
use crate::error::CryptoError;
use crate::memory::SecretBytes;

pub const PRIVATE_KEY_LEN: usize = 32;
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;
pub const ADDRESS_LEN: usize = 20;

/// Keccak-256 (the pre-standard SHA-3 padding Ethereum uses).
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

// ── PrivateKey ──────────────────────────────────────────────────────

/// A secp256k1 scalar in `[1, n)`. Zeroized on drop by `k256`.
#[derive(Clone)]
pub struct PrivateKey(k256::SecretKey);

impl PrivateKey {
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` if `bytes` is not 32 bytes, or
    /// `CryptoError::InvalidPrivateKey` if the scalar is zero or not below the
    /// group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CryptoError::InvalidEncoding(format!(
                "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        k256::SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPrivateKey("scalar is zero or >= group order".into()))
    }

    /// Parse `0x`-optional hex.
    ///
    /// # Errors
    ///
    /// See [`PrivateKey::from_bytes`]; bad hex is `CryptoError::InvalidEncoding`.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let raw = Zeroizing::new(encoding::decode_hex(input)?);
        Self::from_bytes(&raw)
    }

    /// Fresh key from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        Self(k256::SecretKey::random(&mut OsRng))
    }

    pub(crate) const fn from_secret(secret: k256::SecretKey) -> Self {
        Self(secret)
    }

    pub(crate) const fn as_secret(&self) -> &k256::SecretKey {
        &self.0
    }

    /// Raw scalar bytes, big-endian.
    #[must_use]
    pub fn to_bytes(&self) -> SecretBytes<PRIVATE_KEY_LEN> {
        SecretBytes::new(self.0.to_bytes().into())
    }

    /// `0x`-prefixed hex of the scalar. The caller owns the exposure.
    #[must_use]
    pub fn to_hex(&self) -> String {
        encoding::encode_hex(self.to_bytes().expose())
    }

    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.public_key().address()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

// ── PublicKey ───────────────────────────────────────────────────────

/// A secp256k1 point (never the identity).
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(k256::PublicKey);

impl PublicKey {
    /// Accepts SEC1 compressed (33) or uncompressed (65) encodings.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` on any other length and
    /// `CryptoError::InvalidPublicKey` if the bytes are not a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            COMPRESSED_PUBLIC_KEY_LEN | UNCOMPRESSED_PUBLIC_KEY_LEN => {
                k256::PublicKey::from_sec1_bytes(bytes)
                    .map(Self)
                    .map_err(|_| CryptoError::InvalidPublicKey("not a point on secp256k1".into()))
            }
            n => Err(CryptoError::InvalidEncoding(format!(
                "public key must be 33 or 65 bytes, got {n}"
            ))),
        }
    }

    /// # Errors
    ///
    /// See [`PublicKey::from_bytes`].
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&encoding::decode_hex(input)?)
    }

    pub(crate) const fn from_inner(inner: k256::PublicKey) -> Self {
        Self(inner)
    }

    #[must_use]
    pub const fn as_inner(&self) -> &k256::PublicKey {
        &self.0
    }

    #[must_use]
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LEN] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    #[must_use]
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        let point = self.0.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        encoding::encode_hex(&self.to_compressed())
    }

    #[must_use]
    pub fn to_hex_uncompressed(&self) -> String {
        encoding::encode_hex(&self.to_uncompressed())
    }

    #[must_use]
    pub fn address(&self) -> Address {
        let uncompressed = self.to_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&hash[12..]);
        Address(out)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

// ── Address ─────────────────────────────────────────────────────────

/// 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    #[must_use]
    pub const fn from_array(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse hex in any letter case. The EIP-55 checksum is not enforced.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` on bad hex or a length other than 20 bytes.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        encoding::decode_hex_array::<ADDRESS_LEN>(input).map(Self)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// EIP-55 rendering: a hex letter is uppercased when the matching nibble
    /// of `keccak256(lowercase_hex)` is 8 or more.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(lower.len().saturating_add(2));
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

// ── Boundary operations ─────────────────────────────────────────────

/// Compressed public key for a hex private key.
///
/// # Errors
///
/// See [`PrivateKey::from_hex`].
pub fn compute_public_key(private_key_hex: &str) -> Result<PublicKey, CryptoError> {
    PrivateKey::from_hex(private_key_hex).map(|k| k.public_key())
}

/// Address for any identity form: private key (32 bytes), compressed or
/// uncompressed public key (33/65 bytes), or an address (20 bytes).
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` for other lengths or bad hex, and
/// the key errors of [`PrivateKey::from_bytes`] / [`PublicKey::from_bytes`].
pub fn compute_address(input: &str) -> Result<Address, CryptoError> {
    let bytes = Zeroizing::new(encoding::decode_hex(input)?);
    match bytes.len() {
        PRIVATE_KEY_LEN => Ok(PrivateKey::from_bytes(&bytes)?.address()),
        COMPRESSED_PUBLIC_KEY_LEN | UNCOMPRESSED_PUBLIC_KEY_LEN => {
            Ok(PublicKey::from_bytes(&bytes)?.address())
        }
        ADDRESS_LEN => {
            let mut out = [0u8; ADDRESS_LEN];
            out.copy_from_slice(&bytes);
            Ok(Address(out))
        }
        n => Err(CryptoError::InvalidEncoding(format!(
            "expected a 32-byte private key, 33/65-byte public key or 20-byte address, got {n} bytes"
        ))),
    }
}
