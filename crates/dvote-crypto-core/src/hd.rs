//! BIP32 hierarchical derivation of secp256k1 private keys.
//!
//! Only private-parent to private-child derivation is provided; the client
//! never handles extended public keys.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use k256::elliptic_curve::ff::PrimeField;
use k256::{FieldBytes, NonZeroScalar, Scalar, SecretKey};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::PrivateKey;
use crate::memory::SecretBytes;
use crate::mnemonic::Mnemonic;

type HmacSha512 = Hmac<Sha512>;

/// Ethereum account 0, external chain, first address.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";
const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

// ── Paths ───────────────────────────────────────────────────────────

/// One path component. Values `>= 2^31` are hardened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidDerivationPath` if `index >= 2^31`.
    pub fn normal(index: u32) -> Result<Self, CryptoError> {
        if index >= HARDENED_OFFSET {
            return Err(CryptoError::InvalidDerivationPath(format!(
                "index {index} out of range"
            )));
        }
        Ok(Self(index))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidDerivationPath` if `index >= 2^31`.
    pub fn hardened(index: u32) -> Result<Self, CryptoError> {
        Self::normal(index).map(|c| Self(c.0 | HARDENED_OFFSET))
    }

    #[must_use]
    pub const fn is_hardened(self) -> bool {
        self.0 >= HARDENED_OFFSET
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.0 & !HARDENED_OFFSET)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A parsed path such as `m/44'/60'/0'/0/0`.
///
/// `'`, `h` and `H` all mark a hardened component. The empty string and `m`
/// both denote the master key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    #[must_use]
    pub fn components(&self) -> &[ChildIndex] {
        &self.0
    }

    #[must_use]
    pub fn is_master(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for DerivationPath {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "m" || s == "M" {
            return Ok(Self::default());
        }
        let rest = s
            .strip_prefix("m/")
            .or_else(|| s.strip_prefix("M/"))
            .ok_or_else(|| CryptoError::InvalidDerivationPath(format!("{s}: must start with m/")))?;

        let mut out = Vec::new();
        for part in rest.split('/') {
            let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(d) => (d, true),
                None => (part, false),
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CryptoError::InvalidDerivationPath(format!(
                    "{s}: bad component {part:?}"
                )));
            }
            let index: u32 = digits.parse().map_err(|_| {
                CryptoError::InvalidDerivationPath(format!("{s}: component {part:?} overflows"))
            })?;
            out.push(if hardened {
                ChildIndex::hardened(index)?
            } else {
                ChildIndex::normal(index)?
            });
        }
        Ok(Self(out))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for c in &self.0 {
            write!(f, "/{c}")?;
        }
        Ok(())
    }
}

// ── Extended keys ───────────────────────────────────────────────────

/// Private key plus chain code.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    key: PrivateKey,
    chain_code: SecretBytes<32>,
    depth: u8,
}

impl ExtendedPrivateKey {
    /// Master key: `HMAC-SHA512("Bitcoin seed", seed)`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` if the seed is not 16 to 64 bytes,
    /// or `CryptoError::InvalidDerivationPath` if the seed yields an invalid
    /// master scalar.
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(CryptoError::InvalidEncoding(format!(
                "seed must be {MIN_SEED_LEN}..={MAX_SEED_LEN} bytes, got {}",
                seed.len()
            )));
        }
        let (il, chain_code) = hmac_split(MASTER_HMAC_KEY, &[seed])?;
        let scalar: NonZeroScalar = parse_il(&il)
            .and_then(|s| Option::<NonZeroScalar>::from(NonZeroScalar::new(s)))
            .ok_or_else(|| CryptoError::InvalidDerivationPath("seed yields invalid master key".into()))?;
        Ok(Self {
            key: PrivateKey::from_secret(SecretKey::from(scalar)),
            chain_code,
            depth: 0,
        })
    }

    /// CKDpriv.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidDerivationPath` when the child scalar is
    /// invalid (probability below 2^-127) or the depth exceeds 255.
    #[allow(clippy::arithmetic_side_effects)] // scalar addition is modulo n
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self, CryptoError> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| CryptoError::InvalidDerivationPath("depth exceeds 255".into()))?;

        let secret = self.key.as_secret();
        let index_be = index.raw().to_be_bytes();
        let (il, chain_code) = if index.is_hardened() {
            let key_bytes = Zeroizing::new(<[u8; 32]>::from(secret.to_bytes()));
            hmac_split(self.chain_code.expose(), &[&[0u8][..], &key_bytes[..], &index_be[..]])?
        } else {
            let public = self.key.public_key().to_compressed();
            hmac_split(self.chain_code.expose(), &[&public[..], &index_be[..]])?
        };

        let tweak = parse_il(&il).ok_or_else(|| invalid_child(index))?;
        let child = tweak + *secret.to_nonzero_scalar();
        let child = Option::<NonZeroScalar>::from(NonZeroScalar::new(child))
            .ok_or_else(|| invalid_child(index))?;

        Ok(Self {
            key: PrivateKey::from_secret(SecretKey::from(child)),
            chain_code,
            depth,
        })
    }

    /// Derive every component of `path` in turn.
    ///
    /// # Errors
    ///
    /// See [`ExtendedPrivateKey::derive_child`].
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, CryptoError> {
        path.components()
            .iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))
    }

    #[must_use]
    pub const fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    #[must_use]
    pub fn into_private_key(self) -> PrivateKey {
        self.key
    }

    #[must_use]
    pub const fn chain_code(&self) -> &[u8; 32] {
        self.chain_code.expose()
    }

    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtendedPrivateKey(depth={}, ***)", self.depth)
    }
}

/// HMAC-SHA512 over the concatenation of `parts`, split into `IL` and chain code.
fn hmac_split(
    key: &[u8],
    parts: &[&[u8]],
) -> Result<(Zeroizing<[u8; 32]>, SecretBytes<32>), CryptoError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidDerivationPath(format!("HMAC key: {e}")))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    let mut il = Zeroizing::new([0u8; 32]);
    il.copy_from_slice(&out[..32]);
    let chain_code = SecretBytes::<32>::from_slice(&out[32..])?;
    Ok((il, chain_code))
}

/// `IL` as a scalar, `None` if it is not below the group order.
fn parse_il(il: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::clone_from_slice(il)))
}

fn invalid_child(index: ChildIndex) -> CryptoError {
    CryptoError::InvalidDerivationPath(format!("child {index} is invalid, use the next index"))
}

// ── Boundary operations ─────────────────────────────────────────────

/// Private key at `path` for a mnemonic and BIP39 passphrase.
///
/// # Errors
///
/// Returns `CryptoError::InvalidMnemonic` for a bad phrase and
/// `CryptoError::InvalidDerivationPath` for a bad path.
pub fn compute_private_key_with_passphrase(
    mnemonic: &str,
    passphrase: &str,
    path: &str,
) -> Result<PrivateKey, CryptoError> {
    let path: DerivationPath = path.parse()?;
    let seed = Mnemonic::parse(mnemonic)?.to_seed(passphrase)?;
    let key = ExtendedPrivateKey::from_seed(seed.expose())?
        .derive_path(&path)?
        .into_private_key();
    tracing::debug!(%path, "derived private key");
    Ok(key)
}

/// Private key at `path` for a mnemonic with an empty passphrase.
///
/// # Errors
///
/// See [`compute_private_key_with_passphrase`].
pub fn compute_private_key(mnemonic: &str, path: &str) -> Result<PrivateKey, CryptoError> {
    compute_private_key_with_passphrase(mnemonic, "", path)
}
