//! BIP39 English mnemonics: generation, validation, seed stretching.
//!
//! Phrases are normalized on entry (trimmed, whitespace collapsed to one
//! space, lowercased) and kept in a zeroizing string.

use std::fmt;

use bip39::Language;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;
use crate::memory::{SecretBuffer, SecretBytes};

/// Entropy sizes accepted by [`generate_mnemonic`], in bits.
pub const SUPPORTED_ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];

/// Entropy used when the caller has no preference (12 words).
pub const DEFAULT_ENTROPY_BITS: usize = 128;

/// Length of a BIP39 seed.
pub const SEED_LEN: usize = 64;

/// A validated BIP39 English mnemonic.
#[derive(Clone)]
pub struct Mnemonic {
    phrase: Zeroizing<String>,
}

impl Mnemonic {
    /// Build the mnemonic that encodes `entropy`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::UnsupportedEntropyLength` unless `entropy` is
    /// 16, 20, 24, 28 or 32 bytes.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, CryptoError> {
        let bits = entropy.len().saturating_mul(8);
        if !SUPPORTED_ENTROPY_BITS.contains(&bits) {
            return Err(unsupported(bits));
        }
        let m = bip39::Mnemonic::from_entropy_in(Language::English, entropy)
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
        Ok(Self {
            phrase: Zeroizing::new(m.to_string()),
        })
    }

    /// Validate a phrase: word count, wordlist membership, checksum.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidMnemonic` describing the first problem found.
    pub fn parse(phrase: &str) -> Result<Self, CryptoError> {
        let normalized = normalize(phrase);
        bip39::Mnemonic::parse_in(Language::English, normalized.as_str())
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
        Ok(Self { phrase: normalized })
    }

    /// The normalized phrase.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.phrase.split(' ').count()
    }

    /// BIP39 seed: PBKDF2-HMAC-SHA512, 2048 rounds, salt `"mnemonic" || passphrase`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidMnemonic` if the stored phrase no longer
    /// parses, which cannot happen for values built through this type.
    pub fn to_seed(&self, passphrase: &str) -> Result<SecretBytes<SEED_LEN>, CryptoError> {
        let m = bip39::Mnemonic::parse_in(Language::English, self.phrase.as_str())
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
        let mut seed = m.to_seed(passphrase);
        let out = SecretBytes::new(seed);
        seed.zeroize();
        Ok(out)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words, ***)", self.word_count())
    }
}

/// Generate a fresh mnemonic from OS entropy.
///
/// # Errors
///
/// Returns `CryptoError::UnsupportedEntropyLength` if `bits` is not one of
/// [`SUPPORTED_ENTROPY_BITS`], or `CryptoError::SecureMemory` if the CSPRNG fails.
pub fn generate_mnemonic(bits: usize) -> Result<Mnemonic, CryptoError> {
    if !SUPPORTED_ENTROPY_BITS.contains(&bits) {
        return Err(unsupported(bits));
    }
    let entropy = SecretBuffer::random(bits / 8)?;
    let mnemonic = Mnemonic::from_entropy(entropy.expose())?;
    tracing::debug!(bits, words = mnemonic.word_count(), "generated mnemonic");
    Ok(mnemonic)
}

fn unsupported(bits: usize) -> CryptoError {
    CryptoError::UnsupportedEntropyLength(i64::try_from(bits).unwrap_or(i64::MAX))
}

fn normalize(phrase: &str) -> Zeroizing<String> {
    let mut joined = String::with_capacity(phrase.len());
    for (i, word) in phrase.split_whitespace().enumerate() {
        if i > 0 {
            joined.push(' ');
        }
        joined.push_str(word);
    }
    let lower = Zeroizing::new(joined.to_lowercase());
    joined.zeroize();
    lower
}
