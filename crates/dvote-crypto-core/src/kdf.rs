//! Argon2id passphrase stretching.
//!
//! This module provides:
//! - [`derive`]: derive a 256-bit key from a passphrase + salt using Argon2id
//! - [`Argon2idParams`]: serializable parameter set, carried in every envelope header
//! - [`KdfPreset`]: Interactive / Moderate / Sensitive selector
//!
//! Parameters travel with the ciphertext, so decryption must refuse values
//! outside [`Argon2idParams::validate`] before allocating anything.

use crate::error::CryptoError;
use crate::memory::SecretBytes;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Output length of the KDF in bytes (256 bits).
pub const OUTPUT_LEN: usize = 32;

/// Salt length used by the envelope. Shorter salts are refused.
pub const SALT_LEN: usize = 16;

/// 19 MiB in KiB.
const MEMORY_19MIB: u32 = 19_456;

/// 64 MiB in KiB.
const MEMORY_64MIB: u32 = 65_536;

/// 256 MiB in KiB.
const MEMORY_256MIB: u32 = 262_144;

/// Largest memory cost accepted, equal to the `Sensitive` preset. Headers
/// are untrusted and a failed Argon2 allocation aborts the process.
pub const MAX_M_COST: u32 = MEMORY_256MIB;

pub const MAX_T_COST: u32 = 4;

pub const MAX_P_COST: u32 = 4;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Argon2id parameter set.
///
/// `m_cost` is in KiB, following the `argon2` crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2idParams {
    /// Memory cost in kibibytes.
    pub m_cost: u32,
    /// Number of passes.
    pub t_cost: u32,
    /// Lanes.
    pub p_cost: u32,
}

impl Argon2idParams {
    /// Check the parameters against the accepted bounds.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyDerivation` naming the offending field.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if !(1..=MAX_P_COST).contains(&self.p_cost) {
            return Err(CryptoError::KeyDerivation(format!(
                "p_cost {} outside 1..={MAX_P_COST}",
                self.p_cost
            )));
        }
        if !(1..=MAX_T_COST).contains(&self.t_cost) {
            return Err(CryptoError::KeyDerivation(format!(
                "t_cost {} outside 1..={MAX_T_COST}",
                self.t_cost
            )));
        }
        let min_m = self.p_cost.saturating_mul(8);
        if !(min_m..=MAX_M_COST).contains(&self.m_cost) {
            return Err(CryptoError::KeyDerivation(format!(
                "m_cost {} KiB outside {min_m}..={MAX_M_COST}",
                self.m_cost
            )));
        }
        Ok(())
    }
}

impl Default for Argon2idParams {
    fn default() -> Self {
        KdfPreset::default().params()
    }
}

/// KDF preset selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfPreset {
    /// 19 MiB, 2 passes, 1 lane. Fits comfortably on phones.
    #[default]
    Interactive,
    /// 64 MiB, 3 passes, 4 lanes.
    Moderate,
    /// 256 MiB, 4 passes, 4 lanes. Backups and exports.
    Sensitive,
}

impl KdfPreset {
    #[must_use]
    pub const fn params(self) -> Argon2idParams {
        match self {
            Self::Interactive => Argon2idParams {
                m_cost: MEMORY_19MIB,
                t_cost: 2,
                p_cost: 1,
            },
            Self::Moderate => Argon2idParams {
                m_cost: MEMORY_64MIB,
                t_cost: 3,
                p_cost: 4,
            },
            Self::Sensitive => Argon2idParams {
                m_cost: MEMORY_256MIB,
                t_cost: 4,
                p_cost: 4,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Core KDF
// ---------------------------------------------------------------------------

/// Derive a 256-bit key from a passphrase and salt using Argon2id v1.3.
///
/// Any passphrase is accepted, including the empty one.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if:
/// - The salt is shorter than 16 bytes
/// - The parameters fail [`Argon2idParams::validate`]
/// - The derivation itself fails (e.g., memory allocation)
pub fn derive(
    passphrase: &[u8],
    salt: &[u8],
    params: &Argon2idParams,
) -> Result<SecretBytes<OUTPUT_LEN>, CryptoError> {
    if salt.len() < SALT_LEN {
        return Err(CryptoError::KeyDerivation(format!(
            "salt too short: {} bytes (minimum {SALT_LEN})",
            salt.len()
        )));
    }
    params.validate()?;

    let argon2_params = argon2::Params::new(
        params.m_cost,
        params.t_cost,
        params.p_cost,
        Some(OUTPUT_LEN),
    )
    .map_err(|e| CryptoError::KeyDerivation(format!("invalid argon2 params: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = [0u8; OUTPUT_LEN];
    if let Err(e) = argon2.hash_password_into(passphrase, salt, &mut output) {
        output.zeroize();
        return Err(CryptoError::KeyDerivation(format!(
            "argon2id derivation failed: {e}"
        )));
    }
    tracing::debug!(
        m_cost = params.m_cost,
        t_cost = params.t_cost,
        p_cost = params.p_cost,
        "argon2id key derived"
    );

    let key = SecretBytes::new(output);
    output.zeroize();
    Ok(key)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
