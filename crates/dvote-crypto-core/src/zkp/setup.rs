//! Groth16 key generation and the serialized key/proof formats.
//!
//! Keys are stored as `[format version, census depth] || arkworks compressed`.
//! The depth header lets the prover reject a witness for the wrong tree
//! before doing any curve work.

use ark_bn254::Bn254;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::{CryptoRng, RngCore};

use super::circuit::EligibilityCircuit;
use super::types::CircuitDepth;
use crate::encoding::{decode_base64, encode_base64};
use crate::error::CryptoError;

/// Current key format version.
pub const KEY_FORMAT_VERSION: u8 = 1;

const KEY_HEADER_LEN: usize = 2;

fn write_header(depth: CircuitDepth) -> Vec<u8> {
    vec![KEY_FORMAT_VERSION, depth.get()]
}

fn read_header(bytes: &[u8]) -> Result<(CircuitDepth, &[u8]), CryptoError> {
    let (header, body) = bytes.split_at_checked(KEY_HEADER_LEN).ok_or_else(|| {
        CryptoError::InvalidStatementParameters("key shorter than its header".into())
    })?;
    if header[0] != KEY_FORMAT_VERSION {
        return Err(CryptoError::InvalidStatementParameters(format!(
            "unsupported key format version {}",
            header[0]
        )));
    }
    let depth = CircuitDepth::new(u32::from(header[1]))?;
    Ok((depth, body))
}

// ---------------------------------------------------------------------------
// Proving key
// ---------------------------------------------------------------------------

/// Proving key bound to one census depth.
#[derive(Clone)]
pub struct EligibilityProvingKey {
    depth: CircuitDepth,
    inner: ProvingKey<Bn254>,
}

impl EligibilityProvingKey {
    #[must_use]
    pub const fn depth(&self) -> CircuitDepth {
        self.depth
    }

    pub(crate) const fn inner(&self) -> &ProvingKey<Bn254> {
        &self.inner
    }

    /// The verifying key embedded in this proving key.
    #[must_use]
    pub fn verifying_key(&self) -> EligibilityVerifyingKey {
        EligibilityVerifyingKey {
            depth: self.depth,
            inner: self.inner.vk.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `CryptoError::ProofSystem` if arkworks serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = write_header(self.depth);
        self.inner
            .serialize_compressed(&mut out)
            .map_err(|e| CryptoError::ProofSystem(format!("proving key serialization: {e}")))?;
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` for a bad header or body.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (depth, body) = read_header(bytes)?;
        let inner = ProvingKey::<Bn254>::deserialize_compressed(body).map_err(|e| {
            CryptoError::InvalidStatementParameters(format!("malformed proving key: {e}"))
        })?;
        Ok(Self { depth, inner })
    }

    /// # Errors
    ///
    /// See [`to_bytes`](Self::to_bytes).
    pub fn to_base64(&self) -> Result<String, CryptoError> {
        self.to_bytes().map(|b| encode_base64(&b))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` for anything that
    /// does not decode to a proving key.
    pub fn from_base64(input: &str) -> Result<Self, CryptoError> {
        let bytes = decode_base64(input)
            .map_err(|e| CryptoError::InvalidStatementParameters(format!("proving key: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for EligibilityProvingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityProvingKey")
            .field("depth", &self.depth.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Verifying key
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq)]
pub struct EligibilityVerifyingKey {
    depth: CircuitDepth,
    inner: VerifyingKey<Bn254>,
}

impl EligibilityVerifyingKey {
    #[must_use]
    pub const fn depth(&self) -> CircuitDepth {
        self.depth
    }

    pub(crate) const fn inner(&self) -> &VerifyingKey<Bn254> {
        &self.inner
    }

    /// # Errors
    ///
    /// Returns `CryptoError::ProofSystem` if arkworks serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = write_header(self.depth);
        self.inner
            .serialize_compressed(&mut out)
            .map_err(|e| CryptoError::ProofSystem(format!("verifying key serialization: {e}")))?;
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` for a bad header or body.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (depth, body) = read_header(bytes)?;
        let inner = VerifyingKey::<Bn254>::deserialize_compressed(body).map_err(|e| {
            CryptoError::InvalidStatementParameters(format!("malformed verifying key: {e}"))
        })?;
        Ok(Self { depth, inner })
    }

    /// # Errors
    ///
    /// See [`to_bytes`](Self::to_bytes).
    pub fn to_base64(&self) -> Result<String, CryptoError> {
        self.to_bytes().map(|b| encode_base64(&b))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` for anything that
    /// does not decode to a verifying key.
    pub fn from_base64(input: &str) -> Result<Self, CryptoError> {
        let bytes = decode_base64(input)
            .map_err(|e| CryptoError::InvalidStatementParameters(format!("verifying key: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for EligibilityVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityVerifyingKey")
            .field("depth", &self.depth.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Proof
// ---------------------------------------------------------------------------

/// Compressed Groth16 proof, 128 bytes on BN254.
#[derive(Clone, PartialEq)]
pub struct EligibilityProof(Proof<Bn254>);

impl EligibilityProof {
    pub(crate) const fn from_inner(proof: Proof<Bn254>) -> Self {
        Self(proof)
    }

    pub(crate) const fn inner(&self) -> &Proof<Bn254> {
        &self.0
    }

    /// # Errors
    ///
    /// Returns `CryptoError::ProofSystem` if arkworks serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::with_capacity(self.0.compressed_size());
        self.0
            .serialize_compressed(&mut out)
            .map_err(|e| CryptoError::ProofSystem(format!("proof serialization: {e}")))?;
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` unless `bytes` hold a compressed
    /// proof with all points on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Proof::<Bn254>::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| CryptoError::InvalidEncoding(format!("malformed proof: {e}")))
    }

    /// # Errors
    ///
    /// See [`to_bytes`](Self::to_bytes).
    pub fn to_base64(&self) -> Result<String, CryptoError> {
        self.to_bytes().map(|b| encode_base64(&b))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` on bad base64 or proof bytes.
    pub fn from_base64(input: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode_base64(input)?)
    }
}

impl std::fmt::Debug for EligibilityProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EligibilityProof(..)")
    }
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Circuit-specific Groth16 setup for a census of `depth` levels.
///
/// Whoever runs this knows the toxic waste; production keys come from a
/// ceremony and are loaded with `from_bytes`.
///
/// # Errors
///
/// Returns `CryptoError::ProofSystem` if arkworks setup fails.
pub fn setup_eligibility_keys<R: RngCore + CryptoRng>(
    depth: CircuitDepth,
    rng: &mut R,
) -> Result<(EligibilityProvingKey, EligibilityVerifyingKey), CryptoError> {
    tracing::info!(depth = depth.get(), "running eligibility circuit setup");
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(EligibilityCircuit::blank(depth), rng)
        .map_err(|e| CryptoError::ProofSystem(format!("groth16 setup: {e}")))?;
    tracing::debug!(
        depth = depth.get(),
        public_inputs = vk.gamma_abc_g1.len().saturating_sub(1),
        "eligibility keys ready"
    );
    Ok((
        EligibilityProvingKey { depth, inner: pk },
        EligibilityVerifyingKey { depth, inner: vk },
    ))
}
