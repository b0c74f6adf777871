//! Eligibility proof verification. Needs only the statement.

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::SNARK;

use super::setup::{EligibilityProof, EligibilityVerifyingKey};
use super::types::EligibilityStatement;
use crate::error::CryptoError;

/// Check `proof` against `statement`.
///
/// `Ok(false)` means the proof is well-formed but does not attest this
/// statement.
///
/// # Errors
///
/// Returns `CryptoError::ProofSystem` if the pairing check itself fails.
pub fn verify_zk_proof(
    vk: &EligibilityVerifyingKey,
    proof: &EligibilityProof,
    statement: &EligibilityStatement,
) -> Result<bool, CryptoError> {
    let inputs = statement.public_inputs();
    let valid = Groth16::<Bn254>::verify(vk.inner(), &inputs, proof.inner())
        .map_err(|e| CryptoError::ProofSystem(format!("groth16 verify: {e}")))?;
    tracing::debug!(depth = vk.depth().get(), valid, "eligibility proof checked");
    Ok(valid)
}
