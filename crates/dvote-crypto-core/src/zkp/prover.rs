//! Eligibility proof generation.

use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, SynthesisError};
use ark_snark::SNARK;
use rand::rngs::OsRng;

use super::cancellation::ProofCancellation;
use super::circuit::EligibilityCircuit;
use super::setup::{EligibilityProof, EligibilityProvingKey};
use super::types::{EligibilityStatement, EligibilityWitness};
use crate::error::CryptoError;

fn synthesis_error(err: &SynthesisError, cancellation: &ProofCancellation) -> CryptoError {
    if cancellation.is_cancelled() {
        CryptoError::Cancelled
    } else {
        CryptoError::ProofSystem(format!("constraint synthesis: {err}"))
    }
}

/// Prove that `witness` places a census member behind `statement`.
///
/// Phases: shape checks, witness generation with a satisfiability check,
/// then the Groth16 prover. `cancellation` is consulted before each phase
/// and once per tree level during synthesis.
///
/// # Errors
///
/// - `CryptoError::InvalidStatementParameters` if the witness does not fit
///   the key's census depth
/// - `CryptoError::WitnessDoesNotSatisfyStatement` if the witness is
///   well-formed but is not a census member for this statement
/// - `CryptoError::Cancelled` once the caller cancels or the deadline passes
/// - `CryptoError::ProofSystem` if arkworks fails otherwise
pub fn generate_zk_proof(
    pk: &EligibilityProvingKey,
    witness: &EligibilityWitness,
    statement: &EligibilityStatement,
    cancellation: &ProofCancellation,
) -> Result<EligibilityProof, CryptoError> {
    let started = Instant::now();
    cancellation.check()?;
    let depth = pk.depth();
    witness.check_shape(depth)?;

    let circuit = EligibilityCircuit::new(depth, statement, witness, cancellation.clone());

    // ark-groth16 only debug-asserts satisfiability, so check it up front.
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit
        .clone()
        .generate_constraints(cs.clone())
        .map_err(|e| synthesis_error(&e, cancellation))?;
    let satisfied = cs
        .is_satisfied()
        .map_err(|e| CryptoError::ProofSystem(format!("satisfiability check: {e}")))?;
    if !satisfied {
        tracing::debug!(
            failing = ?cs.which_is_unsatisfied().ok().flatten(),
            "eligibility witness rejected"
        );
        return Err(CryptoError::WitnessDoesNotSatisfyStatement);
    }
    tracing::debug!(
        constraints = cs.num_constraints(),
        elapsed_ms = started.elapsed().as_millis(),
        "eligibility witness generated"
    );

    cancellation.check()?;
    let proof = Groth16::<Bn254>::prove(pk.inner(), circuit, &mut OsRng)
        .map_err(|e| synthesis_error(&e, cancellation))?;
    cancellation.check()?;

    tracing::info!(
        depth = depth.get(),
        elapsed_ms = started.elapsed().as_millis(),
        "eligibility proof generated"
    );
    Ok(EligibilityProof::from_inner(proof))
}
