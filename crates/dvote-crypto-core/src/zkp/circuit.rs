//! R1CS relation for census eligibility.
//!
//! Public inputs, in order: census root, election id, nullifier.
//! Private witness: voter secret, leaf index bits, sibling hashes.
//!
//! Constraints:
//! 1. `leaf = H_leaf(secret)`
//! 2. folding `leaf` with the siblings, ordered by the index bits, gives the root
//! 3. `nullifier = H_null(secret, election_id)`

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::{AllocVar, Boolean, CondSelectGadget, EqGadget};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use zeroize::Zeroize;

use super::cancellation::ProofCancellation;
use super::gadgets::hash_fields_var;
use super::types::{CircuitDepth, EligibilityStatement, EligibilityWitness};
use crate::hashing::Domain;

/// Eligibility circuit with optional assignments.
///
/// A blank circuit (all `None`) fixes the constraint shape for setup; a
/// populated one drives witness generation.
#[derive(Clone)]
pub struct EligibilityCircuit {
    depth: CircuitDepth,
    census_root: Option<Fr>,
    election_id: Option<Fr>,
    nullifier: Option<Fr>,
    secret: Option<Fr>,
    path_bits: Option<Vec<bool>>,
    siblings: Option<Vec<Fr>>,
    cancellation: ProofCancellation,
}

impl EligibilityCircuit {
    #[must_use]
    pub fn blank(depth: CircuitDepth) -> Self {
        Self {
            depth,
            census_root: None,
            election_id: None,
            nullifier: None,
            secret: None,
            path_bits: None,
            siblings: None,
            cancellation: ProofCancellation::default(),
        }
    }

    /// Populate from a witness and statement. Shape checks belong to the caller.
    #[must_use]
    pub fn new(
        depth: CircuitDepth,
        statement: &EligibilityStatement,
        witness: &EligibilityWitness,
        cancellation: ProofCancellation,
    ) -> Self {
        Self {
            depth,
            census_root: Some(statement.census_root.0),
            election_id: Some(statement.election_id.0),
            nullifier: Some(statement.nullifier.0),
            secret: Some(witness.secret.0),
            path_bits: Some(witness.path_bits(depth)),
            siblings: Some(witness.siblings.iter().map(|s| s.0).collect()),
            cancellation,
        }
    }

    fn bit(&self, level: usize) -> Result<bool, SynthesisError> {
        self.path_bits
            .as_ref()
            .and_then(|bits| bits.get(level).copied())
            .ok_or(SynthesisError::AssignmentMissing)
    }

    fn sibling(&self, level: usize) -> Result<Fr, SynthesisError> {
        self.siblings
            .as_ref()
            .and_then(|s| s.get(level).copied())
            .ok_or(SynthesisError::AssignmentMissing)
    }

    /// Synthesis has no error of its own for cancellation, so this surfaces
    /// as `AssignmentMissing` and the prover reclassifies it.
    fn checkpoint(&self) -> Result<(), SynthesisError> {
        if self.cancellation.is_cancelled() {
            return Err(SynthesisError::AssignmentMissing);
        }
        Ok(())
    }
}

impl Drop for EligibilityCircuit {
    fn drop(&mut self) {
        if let Some(secret) = self.secret.as_mut() {
            secret.zeroize();
        }
    }
}

impl ConstraintSynthesizer<Fr> for EligibilityCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // ── public inputs ──
        let root_var = FpVar::<Fr>::new_input(ark_relations::ns!(cs, "census_root"), || {
            self.census_root.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let election_var = FpVar::<Fr>::new_input(ark_relations::ns!(cs, "election_id"), || {
            self.election_id.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let nullifier_var = FpVar::<Fr>::new_input(ark_relations::ns!(cs, "nullifier"), || {
            self.nullifier.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ── private witness ──
        let secret_var = FpVar::<Fr>::new_witness(ark_relations::ns!(cs, "secret"), || {
            self.secret.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ── membership ──
        let mut current = hash_fields_var(cs.clone(), Domain::CensusLeaf, &[secret_var.clone()])?;
        for level in 0..self.depth.levels() {
            self.checkpoint()?;
            let is_right = Boolean::new_witness(ark_relations::ns!(cs, "path_bit"), || {
                self.bit(level)
            })?;
            let sibling = FpVar::<Fr>::new_witness(ark_relations::ns!(cs, "sibling"), || {
                self.sibling(level)
            })?;
            let left = FpVar::conditionally_select(&is_right, &sibling, &current)?;
            let right = FpVar::conditionally_select(&is_right, &current, &sibling)?;
            current = hash_fields_var(cs.clone(), Domain::CensusNode, &[left, right])?;
        }
        current.enforce_equal(&root_var)?;

        // ── nullifier ──
        self.checkpoint()?;
        let computed = hash_fields_var(cs, Domain::Nullifier, &[secret_var, election_var])?;
        computed.enforce_equal(&nullifier_var)?;

        Ok(())
    }
}
