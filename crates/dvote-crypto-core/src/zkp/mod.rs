//! Anonymous census eligibility proofs.
//!
//! A voter proves, with Groth16 over BN254, that they know the secret
//! behind some leaf of a Poseidon census tree and that the published
//! nullifier was derived from that same secret for this election. The
//! verifier learns the root, the election id and the nullifier, nothing
//! about which leaf.

mod cancellation;
mod census;
mod circuit;
mod gadgets;
mod prover;
mod setup;
mod types;
mod verifier;

pub use cancellation::ProofCancellation;
pub use census::{
    census_leaf, hash_node, nullifier, root_from_path, zero_hashes, CensusTree, VoterSecret,
    VOTER_SECRET_MESSAGE,
};
pub use circuit::EligibilityCircuit;
pub use prover::generate_zk_proof;
pub use setup::{
    setup_eligibility_keys, EligibilityProof, EligibilityProvingKey, EligibilityVerifyingKey,
    KEY_FORMAT_VERSION,
};
pub use types::{CircuitDepth, EligibilityStatement, EligibilityWitness, FieldElement};
pub use verifier::verify_zk_proof;
