//! Key → voter secret → census → proof → verification.

use ark_bn254::Fr;
use dvote_crypto_core::keys::PrivateKey;
use dvote_crypto_core::zkp::{
    generate_zk_proof, setup_eligibility_keys, verify_zk_proof, CensusTree, CircuitDepth,
    EligibilityProof, EligibilityProvingKey, EligibilityStatement, EligibilityVerifyingKey,
    EligibilityWitness, FieldElement, ProofCancellation, VoterSecret,
};
use dvote_crypto_core::CryptoError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Full flow through the serialized formats a client would exchange.
#[test]
fn eligibility_proof_through_serialized_forms() {
    let depth = CircuitDepth::new(3).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let (pk, vk) = setup_eligibility_keys(depth, &mut rng).expect("setup should succeed");
    let pk_b64 = pk.to_base64().unwrap();
    let vk_b64 = vk.to_base64().unwrap();

    let voters: Vec<VoterSecret> = (0..4)
        .map(|_| VoterSecret::from_private_key(&PrivateKey::generate()).unwrap())
        .collect();
    let mut tree = CensusTree::new(depth);
    for voter in &voters {
        tree.push(voter.leaf()).unwrap();
    }

    let me = &voters[2];
    let election = Fr::from(7u64);
    let statement = EligibilityStatement {
        census_root: FieldElement(tree.root()),
        election_id: FieldElement(election),
        nullifier: FieldElement(me.nullifier(&election)),
    };
    let witness_json = tree.witness(me, 2).unwrap().to_json().unwrap();
    let statement_json = statement.to_json().unwrap();

    let pk = EligibilityProvingKey::from_base64(&pk_b64).unwrap();
    let witness = EligibilityWitness::from_json(&witness_json).unwrap();
    let statement = EligibilityStatement::from_json(&statement_json).unwrap();
    let proof = generate_zk_proof(&pk, &witness, &statement, &ProofCancellation::new())
        .expect("honest witness must prove");

    let vk = EligibilityVerifyingKey::from_base64(&vk_b64).unwrap();
    let proof = EligibilityProof::from_base64(&proof.to_base64().unwrap()).unwrap();
    assert!(verify_zk_proof(&vk, &proof, &statement).unwrap());

    let other_election = EligibilityStatement {
        election_id: FieldElement(Fr::from(8u64)),
        ..statement
    };
    assert!(!verify_zk_proof(&vk, &proof, &other_election).unwrap());
}

/// A voter outside the census cannot prove.
#[test]
fn outsider_cannot_prove() {
    let depth = CircuitDepth::new(2).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let (pk, _) = setup_eligibility_keys(depth, &mut rng).unwrap();

    let member = VoterSecret::from_field(Fr::from(1u64));
    let outsider = VoterSecret::from_field(Fr::from(2u64));
    let mut tree = CensusTree::new(depth);
    tree.push(member.leaf()).unwrap();

    let election = Fr::from(3u64);
    let statement = EligibilityStatement {
        census_root: FieldElement(tree.root()),
        election_id: FieldElement(election),
        nullifier: FieldElement(outsider.nullifier(&election)),
    };
    let witness = tree.witness(&outsider, 0).unwrap();
    let err = generate_zk_proof(&pk, &witness, &statement, &ProofCancellation::new()).unwrap_err();
    assert!(matches!(err, CryptoError::WitnessDoesNotSatisfyStatement));
}
