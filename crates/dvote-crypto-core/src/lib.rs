//! `dvote-crypto-core`: pure cryptographic primitives for the DVote client.
//!
//! No I/O, no async, no FFI. Everything here is a synchronous function of
//! its arguments plus the OS RNG. The C surface lives in `dvote-native`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod encoding;
pub mod error;
pub mod memory;

pub mod hashing;

pub mod hd;
pub mod keys;
pub mod mnemonic;

pub mod signing;

pub mod kdf;
pub mod symmetric;

pub mod zkp;

pub use error::CryptoError;
pub use hashing::{digest_hex_claim, digest_string_claim, ClaimDigest};
pub use hd::{
    compute_private_key, compute_private_key_with_passphrase, DerivationPath, ExtendedPrivateKey,
    DEFAULT_DERIVATION_PATH,
};
pub use kdf::{Argon2idParams, KdfPreset};
pub use keys::{compute_address, compute_public_key, Address, PrivateKey, PublicKey};
pub use memory::{SecretBuffer, SecretBytes};
pub use mnemonic::{generate_mnemonic, Mnemonic, SUPPORTED_ENTROPY_BITS};
pub use signing::{
    is_valid, recover_address, recover_signer, sign_message, ExpectedSigner, Signature,
};
pub use symmetric::{decrypt_symmetric, encrypt_symmetric, encrypt_symmetric_with_params};
pub use zkp::{
    generate_zk_proof, setup_eligibility_keys, verify_zk_proof, CensusTree, CircuitDepth,
    EligibilityProof, EligibilityProvingKey, EligibilityStatement, EligibilityVerifyingKey,
    EligibilityWitness, FieldElement, ProofCancellation, VoterSecret,
};
