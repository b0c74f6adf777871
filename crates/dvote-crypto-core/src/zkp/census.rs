//! Census Merkle tree, leaves, nullifiers and voter secrets.
//!
//! The tree is sparse: unset slots hold zero, and an all-empty subtree of
//! height `h` hashes to the precomputed `zero_hashes[h]`.

use std::collections::BTreeMap;
use std::fmt;

use ark_bn254::Fr;
use ark_ff::Zero;
use zeroize::Zeroize;

use super::types::{CircuitDepth, EligibilityWitness, FieldElement};
use crate::error::CryptoError;
use crate::hashing::{hash_bytes, hash_fields, Domain};
use crate::keys::PrivateKey;
use crate::signing::{sign_message, Signature};

/// Leaf committed to the census for a voter secret.
#[must_use]
pub fn census_leaf(secret: &Fr) -> Fr {
    hash_fields(Domain::CensusLeaf, &[*secret])
}

/// One-per-election tag that reveals nothing about the secret.
#[must_use]
pub fn nullifier(secret: &Fr, election_id: &Fr) -> Fr {
    hash_fields(Domain::Nullifier, &[*secret, *election_id])
}

/// Parent of two sibling nodes.
#[must_use]
pub fn hash_node(left: &Fr, right: &Fr) -> Fr {
    hash_fields(Domain::CensusNode, &[*left, *right])
}

/// `zero_hashes(d)[h]` is the root of an empty subtree of height `h`, for `h` in `0..=d`.
#[must_use]
pub fn zero_hashes(depth: CircuitDepth) -> Vec<Fr> {
    let mut out = Vec::with_capacity(depth.levels().saturating_add(1));
    let mut current = Fr::zero();
    out.push(current);
    for _ in 0..depth.levels() {
        current = hash_node(&current, &current);
        out.push(current);
    }
    out
}

// ── Voter secret ────────────────────────────────────────────────────

/// Message signed to derive a voter secret from an account key.
pub const VOTER_SECRET_MESSAGE: &str = "dvote: derive anonymous voter secret";

/// The private value behind a census leaf.
///
/// Derived from a deterministic signature, so the same account key always
/// yields the same secret without storing it.
#[derive(Clone)]
pub struct VoterSecret(Fr);

impl VoterSecret {
    /// Hash the `r || s` part of a signature into the field.
    #[must_use]
    pub fn from_signature(signature: &Signature) -> Self {
        let mut bytes = signature.to_bytes();
        let secret = hash_bytes(Domain::VoterSecret, &bytes[..64]);
        bytes.zeroize();
        Self(secret)
    }

    /// Sign [`VOTER_SECRET_MESSAGE`] and derive the secret from the result.
    ///
    /// # Errors
    ///
    /// Propagates signing failures.
    pub fn from_private_key(key: &PrivateKey) -> Result<Self, CryptoError> {
        sign_message(VOTER_SECRET_MESSAGE.as_bytes(), key).map(|sig| Self::from_signature(&sig))
    }

    #[must_use]
    pub const fn from_field(value: Fr) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn expose(&self) -> &Fr {
        &self.0
    }

    #[must_use]
    pub fn leaf(&self) -> Fr {
        census_leaf(&self.0)
    }

    #[must_use]
    pub fn nullifier(&self, election_id: &Fr) -> Fr {
        nullifier(&self.0, election_id)
    }
}

impl fmt::Debug for VoterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VoterSecret(***)")
    }
}

impl Drop for VoterSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ── Census tree ─────────────────────────────────────────────────────

/// Sparse fixed-depth Poseidon Merkle tree of census leaves.
#[derive(Debug, Clone)]
pub struct CensusTree {
    depth: CircuitDepth,
    leaves: BTreeMap<u64, Fr>,
    zeros: Vec<Fr>,
}

impl CensusTree {
    #[must_use]
    pub fn new(depth: CircuitDepth) -> Self {
        Self {
            depth,
            leaves: BTreeMap::new(),
            zeros: zero_hashes(depth),
        }
    }

    #[must_use]
    pub const fn depth(&self) -> CircuitDepth {
        self.depth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Set the leaf at `index`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` if `index` does not fit.
    pub fn insert(&mut self, index: u64, leaf: Fr) -> Result<(), CryptoError> {
        if index >= self.depth.capacity() {
            return Err(CryptoError::InvalidStatementParameters(format!(
                "leaf index {index} outside a depth-{} tree",
                self.depth.get()
            )));
        }
        self.leaves.insert(index, leaf);
        Ok(())
    }

    /// Append after the highest occupied index and return the new index.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` when the tree is full.
    pub fn push(&mut self, leaf: Fr) -> Result<u64, CryptoError> {
        let index = self
            .leaves
            .last_key_value()
            .map_or(Some(0), |(i, _)| i.checked_add(1))
            .ok_or_else(|| CryptoError::InvalidStatementParameters("census is full".into()))?;
        self.insert(index, leaf)?;
        Ok(index)
    }

    #[must_use]
    pub fn leaf(&self, index: u64) -> Option<Fr> {
        self.leaves.get(&index).copied()
    }

    /// All non-empty nodes, level by level from the leaves up to the root.
    fn levels(&self) -> Vec<BTreeMap<u64, Fr>> {
        let mut levels = Vec::with_capacity(self.depth.levels().saturating_add(1));
        levels.push(self.leaves.clone());
        for height in 0..self.depth.levels() {
            let below = &levels[height];
            let zero = self.zeros[height];
            let mut above = BTreeMap::new();
            for &index in below.keys() {
                let parent = index / 2;
                if above.contains_key(&parent) {
                    continue;
                }
                let left_index = parent.saturating_mul(2);
                let left = below.get(&left_index).copied().unwrap_or(zero);
                let right = below
                    .get(&left_index.saturating_add(1))
                    .copied()
                    .unwrap_or(zero);
                above.insert(parent, hash_node(&left, &right));
            }
            levels.push(above);
        }
        levels
    }

    #[must_use]
    pub fn root(&self) -> Fr {
        let top = self.depth.levels();
        self.levels()[top]
            .get(&0)
            .copied()
            .unwrap_or(self.zeros[top])
    }

    /// Sibling hashes for the leaf at `index`, leaf level first.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` if `index` does not fit.
    pub fn siblings(&self, index: u64) -> Result<Vec<Fr>, CryptoError> {
        if index >= self.depth.capacity() {
            return Err(CryptoError::InvalidStatementParameters(format!(
                "leaf index {index} outside a depth-{} tree",
                self.depth.get()
            )));
        }
        let levels = self.levels();
        let mut out = Vec::with_capacity(self.depth.levels());
        let mut position = index;
        for (height, nodes) in levels.iter().take(self.depth.levels()).enumerate() {
            let sibling = nodes.get(&(position ^ 1)).copied().unwrap_or(self.zeros[height]);
            out.push(sibling);
            position /= 2;
        }
        Ok(out)
    }

    /// Witness for the voter at `index` holding `secret`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` if `index` does not fit.
    pub fn witness(&self, secret: &VoterSecret, index: u64) -> Result<EligibilityWitness, CryptoError> {
        let siblings = self
            .siblings(index)?
            .into_iter()
            .map(FieldElement)
            .collect();
        Ok(EligibilityWitness {
            secret: FieldElement(*secret.expose()),
            leaf_index: index,
            siblings,
        })
    }
}

/// Fold a leaf up through `siblings` using the bits of `index`.
#[must_use]
pub fn root_from_path(leaf: &Fr, index: u64, siblings: &[Fr]) -> Fr {
    let mut current = *leaf;
    let mut position = index;
    for sibling in siblings {
        current = if position & 1 == 1 {
            hash_node(sibling, &current)
        } else {
            hash_node(&current, sibling)
        };
        position /= 2;
    }
    current
}
