//! Statement, witness and parameter types for eligibility proofs.

use std::fmt;

use ark_bn254::Fr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::hashing::{field_from_hex, field_to_hex};

// ── FieldElement ────────────────────────────────────────────────────

/// A BN254 scalar-field element that (de)serializes as `0x` hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(pub Fr);

impl FieldElement {
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` unless `input` is 32 bytes of
    /// hex below the field modulus.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        field_from_hex(input).map(Self)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        field_to_hex(&self.0)
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ── CircuitDepth ────────────────────────────────────────────────────

/// Census tree depth, fixed per proving/verifying key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CircuitDepth(u8);

impl CircuitDepth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 32;

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` outside `1..=32`.
    pub fn new(depth: u32) -> Result<Self, CryptoError> {
        u8::try_from(depth)
            .ok()
            .filter(|d| (Self::MIN..=Self::MAX).contains(d))
            .map(Self)
            .ok_or_else(|| {
                CryptoError::InvalidStatementParameters(format!(
                    "census depth {depth} outside {}..={}",
                    Self::MIN,
                    Self::MAX
                ))
            })
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn levels(self) -> usize {
        self.0 as usize
    }

    /// Number of leaf slots, `2^depth`.
    #[must_use]
    pub const fn capacity(self) -> u64 {
        match 1u64.checked_shl(self.0 as u32) {
            Some(c) => c,
            None => u64::MAX,
        }
    }
}

// ── Statement and witness ───────────────────────────────────────────

/// Public inputs, in circuit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityStatement {
    pub census_root: FieldElement,
    pub election_id: FieldElement,
    pub nullifier: FieldElement,
}

impl EligibilityStatement {
    #[must_use]
    pub fn public_inputs(&self) -> [Fr; 3] {
        [self.census_root.0, self.election_id.0, self.nullifier.0]
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` on malformed JSON or
    /// field values.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json).map_err(|e| {
            CryptoError::InvalidStatementParameters(format!("statement JSON: {e}"))
        })
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` if serialization fails.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::InvalidEncoding(format!("statement JSON: {e}")))
    }
}

/// Private inputs. The secret is wiped on drop and hidden from `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct EligibilityWitness {
    pub secret: FieldElement,
    /// Leaf position; bit `i` set means the running node is the right child at level `i`.
    pub leaf_index: u64,
    /// Sibling hashes from the leaf level upwards.
    pub siblings: Vec<FieldElement>,
}

impl EligibilityWitness {
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` on malformed JSON or field values.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json)
            .map_err(|e| CryptoError::InvalidEncoding(format!("witness JSON: {e}")))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` if serialization fails.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::InvalidEncoding(format!("witness JSON: {e}")))
    }

    /// Index bits, least significant first, one per level.
    #[must_use]
    pub fn path_bits(&self, depth: CircuitDepth) -> Vec<bool> {
        (0..depth.get())
            .map(|level| {
                self.leaf_index
                    .checked_shr(u32::from(level))
                    .is_some_and(|v| v & 1 == 1)
            })
            .collect()
    }

    /// Check the witness shape against a key's depth.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidStatementParameters` if the sibling count
    /// differs from the depth or the index does not fit the tree.
    pub fn check_shape(&self, depth: CircuitDepth) -> Result<(), CryptoError> {
        if self.siblings.len() != depth.levels() {
            return Err(CryptoError::InvalidStatementParameters(format!(
                "witness has {} siblings, key depth is {}",
                self.siblings.len(),
                depth.get()
            )));
        }
        if self.leaf_index >= depth.capacity() {
            return Err(CryptoError::InvalidStatementParameters(format!(
                "leaf index {} outside a depth-{} tree",
                self.leaf_index,
                depth.get()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for EligibilityWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EligibilityWitness")
            .field("secret", &"***")
            .field("leaf_index", &self.leaf_index)
            .field("siblings", &self.siblings.len())
            .finish()
    }
}

impl Drop for EligibilityWitness {
    fn drop(&mut self) {
        self.secret.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_bounds() {
        assert!(CircuitDepth::new(0).is_err());
        assert!(CircuitDepth::new(33).is_err());
        assert!(CircuitDepth::new(300).is_err());
        assert_eq!(CircuitDepth::new(32).unwrap().capacity(), 1u64 << 32);
        assert_eq!(CircuitDepth::new(1).unwrap().capacity(), 2);
    }

    #[test]
    fn field_element_json_is_hex() {
        let fe = FieldElement(Fr::from(255u64));
        let json = serde_json::to_string(&fe).unwrap();
        assert_eq!(
            json,
            "\"0x00000000000000000000000000000000000000000000000000000000000000ff\""
        );
        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fe);
    }

    #[test]
    fn non_canonical_field_element_rejected() {
        let json = format!("\"0x{}\"", "ff".repeat(32));
        assert!(serde_json::from_str::<FieldElement>(&json).is_err());
    }

    #[test]
    fn witness_shape_checked() {
        let depth = CircuitDepth::new(2).unwrap();
        let w = EligibilityWitness {
            secret: FieldElement(Fr::from(1u64)),
            leaf_index: 3,
            siblings: vec![FieldElement(Fr::from(0u64)); 2],
        };
        assert!(w.check_shape(depth).is_ok());
        assert_eq!(w.path_bits(depth), vec![true, true]);

        let too_far = EligibilityWitness {
            secret: FieldElement(Fr::from(1u64)),
            leaf_index: 4,
            siblings: vec![FieldElement(Fr::from(0u64)); 2],
        };
        assert!(matches!(
            too_far.check_shape(depth),
            Err(CryptoError::InvalidStatementParameters(_))
        ));

        let short = EligibilityWitness {
            secret: FieldElement(Fr::from(1u64)),
            leaf_index: 3,
            siblings: vec![FieldElement(Fr::from(0u64))],
        };
        assert!(short.check_shape(depth).is_err());
    }

    #[test]
    fn witness_debug_hides_secret() {
        let w = EligibilityWitness {
            secret: FieldElement(Fr::from(123_456u64)),
            leaf_index: 0,
            siblings: Vec::new(),
        };
        let dbg = format!("{w:?}");
        assert!(dbg.contains("***"));
        assert!(!dbg.contains("1e240"));
    }

    #[test]
    fn statement_json_roundtrip() {
        let s = EligibilityStatement {
            census_root: FieldElement(Fr::from(1u64)),
            election_id: FieldElement(Fr::from(2u64)),
            nullifier: FieldElement(Fr::from(3u64)),
        };
        assert_eq!(EligibilityStatement::from_json(&s.to_json().unwrap()).unwrap(), s);
        let too_long = s.to_json().unwrap().replace("0x", "0xff");
        for bad in ["{}", "not json", too_long.as_str()] {
            assert!(matches!(
                EligibilityStatement::from_json(bad),
                Err(CryptoError::InvalidStatementParameters(_))
            ));
        }
    }
}
