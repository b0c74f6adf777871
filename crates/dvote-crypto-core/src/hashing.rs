//! Claim digests over a Poseidon sponge on the BN254 scalar field.
//!
//! The same permutation backs the census tree and nullifiers in
//! [`crate::zkp`], so a digest computed here is a field element the
//! eligibility circuit can consume directly.
//!
//! Byte strings are absorbed as `[domain, len, chunk_0, chunk_1, ...]` where
//! each chunk is up to 31 bytes read little-endian. Including the length keeps
//! trailing zero bytes significant.
//!
//! String claims and hex claims share one function: `digest_string_claim(s)`
//! equals `digest_hex_claim(hex(s))` whenever the underlying bytes are the
//! same. The two entry points are different input domains and callers must not
//! mix them for one claim type.

use std::fmt;
use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{
    find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge,
};
use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
use ark_ff::{BigInteger, PrimeField};
use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::error::CryptoError;

// ── Parameters ──────────────────────────────────────────────────────

pub const POSEIDON_RATE: usize = 2;
pub const POSEIDON_CAPACITY: usize = 1;
pub const POSEIDON_FULL_ROUNDS: usize = 8;
pub const POSEIDON_PARTIAL_ROUNDS: usize = 57;
pub const POSEIDON_ALPHA: u64 = 5;

/// Bytes packed into one field element. 31 bytes always fit below the modulus.
const CHUNK_LEN: usize = 31;

/// Width of a canonical field element encoding.
pub const FIELD_BYTES: usize = 32;

/// Shared Poseidon configuration, generated once with the Grain LFSR.
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            u64::from(Fr::MODULUS_BIT_SIZE),
            POSEIDON_RATE,
            POSEIDON_FULL_ROUNDS as u64,
            POSEIDON_PARTIAL_ROUNDS as u64,
            0,
        );
        PoseidonConfig::new(
            POSEIDON_FULL_ROUNDS,
            POSEIDON_PARTIAL_ROUNDS,
            POSEIDON_ALPHA,
            mds,
            ark,
            POSEIDON_RATE,
            POSEIDON_CAPACITY,
        )
    })
}

/// Domain separation tag absorbed before any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum Domain {
    Claim = 1,
    CensusLeaf = 2,
    CensusNode = 3,
    Nullifier = 4,
    VoterSecret = 5,
}

impl Domain {
    #[must_use]
    pub fn tag(self) -> Fr {
        Fr::from(self as u64)
    }
}

/// Poseidon over `[domain, inputs...]`, one squeezed element.
#[must_use]
pub fn hash_fields(domain: Domain, inputs: &[Fr]) -> Fr {
    let mut sponge = PoseidonSponge::<Fr>::new(poseidon_config());
    sponge.absorb(&domain.tag());
    for input in inputs {
        sponge.absorb(input);
    }
    sponge.squeeze_native_field_elements(1)[0]
}

/// Poseidon over a byte string in the given domain.
#[must_use]
pub fn hash_bytes(domain: Domain, bytes: &[u8]) -> Fr {
    let mut elements = Vec::with_capacity(bytes.len().div_ceil(CHUNK_LEN).saturating_add(1));
    elements.push(Fr::from(bytes.len() as u64));
    elements.extend(bytes.chunks(CHUNK_LEN).map(Fr::from_le_bytes_mod_order));
    hash_fields(domain, &elements)
}

// ── Field element codec ─────────────────────────────────────────────

/// Canonical 32-byte big-endian encoding.
#[must_use]
pub fn field_to_bytes(value: &Fr) -> [u8; FIELD_BYTES] {
    let be = value.into_bigint().to_bytes_be();
    let mut out = [0u8; FIELD_BYTES];
    // to_bytes_be on a 4-limb bigint is exactly 32 bytes
    out.copy_from_slice(&be);
    out
}

/// Parse a canonical big-endian encoding, rejecting values at or above the modulus.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` if the bytes are not the canonical
/// encoding of a field element.
pub fn field_from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Fr, CryptoError> {
    let value = Fr::from_be_bytes_mod_order(bytes);
    if field_to_bytes(&value) != *bytes {
        return Err(CryptoError::InvalidEncoding(
            "field element is not below the BN254 scalar modulus".into(),
        ));
    }
    Ok(value)
}

/// Parse a `0x`-optional 64-digit hex field element.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` on bad hex, wrong length, or a
/// non-canonical value.
pub fn field_from_hex(input: &str) -> Result<Fr, CryptoError> {
    field_from_bytes(&encoding::decode_hex_array::<FIELD_BYTES>(input)?)
}

#[must_use]
pub fn field_to_hex(value: &Fr) -> String {
    encoding::encode_hex(&field_to_bytes(value))
}

// ── Claim digests ───────────────────────────────────────────────────

/// A 32-byte claim digest, the big-endian encoding of one field element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimDigest([u8; FIELD_BYTES]);

impl ClaimDigest {
    #[must_use]
    pub fn from_field(value: &Fr) -> Self {
        Self(field_to_bytes(value))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    /// The digest as a field element. Infallible: digests are canonical.
    #[must_use]
    pub fn to_field(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        encoding::encode_hex(&self.0)
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        encoding::encode_base64(&self.0)
    }
}

impl fmt::Debug for ClaimDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClaimDigest({})", self.to_hex())
    }
}

impl fmt::Display for ClaimDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest of a text claim (its UTF-8 bytes).
#[must_use]
pub fn digest_string_claim(input: &str) -> ClaimDigest {
    ClaimDigest::from_field(&hash_bytes(Domain::Claim, input.as_bytes()))
}

/// Digest of a hex-encoded claim. A leading `0x` is accepted.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` on odd length or non-hex characters.
pub fn digest_hex_claim(input: &str) -> Result<ClaimDigest, CryptoError> {
    let bytes = encoding::decode_hex(input)?;
    Ok(ClaimDigest::from_field(&hash_bytes(Domain::Claim, &bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_digest_is_deterministic() {
        assert_eq!(digest_string_claim("hello"), digest_string_claim("hello"));
        assert_ne!(digest_string_claim("hello"), digest_string_claim("hellp"));
    }

    #[test]
    fn string_and_hex_agree_on_same_bytes() {
        let s = "Hello, vocdoni";
        let h = hex::encode(s.as_bytes());
        assert_eq!(digest_string_claim(s), digest_hex_claim(&h).unwrap());
        assert_eq!(
            digest_string_claim(s),
            digest_hex_claim(&format!("0x{h}")).unwrap()
        );
    }

    #[test]
    fn hex_claim_rejects_malformed_input() {
        assert!(matches!(
            digest_hex_claim("0x123"),
            Err(CryptoError::InvalidEncoding(_))
        ));
        assert!(matches!(
            digest_hex_claim("xyz0"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn trailing_zero_bytes_change_the_digest() {
        let a = digest_hex_claim("0x01").unwrap();
        let b = digest_hex_claim("0x0100").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_input_has_a_digest() {
        assert_eq!(digest_string_claim(""), digest_hex_claim("").unwrap());
    }

    #[test]
    fn chunk_boundaries_are_distinct() {
        let thirty_one = vec![7u8; 31];
        let thirty_two = vec![7u8; 32];
        assert_ne!(
            hash_bytes(Domain::Claim, &thirty_one),
            hash_bytes(Domain::Claim, &thirty_two)
        );
    }

    #[test]
    fn domains_separate_equal_inputs() {
        let x = Fr::from(42u64);
        assert_ne!(
            hash_fields(Domain::CensusLeaf, &[x]),
            hash_fields(Domain::Nullifier, &[x])
        );
    }

    #[test]
    fn digest_renders_as_prefixed_hex() {
        let d = digest_string_claim("abc");
        let hex = d.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
        assert_eq!(d.to_string(), hex);
        assert_eq!(d.to_base64().len(), 44);
    }

    #[test]
    fn field_codec_is_canonical() {
        let x = hash_fields(Domain::Claim, &[Fr::from(9u64)]);
        assert_eq!(field_from_bytes(&field_to_bytes(&x)).unwrap(), x);
        assert_eq!(field_from_hex(&field_to_hex(&x)).unwrap(), x);
        assert!(field_from_bytes(&[0xFF; 32]).is_err());
    }

    #[test]
    fn digest_field_roundtrip() {
        let d = digest_string_claim("roundtrip");
        assert_eq!(ClaimDigest::from_field(&d.to_field()), d);
    }
}
