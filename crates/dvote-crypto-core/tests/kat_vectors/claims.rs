//! Claim inputs used by DVote census registrations.
//!
//! Digests come from this crate's domain-tagged sponge, not circomlib
//! Poseidon, so they do not match circom-based census tooling. Only the
//! relations between digests are pinned here.

use dvote_crypto_core::{digest_hex_claim, digest_string_claim};

/// `(text, hex of the same bytes)`.
const SAME_BYTES: [(&str, &str); 2] = [
    ("Hello", "48656c6c6f"),
    (
        "Hello UTF8 ©âëíòÚ ✨",
        "48656c6c6f205554463820c2a9c3a2c3abc3adc3b2c39a20e29ca8",
    ),
];

const HEX_CLAIMS: [&str; 7] = [
    "48656c6c6f48656c6c6f48656c6c6f48656c6c6f48656c6c6f48656c6c6f48656c6c6f",
    "12345678901234567890123456789012345678901234567890123456789012345678901234567890",
    "01234567890123456789012345678901234567890123456789012345678901234567890123456789",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "8888888888888888888888888888888888888888888888888888888888888888",
    "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
    "1234567890123456789012345678901234567890",
];

/// Uncompressed public keys used as claims by census registrations.
const PUBLIC_KEY_CLAIMS: [&str; 4] = [
    "0x045a126cbbd3c66b6d542d40d91085e3f2b5db3bbc8cda0d59615deb08784e4f833e0bb082194790143c3d01cedb4a9663cb8c7bdaaad839cb794dd309213fcf30",
    "0x049969c7741ade2e9f89f81d12080651038838e8089682158f3d892e57609b64e2137463c816e4d52f6688d490c35a0b8e524ac6d9722eed2616dbcaf676fc2578",
    "0x049622878da186a8a31f4dc03454dbbc62365060458db174618218b51d5014fa56c8ea772234341ae326ce278091c39e30c02fa1f04792035d79311fe3283f1380",
    "0x0420606a7dcf293722f3eddc7dca0e2505c08d5099e3d495091782a107d006a7d64c3034184fb4cd59475e37bf40ca43e5e262be997bb74c45a9a723067505413e",
];

#[test]
fn string_and_hex_claims_of_same_bytes_agree() {
    for (text, hex) in SAME_BYTES {
        assert_eq!(
            digest_string_claim(text).to_base64(),
            digest_hex_claim(hex).unwrap().to_base64(),
            "{text}"
        );
    }
}

#[test]
fn hex_prefix_is_optional() {
    for hex in HEX_CLAIMS {
        assert_eq!(
            digest_hex_claim(hex).unwrap(),
            digest_hex_claim(&format!("0x{hex}")).unwrap(),
            "{hex}"
        );
    }
}

#[test]
fn public_key_claims_are_distinct_base64_digests() {
    let digests: Vec<String> = PUBLIC_KEY_CLAIMS
        .iter()
        .map(|claim| digest_hex_claim(claim).unwrap().to_base64())
        .collect();
    for (i, digest) in digests.iter().enumerate() {
        assert_eq!(digest.len(), 44);
        assert!(!digests[..i].contains(digest));
    }
}
