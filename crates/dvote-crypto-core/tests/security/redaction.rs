//! Secret-bearing types must never print their contents.

use dvote_crypto_core::hd::ExtendedPrivateKey;
use dvote_crypto_core::keys::PrivateKey;
use dvote_crypto_core::memory::{SecretBuffer, SecretBytes};
use dvote_crypto_core::mnemonic::Mnemonic;
use dvote_crypto_core::zkp::{EligibilityWitness, FieldElement, VoterSecret};
use ark_bn254::Fr;

const PHRASE: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";

#[test]
fn private_key_debug_is_masked() {
    let key = PrivateKey::from_bytes(&[0x11; 32]).unwrap();
    let dbg = format!("{key:?}");
    assert_eq!(dbg, "PrivateKey(***)");
    assert!(!dbg.contains("1111"));
}

#[test]
fn mnemonic_debug_hides_words() {
    let m = Mnemonic::parse(PHRASE).unwrap();
    let dbg = format!("{m:?}");
    assert!(!dbg.contains("legal"));
    assert!(!dbg.contains("yellow"));
}

#[test]
fn extended_key_debug_hides_key_and_chain_code() {
    let xprv = ExtendedPrivateKey::from_seed(&[0x5A; 32]).unwrap();
    let dbg = format!("{xprv:?}");
    assert!(!dbg.contains(&xprv.private_key().to_hex()[2..10]));
    assert!(!dbg.contains(&hex::encode(&xprv.chain_code()[..4])));
}

#[test]
fn secret_containers_are_masked() {
    let buf = SecretBuffer::new(b"plaintext ballot").unwrap();
    assert_eq!(format!("{buf:?}"), "SecretBuffer(***)");
    assert_eq!(format!("{buf}"), "SecretBuffer(***)");
    let bytes = SecretBytes::<16>::new([0x42; 16]);
    assert_eq!(format!("{bytes:?}"), "SecretBytes<16>(***)");
}

#[test]
fn voter_secret_and_witness_are_masked() {
    let secret = VoterSecret::from_field(Fr::from(0xDEAD_BEEF_u64));
    assert_eq!(format!("{secret:?}"), "VoterSecret(***)");

    let witness = EligibilityWitness {
        secret: FieldElement(Fr::from(0xDEAD_BEEF_u64)),
        leaf_index: 1,
        siblings: vec![],
    };
    let dbg = format!("{witness:?}");
    assert!(!dbg.contains("deadbeef"));
    assert!(dbg.contains("***"));
}
