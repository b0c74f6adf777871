//! Mnemonic → key → address → signature → validation.

use dvote_crypto_core::hd::{compute_private_key, DEFAULT_DERIVATION_PATH};
use dvote_crypto_core::keys::compute_address;
use dvote_crypto_core::mnemonic::generate_mnemonic;
use dvote_crypto_core::signing::{is_valid, recover_signer, sign_message, ExpectedSigner};

fn flip_hex_char(hex: &str, at: usize) -> String {
    hex.char_indices()
        .map(|(i, c)| {
            if i != at {
                c
            } else if c == '0' {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

/// A fresh 128-bit identity signs "hello"; one wrong address character rejects it.
#[test]
fn fresh_identity_signs_and_validates() {
    let mnemonic = generate_mnemonic(128).expect("128-bit mnemonic");
    assert_eq!(mnemonic.word_count(), 12);

    let key = compute_private_key(mnemonic.phrase(), "m").expect("root key");
    let address = compute_address(&key.to_hex()).expect("address");
    assert_eq!(address, key.address());

    let sig = sign_message(b"hello", &key).expect("signing should succeed");
    let rendered = address.to_checksum();
    let expected = ExpectedSigner::from_hex(&rendered).expect("checksum address parses");
    assert!(is_valid(&sig, b"hello", &expected).unwrap());

    let tampered = flip_hex_char(&rendered, rendered.len() - 1);
    let wrong = ExpectedSigner::from_hex(&tampered).expect("tampered address still parses");
    assert!(!is_valid(&sig, b"hello", &wrong).unwrap());
}

/// Signatures travel as hex and still validate against the public key.
#[test]
fn signature_hex_roundtrip_against_public_key() {
    let mnemonic = generate_mnemonic(256).expect("256-bit mnemonic");
    let key = compute_private_key(mnemonic.phrase(), DEFAULT_DERIVATION_PATH).unwrap();
    let sig_hex = sign_message(b"vote:yes", &key).unwrap().to_hex();

    let sig = dvote_crypto_core::Signature::from_hex(&sig_hex).unwrap();
    let public = recover_signer(&sig, b"vote:yes").unwrap();
    assert_eq!(public, key.public_key());

    let expected = ExpectedSigner::from_hex(&public.to_hex_uncompressed()).unwrap();
    assert!(is_valid(&sig, b"vote:yes", &expected).unwrap());
    assert!(!is_valid(&sig, b"vote:no", &expected).unwrap());
}

/// Different paths from one mnemonic give unrelated keys.
#[test]
fn paths_separate_accounts() {
    let mnemonic = generate_mnemonic(128).unwrap();
    let a = compute_private_key(mnemonic.phrase(), "m/44'/60'/0'/0/0").unwrap();
    let b = compute_private_key(mnemonic.phrase(), "m/44'/60'/0'/0/1").unwrap();
    assert_ne!(a.address(), b.address());
}

/// Unsupported entropy sizes are refused outright.
#[test]
fn unsupported_entropy_rejected() {
    for bits in [0, 64, 127, 129, 512] {
        assert!(generate_mnemonic(bits).is_err(), "{bits} bits");
    }
}
