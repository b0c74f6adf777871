//! Passphrase envelopes at realistic sizes.

use dvote_crypto_core::kdf::{Argon2idParams, KdfPreset};
use dvote_crypto_core::symmetric::{decrypt_symmetric, encrypt_symmetric, encrypt_symmetric_with_params};
use dvote_crypto_core::CryptoError;

const FAST: Argon2idParams = Argon2idParams {
    m_cost: 64,
    t_cost: 1,
    p_cost: 1,
};

/// Default preset roundtrip, once, to cover the real parameters.
#[test]
fn default_preset_roundtrip() {
    let envelope = encrypt_symmetric(b"my secret ballot", "correct horse").unwrap();
    let opened = decrypt_symmetric(&envelope, "correct horse").unwrap();
    assert_eq!(opened.expose(), b"my secret ballot");
    assert_eq!(envelope[1..5], KdfPreset::Interactive.params().m_cost.to_be_bytes());
}

/// 1 MB payload.
#[test]
fn large_payload_roundtrip() {
    let payload = vec![0xAB_u8; 1_048_576];
    let envelope = encrypt_symmetric_with_params(&payload, "pw", &FAST).unwrap();
    assert_eq!(decrypt_symmetric(&envelope, "pw").unwrap().expose(), payload.as_slice());
}

/// Equal inputs give different envelopes (fresh salt and nonce).
#[test]
fn envelopes_are_randomized() {
    let a = encrypt_symmetric_with_params(b"x", "pw", &FAST).unwrap();
    let b = encrypt_symmetric_with_params(b"x", "pw", &FAST).unwrap();
    assert_ne!(a, b);
}

/// Wrong passphrase and truncation are distinguished.
#[test]
fn failure_modes() {
    let envelope = encrypt_symmetric_with_params(b"payload", "right", &FAST).unwrap();
    assert!(matches!(
        decrypt_symmetric(&envelope, "wrong"),
        Err(CryptoError::AuthenticationFailed)
    ));
    assert!(matches!(
        decrypt_symmetric(&envelope[..10], "right"),
        Err(CryptoError::InvalidEncoding(_))
    ));
}
