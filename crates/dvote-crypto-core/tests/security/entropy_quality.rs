//! Smoke tests that CSPRNG-backed outputs are not degenerate.
//!
//! Thresholds are loose on purpose: they catch an all-zero or repeating
//! generator, not subtle bias.

use std::collections::HashSet;

use dvote_crypto_core::keys::PrivateKey;
use dvote_crypto_core::memory::SecretBuffer;
use dvote_crypto_core::mnemonic::generate_mnemonic;
use dvote_crypto_core::symmetric::{encrypt_symmetric_with_params, HEADER_LEN};
use dvote_crypto_core::kdf::Argon2idParams;

/// Shannon entropy of a byte slice (bits per byte).
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] = freq[b as usize].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// 1 KB random buffer, threshold 7.5 bits/byte (expected ~7.81).
#[test]
fn secret_buffer_random_1kb_entropy() {
    let buf = SecretBuffer::random(1024).unwrap();
    let h = shannon_entropy(buf.expose());
    assert!(h > 7.5, "entropy {h} too low");
}

#[test]
fn mnemonics_do_not_repeat() {
    let phrases: HashSet<String> = (0..64)
        .map(|_| generate_mnemonic(128).unwrap().phrase().to_owned())
        .collect();
    assert_eq!(phrases.len(), 64);
}

#[test]
fn generated_keys_do_not_repeat() {
    let keys: HashSet<String> = (0..64).map(|_| PrivateKey::generate().to_hex()).collect();
    assert_eq!(keys.len(), 64);
}

#[test]
fn envelope_salts_differ() {
    let params = Argon2idParams {
        m_cost: 32,
        t_cost: 1,
        p_cost: 1,
    };
    let salts: HashSet<Vec<u8>> = (0..16)
        .map(|_| {
            let env = encrypt_symmetric_with_params(b"x", "pw", &params).unwrap();
            env[13..HEADER_LEN].to_vec()
        })
        .collect();
    assert_eq!(salts.len(), 16);
}
