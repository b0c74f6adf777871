//! BIP39 Known Answer Test vectors.
//!
//! Test vectors from the Trezor BIP39 reference implementation:
//! <https://github.com/trezor/python-mnemonic/blob/master/vectors.json>

use dvote_crypto_core::mnemonic::Mnemonic;

// ── entropy → mnemonic ─────────────────────────────────────────────

#[test]
fn trezor_entropy_vectors() {
    let vectors: [(&str, &str); 4] = [
        (
            "00000000000000000000000000000000",
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        ),
        (
            "7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f",
            "legal winner thank year wave sausage worth useful legal winner thank yellow",
        ),
        (
            "80808080808080808080808080808080",
            "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
        ),
        (
            "ffffffffffffffffffffffffffffffff",
            "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
        ),
    ];
    for (entropy, phrase) in vectors {
        let m = Mnemonic::from_entropy(&hex::decode(entropy).unwrap()).unwrap();
        assert_eq!(m.phrase(), phrase, "entropy {entropy}");
    }
}

// ── mnemonic → seed (passphrase "TREZOR") ──────────────────────────

#[test]
fn trezor_seed_all_zero_entropy() {
    let m = Mnemonic::parse(
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
    )
    .unwrap();
    let seed = m.to_seed("TREZOR").unwrap();
    assert_eq!(
        hex::encode(seed.expose()),
        "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
    );
}

#[test]
fn trezor_seed_7f_entropy() {
    let m = Mnemonic::parse(
        "legal winner thank year wave sausage worth useful legal winner thank yellow",
    )
    .unwrap();
    let seed = m.to_seed("TREZOR").unwrap();
    assert_eq!(
        hex::encode(seed.expose()),
        "2e8905819b8723fe2c1d161860e5ee1830318dbf49a83bd451cfb8440c28bd6fa457fe1296106559a3c80937a1c1069be3a3a5bd381ee6260e8d9739fce1f607"
    );
}

#[test]
fn bad_checksum_rejected() {
    // Last word changed from "about" to "abandon".
    let phrase = "abandon ".repeat(12);
    assert!(Mnemonic::parse(phrase.trim()).is_err());
}
