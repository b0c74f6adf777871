//! BIP32 test vector 1.
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki#test-vector-1>

use dvote_crypto_core::hd::{DerivationPath, ExtendedPrivateKey};

const SEED: &str = "000102030405060708090a0b0c0d0e0f";

fn derive(path: &str) -> ExtendedPrivateKey {
    let master = ExtendedPrivateKey::from_seed(&hex::decode(SEED).unwrap()).unwrap();
    master.derive_path(&path.parse::<DerivationPath>().unwrap()).unwrap()
}

#[test]
fn master_key_and_chain_code() {
    let m = derive("m");
    assert_eq!(
        m.private_key().to_hex(),
        "0xe8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
    );
    assert_eq!(
        hex::encode(m.chain_code()),
        "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
    );
    assert_eq!(m.depth(), 0);
}

#[test]
fn vector_1_chain() {
    let cases = [
        ("m/0'", "0xedb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"),
        ("m/0'/1", "0x3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"),
        ("m/0H/1/2H", "0xcbce0d719ecf7431d88e6a89fa1483e02e35092af60c042b1df2ff59fa424dca"),
        ("m/0'/1/2'/2", "0x0f479245fb19a38a1954c5c7c0ebab2f9bdfd96a17563ef28a6a4b1a2a764ef4"),
        (
            "m/0'/1/2'/2/1000000000",
            "0x471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8",
        ),
    ];
    for (path, expected) in cases {
        assert_eq!(derive(path).private_key().to_hex(), expected, "{path}");
    }
    assert_eq!(derive("m/0'/1/2'/2/1000000000").depth(), 5);
}

#[test]
fn stepwise_equals_path() {
    let master = ExtendedPrivateKey::from_seed(&hex::decode(SEED).unwrap()).unwrap();
    let path: DerivationPath = "m/0'/1".parse().unwrap();
    let mut node = master.clone();
    for index in path.components() {
        node = node.derive_child(*index).unwrap();
    }
    assert_eq!(node.private_key().to_hex(), derive("m/0'/1").private_key().to_hex());
}
