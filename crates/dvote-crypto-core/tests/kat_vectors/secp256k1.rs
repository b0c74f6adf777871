//! secp256k1 / Ethereum account vectors.

use dvote_crypto_core::hd::compute_private_key;
use dvote_crypto_core::keys::{compute_address, compute_public_key, PrivateKey};
use dvote_crypto_core::signing::hash_message;

const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

#[test]
fn private_key_one() {
    let public = compute_public_key(KEY_ONE).unwrap();
    assert_eq!(
        public.to_hex(),
        "0x0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );
    assert_eq!(
        compute_address(KEY_ONE).unwrap().to_checksum(),
        "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
    );
}

#[test]
fn private_key_two() {
    let key = PrivateKey::from_hex(
        "0000000000000000000000000000000000000000000000000000000000000002",
    )
    .unwrap();
    assert_eq!(
        key.address().to_checksum(),
        "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"
    );
}

/// The well-known first account of the "abandon … about" mnemonic.
#[test]
fn default_path_account() {
    let key = compute_private_key(
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        "m/44'/60'/0'/0/0",
    )
    .unwrap();
    assert_eq!(
        key.to_hex(),
        "0x1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
    );
    assert_eq!(
        key.address().to_checksum(),
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
}

#[test]
fn personal_message_hash_of_hello() {
    assert_eq!(
        hex::encode(hash_message(b"hello")),
        "50b2c43fd39106bafbba0da34fc430e1f91e3c96ea2acee2bc34119f92b37750"
    );
}

#[test]
fn zero_and_order_are_not_keys() {
    assert!(PrivateKey::from_hex(&"00".repeat(32)).is_err());
    assert!(PrivateKey::from_hex(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
    )
    .is_err());
}
