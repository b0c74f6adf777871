mod bip32;
mod bip39;
mod claims;
mod eip55;
mod secp256k1;
