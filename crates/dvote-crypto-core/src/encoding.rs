//! Text encodings used at the call boundary.
//!
//! Hex input may carry a `0x`/`0X` prefix; hex output is always lowercase
//! with the prefix. Base64 is standard alphabet with padding.

use crate::error::CryptoError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Strip an optional `0x`/`0X` prefix.
#[must_use]
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decode hex of any even length (including empty).
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` on odd length or a non-hex character.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, CryptoError> {
    let digits = strip_hex_prefix(input.trim());
    hex::decode(digits).map_err(|e| CryptoError::InvalidEncoding(format!("hex: {e}")))
}

/// Decode hex that must be exactly `N` bytes.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` if the input is not valid hex or
/// does not decode to `N` bytes.
pub fn decode_hex_array<const N: usize>(input: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode_hex(input)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidEncoding(format!("expected {N} bytes, got {len}")))
}

/// `0x`-prefixed lowercase hex.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` if `input` is not padded standard base64.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(input.trim())
        .map_err(|e| CryptoError::InvalidEncoding(format!("base64: {e}")))
}

#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
