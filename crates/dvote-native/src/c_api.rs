//! # C API
//!
//! Every function here is `extern "C"`, never unwinds, and reports failure
//! through the returned struct. String arguments must be null or point to
//! NUL-terminated memory that stays valid for the duration of the call;
//! null and non-UTF-8 arguments are reported as `InvalidEncoding`.

use std::any::Any;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use dvote_crypto_core::encoding::{decode_base64, encode_base64};
use dvote_crypto_core::hashing::{field_from_hex, field_to_hex};
use dvote_crypto_core::signing::{ExpectedSigner, Signature};
use dvote_crypto_core::zkp::{
    self, CircuitDepth, EligibilityProof, EligibilityProvingKey, EligibilityStatement,
    EligibilityVerifyingKey, EligibilityWitness, ProofCancellation, VoterSecret,
};
use dvote_crypto_core::{hashing, hd, keys, mnemonic, signing, symmetric, CryptoError};
use rand::rngs::OsRng;
use serde::Serialize;

use crate::error::NativeError;
use crate::logging;
use crate::types::{FfiBoolResult, FfiResult};

// ============================================================================
// BOUNDARY HELPERS
// ============================================================================

/// Borrow a C string argument as `&str`.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn arg<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, CryptoError> {
    if ptr.is_null() {
        return Err(CryptoError::InvalidEncoding(format!("`{name}` is null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| CryptoError::InvalidEncoding(format!("`{name}` is not valid UTF-8")))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic in native call".to_owned())
}

fn guarded<T>(op: &'static str, f: impl FnOnce() -> Result<T, CryptoError>) -> Result<T, NativeError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::debug!(op, code = e.code(), "native call failed");
            Err(e.into())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(op, %message, "panic caught at the C boundary");
            Err(NativeError::Panic(message))
        }
    }
}

fn run(op: &'static str, f: impl FnOnce() -> Result<String, CryptoError>) -> FfiResult {
    match guarded(op, f) {
        Ok(data) => FfiResult::ok(data),
        Err(e) => FfiResult::err(&e),
    }
}

fn run_bool(op: &'static str, f: impl FnOnce() -> Result<bool, CryptoError>) -> FfiBoolResult {
    match guarded(op, f) {
        Ok(value) => FfiBoolResult::ok(value),
        Err(e) => FfiBoolResult::err(&e),
    }
}

// ============================================================================
// CLAIMS
// ============================================================================

/// Poseidon digest of a UTF-8 claim: base64 of the 32-byte big-endian value.
///
/// # Safety
///
/// `claim` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn digest_string_claim(claim: *const c_char) -> FfiResult {
    run("digest_string_claim", || {
        let claim = unsafe { arg(claim, "claim")? };
        Ok(hashing::digest_string_claim(claim).to_base64())
    })
}

/// Poseidon digest of hex-encoded claim bytes, base64 like
/// [`digest_string_claim`]. A `0x` prefix is optional.
///
/// # Safety
///
/// `hex_claim` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn digest_hex_claim(hex_claim: *const c_char) -> FfiResult {
    run("digest_hex_claim", || {
        let hex_claim = unsafe { arg(hex_claim, "hex_claim")? };
        hashing::digest_hex_claim(hex_claim).map(|d| d.to_base64())
    })
}

// ============================================================================
// KEYS
// ============================================================================

/// Fresh BIP39 English mnemonic for `size` bits of entropy
/// (128, 160, 192, 224 or 256).
#[no_mangle]
pub extern "C" fn generate_mnemonic(size: i32) -> FfiResult {
    run("generate_mnemonic", || {
        let bits = usize::try_from(size)
            .map_err(|_| CryptoError::UnsupportedEntropyLength(i64::from(size)))?;
        mnemonic::generate_mnemonic(bits).map(|m| m.phrase().to_owned())
    })
}

/// BIP32 private key at `hd_path` for `mnemonic`, as `0x` hex.
/// An empty path or `m` yields the root key.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn compute_private_key(
    mnemonic: *const c_char,
    hd_path: *const c_char,
) -> FfiResult {
    run("compute_private_key", || {
        let (mnemonic, hd_path) = unsafe { (arg(mnemonic, "mnemonic")?, arg(hd_path, "hd_path")?) };
        hd::compute_private_key(mnemonic, hd_path).map(|k| k.to_hex())
    })
}

/// Compressed (33-byte) public key for a hex private key.
///
/// # Safety
///
/// `private_key` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn compute_public_key(private_key: *const c_char) -> FfiResult {
    run("compute_public_key", || {
        let private_key = unsafe { arg(private_key, "private_key")? };
        keys::compute_public_key(private_key).map(|p| p.to_hex())
    })
}

/// Uncompressed (65-byte) public key for a hex private key.
///
/// # Safety
///
/// `private_key` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn compute_public_key_uncompressed(private_key: *const c_char) -> FfiResult {
    run("compute_public_key_uncompressed", || {
        let private_key = unsafe { arg(private_key, "private_key")? };
        keys::compute_public_key(private_key).map(|p| p.to_hex_uncompressed())
    })
}

/// EIP-55 address for a hex private key, public key or address.
///
/// # Safety
///
/// `key` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn compute_address(key: *const c_char) -> FfiResult {
    run("compute_address", || {
        let key = unsafe { arg(key, "key")? };
        keys::compute_address(key).map(|a| a.to_checksum())
    })
}

// ============================================================================
// SIGNATURES
// ============================================================================

/// 65-byte `r || s || v` signature over the EIP-191 hash of `message`.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn sign_message(
    message: *const c_char,
    private_key: *const c_char,
) -> FfiResult {
    run("sign_message", || {
        let (message, private_key) =
            unsafe { (arg(message, "message")?, arg(private_key, "private_key")?) };
        let key = keys::PrivateKey::from_hex(private_key)?;
        signing::sign_message(message.as_bytes(), &key).map(|s| s.to_hex())
    })
}

/// Compressed public key of the signer.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn recover_signer(
    signature: *const c_char,
    message: *const c_char,
) -> FfiResult {
    run("recover_signer", || {
        let (signature, message) =
            unsafe { (arg(signature, "signature")?, arg(message, "message")?) };
        let signature = Signature::from_hex(signature)?;
        signing::recover_signer(&signature, message.as_bytes()).map(|p| p.to_hex())
    })
}

/// EIP-55 address of the signer.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn recover_address(
    signature: *const c_char,
    message: *const c_char,
) -> FfiResult {
    run("recover_address", || {
        let (signature, message) =
            unsafe { (arg(signature, "signature")?, arg(message, "message")?) };
        let signature = Signature::from_hex(signature)?;
        signing::recover_address(&signature, message.as_bytes()).map(|a| a.to_checksum())
    })
}

/// Whether `signature` over `message` came from `expected` (an address or
/// a public key). A mismatch is `value = false`, not an error.
///
/// # Safety
///
/// All arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn is_valid(
    signature: *const c_char,
    message: *const c_char,
    expected: *const c_char,
) -> FfiBoolResult {
    run_bool("is_valid", || {
        let (signature, message, expected) = unsafe {
            (
                arg(signature, "signature")?,
                arg(message, "message")?,
                arg(expected, "expected")?,
            )
        };
        let signature = Signature::from_hex(signature)?;
        let expected = ExpectedSigner::from_hex(expected)?;
        signing::is_valid(&signature, message.as_bytes(), &expected)
    })
}

// ============================================================================
// SYMMETRIC
// ============================================================================

/// Seal `message` under `passphrase`; returns the envelope as base64.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn encrypt_symmetric(
    message: *const c_char,
    passphrase: *const c_char,
) -> FfiResult {
    run("encrypt_symmetric", || {
        let (message, passphrase) =
            unsafe { (arg(message, "message")?, arg(passphrase, "passphrase")?) };
        symmetric::encrypt_symmetric(message.as_bytes(), passphrase).map(|e| encode_base64(&e))
    })
}

/// Open a base64 envelope; the plaintext must be UTF-8 without NUL bytes.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn decrypt_symmetric(
    envelope: *const c_char,
    passphrase: *const c_char,
) -> FfiResult {
    run("decrypt_symmetric", || {
        let (envelope, passphrase) =
            unsafe { (arg(envelope, "envelope")?, arg(passphrase, "passphrase")?) };
        let plaintext = symmetric::decrypt_symmetric(&decode_base64(envelope)?, passphrase)?;
        std::str::from_utf8(plaintext.expose())
            .map(str::to_owned)
            .map_err(|_| CryptoError::InvalidEncoding("plaintext is not UTF-8".into()))
    })
}

// ============================================================================
// ELIGIBILITY PROOFS
// ============================================================================

#[derive(Serialize)]
struct KeyBundle {
    depth: u8,
    proving_key: String,
    verifying_key: String,
}

/// Groth16 setup for a census of `depth` levels (1..=32).
///
/// Returns JSON `{"depth", "proving_key", "verifying_key"}` with base64 keys.
#[no_mangle]
pub extern "C" fn generate_zk_keys(depth: u32) -> FfiResult {
    run("generate_zk_keys", || {
        let depth = CircuitDepth::new(depth)?;
        let (pk, vk) = zkp::setup_eligibility_keys(depth, &mut OsRng)?;
        let bundle = KeyBundle {
            depth: depth.get(),
            proving_key: pk.to_base64()?,
            verifying_key: vk.to_base64()?,
        };
        serde_json::to_string(&bundle)
            .map_err(|e| CryptoError::InvalidEncoding(format!("key bundle: {e}")))
    })
}

/// Eligibility proof as base64. `timeout_ms = 0` means no deadline.
///
/// # Safety
///
/// All pointer arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn generate_zk_proof(
    proving_key: *const c_char,
    witness_json: *const c_char,
    statement_json: *const c_char,
    timeout_ms: u64,
) -> FfiResult {
    run("generate_zk_proof", || {
        let (proving_key, witness_json, statement_json) = unsafe {
            (
                arg(proving_key, "proving_key")?,
                arg(witness_json, "witness_json")?,
                arg(statement_json, "statement_json")?,
            )
        };
        let pk = EligibilityProvingKey::from_base64(proving_key)?;
        let witness = EligibilityWitness::from_json(witness_json)?;
        let statement = EligibilityStatement::from_json(statement_json)?;
        let cancellation = if timeout_ms == 0 {
            ProofCancellation::new()
        } else {
            ProofCancellation::with_timeout(Duration::from_millis(timeout_ms))
        };
        zkp::generate_zk_proof(&pk, &witness, &statement, &cancellation)?.to_base64()
    })
}

/// Check a base64 proof against a statement. Needs no witness.
///
/// # Safety
///
/// All arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn verify_zk_proof(
    verifying_key: *const c_char,
    proof: *const c_char,
    statement_json: *const c_char,
) -> FfiBoolResult {
    run_bool("verify_zk_proof", || {
        let (verifying_key, proof, statement_json) = unsafe {
            (
                arg(verifying_key, "verifying_key")?,
                arg(proof, "proof")?,
                arg(statement_json, "statement_json")?,
            )
        };
        let vk = EligibilityVerifyingKey::from_base64(verifying_key)?;
        let proof = EligibilityProof::from_base64(proof)?;
        let statement = EligibilityStatement::from_json(statement_json)?;
        zkp::verify_zk_proof(&vk, &proof, &statement)
    })
}

/// Census leaf for a voter secret (32-byte field element hex).
///
/// # Safety
///
/// `secret` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn compute_census_leaf(secret: *const c_char) -> FfiResult {
    run("compute_census_leaf", || {
        let secret = unsafe { arg(secret, "secret")? };
        let secret = VoterSecret::from_field(field_from_hex(secret)?);
        Ok(field_to_hex(&secret.leaf()))
    })
}

/// Nullifier of a voter secret for one election.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn compute_nullifier(
    secret: *const c_char,
    election_id: *const c_char,
) -> FfiResult {
    run("compute_nullifier", || {
        let (secret, election_id) =
            unsafe { (arg(secret, "secret")?, arg(election_id, "election_id")?) };
        let secret = VoterSecret::from_field(field_from_hex(secret)?);
        Ok(field_to_hex(&secret.nullifier(&field_from_hex(election_id)?)))
    })
}

/// Voter secret derived from a signature, typically over
/// `VOTER_SECRET_MESSAGE`.
///
/// # Safety
///
/// `signature` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn derive_voter_secret(signature: *const c_char) -> FfiResult {
    run("derive_voter_secret", || {
        let signature = unsafe { arg(signature, "signature")? };
        let secret = VoterSecret::from_signature(&Signature::from_hex(signature)?);
        Ok(field_to_hex(secret.expose()))
    })
}

// ============================================================================
// RUNTIME
// ============================================================================

/// Route core `tracing` events to stderr. `filter` may be null for the
/// default; later calls are no-ops.
///
/// # Safety
///
/// `filter` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn dvote_init_logging(filter: *const c_char) -> FfiResult {
    let result = guarded("dvote_init_logging", || {
        let filter = if filter.is_null() {
            None
        } else {
            Some(unsafe { arg(filter, "filter")? })
        };
        logging::init(filter)
    });
    match result {
        Ok(()) => FfiResult::ok_empty(),
        Err(e) => FfiResult::err(&e),
    }
}

/// Library version. Release with [`free_cstr`].
#[no_mangle]
pub extern "C" fn dvote_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION")).map_or(std::ptr::null_mut(), CString::into_raw)
}

/// Release a string returned by any function in this library.
/// Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from this library that has not
/// been released yet.
#[no_mangle]
pub unsafe extern "C" fn free_cstr(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
