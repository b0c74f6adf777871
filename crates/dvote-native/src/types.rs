//! C-compatible result types.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use dvote_crypto_core::CryptoError;

use crate::error::NativeError;

/// Copy `message` into a C string, dropping interior NULs.
///
/// Only used for diagnostics, where a lossy copy beats losing the message.
fn lossy_c_string(message: String) -> *mut c_char {
    let mut bytes = message.into_bytes();
    bytes.retain(|&b| b != 0);
    CString::new(bytes).map_or(ptr::null_mut(), CString::into_raw)
}

/// Result of a call that yields a string.
///
/// On success `data` is set and `error_message` is null; on failure the
/// reverse. Both are owned by the caller.
#[repr(C)]
#[derive(Debug)]
pub struct FfiResult {
    /// 1 on success, 0 on error.
    pub success: i32,
    /// 0 on success, otherwise a stable error code.
    pub error_code: i32,
    pub error_message: *mut c_char,
    pub data: *mut c_char,
}

impl FfiResult {
    /// Success carrying `data`. Data with an interior NUL cannot be
    /// represented and is reported as an encoding error instead.
    #[must_use]
    pub fn ok(data: String) -> Self {
        match CString::new(data) {
            Ok(c) => Self {
                success: 1,
                error_code: 0,
                error_message: ptr::null_mut(),
                data: c.into_raw(),
            },
            Err(_) => Self::err(&NativeError::from(CryptoError::InvalidEncoding(
                "result contains a NUL byte".into(),
            ))),
        }
    }

    #[must_use]
    pub const fn ok_empty() -> Self {
        Self {
            success: 1,
            error_code: 0,
            error_message: ptr::null_mut(),
            data: ptr::null_mut(),
        }
    }

    #[must_use]
    pub fn err(error: &NativeError) -> Self {
        Self {
            success: 0,
            error_code: error.code(),
            error_message: lossy_c_string(error.to_string()),
            data: ptr::null_mut(),
        }
    }
}

/// Result of a yes/no query such as signature validation.
///
/// `value` is meaningful only when `success` is 1.
#[repr(C)]
#[derive(Debug)]
pub struct FfiBoolResult {
    pub success: i32,
    pub error_code: i32,
    pub error_message: *mut c_char,
    pub value: bool,
}

impl FfiBoolResult {
    #[must_use]
    pub const fn ok(value: bool) -> Self {
        Self {
            success: 1,
            error_code: 0,
            error_message: ptr::null_mut(),
            value,
        }
    }

    #[must_use]
    pub fn err(error: &NativeError) -> Self {
        Self {
            success: 0,
            error_code: error.code(),
            error_message: lossy_c_string(error.to_string()),
            value: false,
        }
    }
}
