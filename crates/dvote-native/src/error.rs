use dvote_crypto_core::CryptoError;
use thiserror::Error;

/// Code reported when a panic is caught at the boundary.
pub const INTERNAL_ERROR_CODE: i32 = 900;

/// Everything that can go wrong inside a C call.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("internal error: {0}")]
    Panic(String),
}

impl NativeError {
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Crypto(e) => e.code(),
            Self::Panic(_) => INTERNAL_ERROR_CODE,
        }
    }
}
