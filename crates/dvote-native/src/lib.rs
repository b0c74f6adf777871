//! `dvote-native`: flat C surface over `dvote-crypto-core`.
//!
//! Every call is blocking and stateless. Strings cross the boundary as
//! NUL-terminated UTF-8; every non-null `char*` handed out must be released
//! exactly once with [`free_cstr`]. See `include/dvote_native.h`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

mod c_api;
mod error;
mod logging;
mod types;

pub use c_api::*;
pub use error::{NativeError, INTERNAL_ERROR_CODE};
pub use types::{FfiBoolResult, FfiResult};
