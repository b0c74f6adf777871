//! `tracing` bootstrap for hosts that want the core's events on stderr.

use std::sync::OnceLock;

use dvote_crypto_core::CryptoError;
use tracing_subscriber::EnvFilter;

/// Filter used when the host passes none.
pub const DEFAULT_FILTER: &str = "info,dvote_crypto_core=info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install a stderr subscriber once per process. Later calls are no-ops.
///
/// A host that already installed its own global subscriber keeps it.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` if `filter` is not a valid
/// `EnvFilter` directive string.
pub fn init(filter: Option<&str>) -> Result<(), CryptoError> {
    let directives = filter.unwrap_or(DEFAULT_FILTER);
    let env_filter = EnvFilter::try_new(directives)
        .map_err(|e| CryptoError::InvalidEncoding(format!("log filter: {e}")))?;
    let installed = *INSTALLED.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init()
            .is_ok()
    });
    tracing::debug!(installed, "dvote-native logging ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(None).unwrap();
        init(Some("debug")).unwrap();
    }

    #[test]
    fn bad_filter_rejected() {
        assert!(matches!(
            init(Some("dvote=notalevel")),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }
}
