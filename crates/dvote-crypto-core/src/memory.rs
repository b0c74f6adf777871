//! Containers for secret material: mnemonic entropy, seeds, private scalars,
//! derived cipher keys.
//!
//! Both containers zeroize on drop and print a fixed mask from
//! `Debug`/`Display` regardless of content. Only the heap-backed
//! [`SecretBuffer`] is page-locked, since its address is stable.

use crate::error::CryptoError;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ── Page locking ────────────────────────────────────────────────────

/// Best-effort `mlock` guard. Unlocks on drop if the lock was taken.
pub struct PageLock {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: the pointer is only handed to mlock/munlock, never dereferenced.
unsafe impl Send for PageLock {}
unsafe impl Sync for PageLock {}

impl PageLock {
    /// Lock `len` bytes at `ptr`. Failure is logged once and otherwise ignored.
    pub(crate) fn acquire(ptr: *const u8, len: usize) -> Self {
        let locked = sys::lock(ptr, len);
        if !locked && len > 0 {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                tracing::warn!(
                    len,
                    "mlock unavailable, secret pages may be swapped (raise RLIMIT_MEMLOCK)"
                );
            });
        }
        Self { ptr, len, locked }
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Drop for PageLock {
    fn drop(&mut self) {
        if self.locked {
            sys::unlock(self.ptr, self.len);
        }
    }
}

// ── SecretBuffer ────────────────────────────────────────────────────

/// Heap buffer of secret bytes with a length known only at runtime
/// (mnemonic entropy, 64-byte BIP39 seeds, plaintext awaiting sealing).
pub struct SecretBuffer {
    inner: SecretSlice<u8>,
    lock: PageLock,
}

impl SecretBuffer {
    /// Copy `data` into a fresh locked allocation.
    ///
    /// The caller remains responsible for wiping its own copy.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` leaves room for allocators that can
    /// refuse locked memory.
    pub fn new(data: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self::from_vec(data.to_vec()))
    }

    /// Take ownership of `data` without copying it.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        let inner: SecretSlice<u8> = data.into();
        let bytes = inner.expose_secret();
        let lock = PageLock::acquire(bytes.as_ptr(), bytes.len());
        Self { inner, lock }
    }

    /// `len` bytes from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::SecureMemory` if the CSPRNG fails.
    pub fn random(len: usize) -> Result<Self, CryptoError> {
        let mut bytes = vec![0u8; len];
        if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
            bytes.zeroize();
            return Err(CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")));
        }
        Ok(Self::from_vec(bytes))
    }

    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the backing pages were successfully locked.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

impl fmt::Display for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── SecretBytes<N> ──────────────────────────────────────────────────

/// Fixed-width secret, used for private scalars, chain codes and
/// AES-256 keys.
///
/// Zeroized on drop but not page-locked: the value lives inline and moves,
/// and `munlock` on a stale address could release a page another secret
/// still shares.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SecretBytes<N> {
    #[must_use]
    pub const fn new(data: [u8; N]) -> Self {
        Self { bytes: data }
    }

    /// Copy a slice of exactly `N` bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidEncoding` on a length mismatch.
    pub fn from_slice(data: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; N] = data.try_into().map_err(|_| {
            CryptoError::InvalidEncoding(format!("expected {N} bytes, got {}", data.len()))
        })?;
        Ok(Self::new(arr))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::SecureMemory` if the CSPRNG fails.
    pub fn random() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; N];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        let out = Self::new(bytes);
        bytes.zeroize();
        Ok(out)
    }

    #[must_use]
    pub const fn expose(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Clone for SecretBytes<N> {
    fn clone(&self) -> Self {
        Self::new(self.bytes)
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(***)")
    }
}

impl<const N: usize> fmt::Display for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(data: [u8; N]) -> Self {
        Self::new(data)
    }
}

// ── Platform ────────────────────────────────────────────────────────

#[cfg(unix)]
mod sys {
    pub(super) fn lock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        // SAFETY: mlock validates the range itself and reports ENOMEM on a bad pointer.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn unlock(ptr: *const u8, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: see `lock`; a failed munlock is not an error for us.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }
}

#[cfg(not(unix))]
mod sys {
    pub(super) const fn lock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) const fn unlock(_ptr: *const u8, _len: usize) {}
}
