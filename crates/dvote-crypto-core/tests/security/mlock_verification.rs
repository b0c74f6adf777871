//! Page locking for secret containers.
//!
//! `mlock` can fail under a low `RLIMIT_MEMLOCK` (CI containers), so only
//! platform-independent guarantees are asserted unconditionally.

use dvote_crypto_core::memory::SecretBuffer;

#[test]
fn empty_buffer_needs_no_lock() {
    let buf = SecretBuffer::new(&[]).unwrap();
    assert!(buf.is_empty());
    assert!(buf.expose().is_empty());
}

#[cfg(unix)]
#[test]
fn small_buffer_lock_status_is_stable() {
    let buf = SecretBuffer::new(&[0xAA; 64]).unwrap();
    let first = buf.is_mlocked();
    assert_eq!(buf.is_mlocked(), first);
    assert_eq!(buf.expose(), &[0xAA; 64]);
}
