//! The default, system-backed clock used by [`crate::TimestampSigner::new`].
//!
//! Exists as its own function (rather than inlining `SystemTime::now()`
//! where it's used) so it has a stable `fn() -> u64` signature that can
//! serve as `TimestampSigner`'s default type parameter.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds elapsed since the Unix epoch, per the system clock.
pub(crate) fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}
