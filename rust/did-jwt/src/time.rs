//! Sources of "now" for stamping and validating tokens.

use instant::SystemTime;

/// Current POSIX time in whole seconds, or zero if the clock reads earlier
/// than the epoch.
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}

/// A clock that can be swapped out, so that tokens can be stamped or checked
/// as of an arbitrary moment.
pub trait TimeProvider: Send + Sync {
    /// The current time in seconds since the UNIX epoch
    fn now(&self) -> u64;
}

/// The wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> u64 {
        now()
    }
}

impl<T> TimeProvider for std::sync::Arc<T>
where
    T: TimeProvider + ?Sized,
{
    fn now(&self) -> u64 {
        (**self).now()
    }
}
