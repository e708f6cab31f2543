use crate::time::TimeProvider;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// A clock that only moves when told to. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct FixedTimeProvider {
    seconds: Arc<AtomicU64>,
}

impl FixedTimeProvider {
    pub fn new(seconds: u64) -> Self {
        FixedTimeProvider {
            seconds: Arc::new(AtomicU64::new(seconds)),
        }
    }

    pub fn set(&self, seconds: u64) {
        self.seconds.store(seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> u64 {
        self.seconds.load(Ordering::SeqCst)
    }
}
