use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-repository exclusion so two builds for the same task cannot interleave
/// their delete/create/write sequences inside this process.
#[derive(Clone, Default)]
pub struct RepoLocks {
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

/// Held for the duration of a publish; drops its map entry when uncontended.
pub struct RepoGuard {
    _guard: OwnedMutexGuard<()>,
    name: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, name: &str) -> RepoGuard {
        let lock = self.inner.entry(name.to_owned()).or_default().clone();
        let guard = lock.lock_owned().await;
        RepoGuard {
            _guard: guard,
            name: name.to_owned(),
            locks: Arc::clone(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Drop for RepoGuard {
    fn drop(&mut self) {
        // Map + this guard; anything above that is a waiter still queued on the lock
        self.locks
            .remove_if(&self.name, |_, lock| Arc::strong_count(lock) <= 2);
    }
}
