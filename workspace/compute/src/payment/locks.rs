use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

use super::period::PeriodKey;

type Registry = Arc<DashMap<PeriodKey, Arc<Mutex<()>>>>;

/// Per-key async locks serializing writers of one period key.
///
/// Writers of different keys never wait on each other. Cloning shares the
/// registry. An entry lives only while some writer holds or waits for it.
#[derive(Debug, Clone, Default)]
pub struct PeriodLocks {
    inner: Registry,
}

/// Exclusive access to one period key. Dropping it releases the lock and
/// forgets the key once nobody else is waiting.
#[derive(Debug)]
pub struct PeriodGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: PeriodKey,
    registry: Registry,
}

impl Drop for PeriodGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold their own clone of the mutex
        self.registry.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl PeriodLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. Released when the guard drops.
    pub async fn acquire(&self, key: &PeriodKey) -> PeriodGuard {
        let lock = self
            .inner
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        trace!("Waiting for lock on {}", key);
        PeriodGuard {
            guard: Some(lock.lock_owned().await),
            key: key.clone(),
            registry: self.inner.clone(),
        }
    }

    /// Number of keys currently held or waited for.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
