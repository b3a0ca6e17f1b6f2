use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-employee mutual exclusion. Callers for different names never share a
/// mutex; idle entries are evicted so the table tracks active employees only.
#[derive(Clone)]
pub struct NameLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl NameLocks {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle_ttl).build(),
        }
    }

    /// Waits for exclusive access to `name`. Held until the guard drops.
    pub async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(name.to_string(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for NameLocks {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}
