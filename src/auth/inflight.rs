use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-key async guards: holders of the guard for a key run one at a time.
///
/// Guards are created on first use and kept for the life of the map, the same
/// way cache entries are.
#[derive(Debug, Clone, Default)]
pub struct KeyedGuards {
    guards: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl KeyedGuards {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let guard = {
            let mut guards = self.guards.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            guards
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        guard.lock_owned().await
    }
}
