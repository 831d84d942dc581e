use std::time::Duration;

use tokio::{sync::RwLock, time::Instant};

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// Holds a single value for a fixed duration after it was stored.
///
/// Readers never see a value older than the TTL. Concurrent misses may both
/// recompute and `set`; the last write wins.
pub struct TtlCache<T> {
    ttl: Duration,
    entry: RwLock<Option<Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// The cached value, if one is stored and still fresh
    pub async fn get(&self) -> Option<T> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    pub async fn set(&self, value: T) {
        *self.entry.write().await = Some(Entry {
            value,
            stored_at: Instant::now(),
        });
    }

    pub async fn is_expired(&self) -> bool {
        match self.entry.read().await.as_ref() {
            Some(e) => e.stored_at.elapsed() >= self.ttl,
            None => true,
        }
    }
}
