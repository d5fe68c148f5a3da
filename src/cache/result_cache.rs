use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::trace;

/// Cache of computed values that expire a fixed time after insertion
///
/// An entry is fresh while its age is strictly below the TTL, so a zero TTL
/// disables caching. There is no invalidation other than expiry.
pub struct ResultCache<K, V> {
    entries: Mutex<HashMap<K, CachedEntry<V>>>,
    ttl: Duration,
}

struct CachedEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CachedEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CachedEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh value for `key`; a stale entry is dropped on the way
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.lock().insert(
            key,
            CachedEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return the fresh value for `key`, or run `compute` and remember its result
    ///
    /// The lock is not held while computing, so two callers missing on the same
    /// key may both compute; the later insert wins. Errors are returned as-is
    /// and never stored.
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            trace!(?key, "result cache hit");
            return Ok(value);
        }
        trace!(?key, "result cache miss");

        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every stale entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(self.ttl));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
