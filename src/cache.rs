//! In-memory time-bounded cache
//!
//! Entries live until their TTL runs out. Each key owns its own async lock, so
//! at most one populate runs per key while other keys stay readable. Expired
//! entries are swept whenever a miss is about to add one, which keeps the map
//! bounded by what was fetched within the last TTL.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct StoredEntry<V> {
    value: V,
    expires_at: Instant,
}

type Slot<V> = Arc<tokio::sync::Mutex<Option<StoredEntry<V>>>>;

pub struct TtlCache<K, V> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &K) -> Slot<V> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key.clone()).or_default().clone()
    }

    /// Returns the fresh cached value, or runs `populate` and stores its `Ok`.
    ///
    /// The key's lock is held across `populate`: concurrent callers for the same
    /// key wait and then read the stored value. Errors are returned untouched and
    /// do not leave anything behind.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &K, populate: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let mut guard = slot.lock().await;

        if let Some(value) = fresh_value(&mut guard) {
            debug!(?key, "Cache hit");
            return Ok(value);
        }

        let purged = self.purge_expired();
        debug!(?key, purged, "Cache miss, populating");

        match populate().await {
            Ok(value) => {
                *guard = Some(StoredEntry {
                    value: value.clone(),
                    expires_at: Instant::now() + self.ttl,
                });
                Ok(value)
            }
            Err(e) => {
                self.release(key, &slot);
                Err(e)
            }
        }
    }

    /// Forget `slot` unless another caller is queued on it
    fn release(&self, key: &K, slot: &Slot<V>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // the map and this caller hold the only references
        let unused = Arc::strong_count(slot) == 2
            && slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot));
        if unused {
            slots.remove(key);
        }
    }

    /// Drops every expired or empty slot nobody is using
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(entry) => entry.as_ref().is_some_and(|e| now < e.expires_at),
                Err(_) => true,
            }
        });
        before - slots.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn fresh_value<V: Clone>(entry: &mut Option<StoredEntry<V>>) -> Option<V> {
    match entry {
        Some(stored) if Instant::now() < stored.expires_at => Some(stored.value.clone()),
        Some(_) => {
            debug!("Key found but expired");
            *entry = None;
            None
        }
        None => None,
    }
}
