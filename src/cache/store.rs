use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::models::MediaKind;
use crate::parser::normalize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Resolved poster URL; movies and series share one namespace
    Poster { kind: MediaKind, title: String },
    /// Generated placeholder data URL
    Placeholder(String),
}

impl CacheKey {
    pub fn poster(kind: MediaKind, title: &str) -> Self {
        CacheKey::Poster {
            kind,
            title: normalize(title),
        }
    }

    pub fn placeholder(title: &str) -> Self {
        CacheKey::Placeholder(normalize(title))
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Poster {
                kind: MediaKind::Movie,
                title,
            } => write!(f, "movie_{}", title),
            CacheKey::Poster {
                kind: MediaKind::Series,
                title,
            } => write!(f, "{}", title),
            CacheKey::Placeholder(title) => write!(f, "{}", title),
        }
    }
}

/// Process-lifetime string cache shared by cloning
///
/// Entries never expire; callers remove them explicitly. Work on a single key can be
/// serialized with [`Cache::lock_key`] so that concurrent resolutions of the same key
/// perform one remote lookup and the first success wins.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, String>>>,
    key_locks: KeyLocks,
}

type KeyLocks = Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>;

/// Holds a per-key lock; the key's lock entry is dropped with the last holder or waiter
pub struct KeyLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    key_locks: KeyLocks,
}

impl Drop for KeyLockGuard {
    fn drop(&mut self) {
        // Release first so the map holds the only remaining reference when uncontended
        drop(self.guard.take());

        let mut locks = self.key_locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the cache by key
    pub async fn get_from_cache(&self, key: &CacheKey) -> Option<String> {
        self.entries.read().await.get(&key.to_string()).cloned()
    }

    /// Stores a value, replacing any previous one
    pub async fn set_in_cache(&self, key: &CacheKey, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    /// Removes a value, returning it if it was present
    pub async fn remove(&self, key: &CacheKey) -> Option<String> {
        self.entries.write().await.remove(&key.to_string())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Acquires the per-key lock; held until the returned guard is dropped
    pub async fn lock_key(&self, key: &CacheKey) -> KeyLockGuard {
        let key = key.to_string();
        let lock = {
            let mut locks = self.key_locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        KeyLockGuard {
            guard: Some(lock.lock_owned().await),
            key,
            key_locks: self.key_locks.clone(),
        }
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.key_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
