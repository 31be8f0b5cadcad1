use crate::metadata::FileMetadata;
use baseline_dialects::DetectedFeature;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};

/// Counters for cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries pushed out by capacity pressure
    pub evictions: u64,
    /// Entries dropped because they outlived the TTL
    pub expirations: u64,
}

struct TimedEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// LRU container whose entries also expire after a fixed TTL.
///
/// `get` refreshes recency; `peek` does not. Expired entries are dropped lazily on access
/// or eagerly via [`LruTtlCache::sweep_expired`].
pub struct LruTtlCache<K: Hash + Eq, V> {
    entries: LruCache<K, TimedEntry<V>>,
    ttl: Duration,
    stats: CacheStats,
}

impl<K: Hash + Eq + Clone, V> LruTtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<&V> {
        let expired = self
            .entries
            .peek(key)
            .map(|entry| self.is_expired(entry, now));

        match expired {
            None => {
                self.stats.misses += 1;
                None
            }
            Some(true) => {
                self.entries.pop(key);
                self.stats.expirations += 1;
                self.stats.misses += 1;
                None
            }
            Some(false) => {
                self.stats.hits += 1;
                self.entries.get(key).map(|entry| &entry.value)
            }
        }
    }

    /// Read without touching recency or counters; expired entries read as absent
    pub fn peek(&self, key: &K) -> Option<&V> {
        let now = Instant::now();
        self.entries
            .peek(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| &entry.value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        let entry = TimedEntry {
            value,
            inserted_at: now,
        };
        if let Some((displaced, _)) = self.entries.push(key.clone(), entry) {
            if displaced != key {
                self.stats.evictions += 1;
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key).map(|entry| entry.value)
    }

    /// Drop every entry older than the TTL; returns how many were dropped
    pub fn sweep_expired(&mut self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub fn sweep_expired_at(&mut self, now: Instant) -> usize {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }
        self.stats.expirations += expired.len() as u64;
        expired.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn is_expired(&self, entry: &TimedEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }
}

/// A parse result together with the file identity it was computed from
#[derive(Debug, Clone)]
pub struct CachedParseResult {
    pub features: Vec<DetectedFeature>,
    pub metadata: FileMetadata,
    pub cached_at: SystemTime,
}

/// Process-scoped parse-result cache keyed by path.
///
/// An entry is served only while the file's mtime, size and content hash still match and
/// the entry is younger than the TTL. Filesystem errors are cache misses.
pub struct CacheManager {
    entries: Mutex<LruTtlCache<PathBuf, CachedParseResult>>,
}

impl CacheManager {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruTtlCache::new(capacity, ttl)),
        }
    }

    /// Cached features for `path`, or `None` when absent, expired or stale
    pub async fn get(&self, path: &Path) -> Option<Vec<DetectedFeature>> {
        let current = FileMetadata::probe(path).await?;
        self.get_matching(path, &current)
    }

    /// Cached features for `path` when they were computed from `current`
    pub fn get_matching(
        &self,
        path: &Path,
        current: &FileMetadata,
    ) -> Option<Vec<DetectedFeature>> {
        let key = path.to_path_buf();
        let mut entries = self.lock();
        let lookup = entries
            .get(&key)
            .map(|cached| (cached.metadata == *current).then(|| cached.features.clone()));

        match lookup {
            None => None,
            Some(Some(features)) => Some(features),
            Some(None) => {
                log::debug!("Cache entry for {} is stale", path.display());
                entries.remove(&key);
                None
            }
        }
    }

    /// Store features for `path` against its current metadata
    pub async fn set(&self, path: &Path, features: Vec<DetectedFeature>) {
        match FileMetadata::probe(path).await {
            Some(metadata) => self.set_with_metadata(path, features, metadata),
            None => log::debug!("Not caching {}: metadata unavailable", path.display()),
        }
    }

    pub fn set_with_metadata(
        &self,
        path: &Path,
        features: Vec<DetectedFeature>,
        metadata: FileMetadata,
    ) {
        self.lock().insert(
            path.to_path_buf(),
            CachedParseResult {
                features,
                metadata,
                cached_at: SystemTime::now(),
            },
        );
    }

    /// Partition `paths` into (changed, unchanged) against the cached metadata.
    ///
    /// Files without a fresh entry, and files whose metadata cannot be read, are changed.
    pub async fn get_changed_files(&self, paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut changed = Vec::new();
        let mut unchanged = Vec::new();

        for path in paths {
            let current = FileMetadata::probe(path).await;
            let matches = current.is_some_and(|current| {
                self.lock()
                    .peek(path)
                    .is_some_and(|cached| cached.metadata == current)
            });
            if matches {
                unchanged.push(path.clone());
            } else {
                changed.push(path.clone());
            }
        }

        (changed, unchanged)
    }

    pub fn invalidate(&self, path: &Path) -> bool {
        self.lock().remove(&path.to_path_buf()).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn sweep_expired(&self) -> usize {
        self.lock().sweep_expired()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    // Entries stay consistent across a panic mid-operation; recover the guard.
    fn lock(&self) -> MutexGuard<'_, LruTtlCache<PathBuf, CachedParseResult>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.lock();
        f.debug_struct("CacheManager")
            .field("len", &entries.len())
            .field("capacity", &entries.capacity())
            .field("stats", &entries.stats())
            .finish()
    }
}
