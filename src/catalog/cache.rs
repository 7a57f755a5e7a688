use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::scanner::{CatalogSource, DirectoryScanner};
use crate::state::data::{CatalogItem, Category};

/// Default number of distinct catalog directories kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Time source for entry expiry
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    directory: PathBuf,
    category: Category,
}

struct CacheEntry {
    items: Arc<[CatalogItem]>,
    scanned_at: Instant,
}

/// Memoizes catalog scans per directory.
///
/// Entries are never refreshed from the filesystem on their own: files added
/// after the first scan only show up after eviction, expiry (if `max_age` is
/// set) or an explicit `invalidate`.
pub struct CatalogCache<S = DirectoryScanner, C = SystemClock> {
    source: S,
    clock: C,
    max_age: Option<Duration>,
    entries: LruCache<CacheKey, CacheEntry>,
}

impl CatalogCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_source(DirectoryScanner, SystemClock, capacity)
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl<S: CatalogSource, C: Clock> CatalogCache<S, C> {
    /// A capacity of 0 is bumped to 1
    pub fn with_source(source: S, clock: C, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            clock,
            max_age: None,
            entries: LruCache::new(capacity),
        }
    }

    /// Expire entries older than `max_age`
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Return the cached items for `directory`, scanning it on a miss
    pub fn get_or_scan(&mut self, directory: &Path, category: Category) -> Arc<[CatalogItem]> {
        let key = CacheKey {
            directory: directory.to_path_buf(),
            category,
        };
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(&key) {
            let fresh = match self.max_age {
                Some(max_age) => now.saturating_duration_since(entry.scanned_at) < max_age,
                None => true,
            };
            if fresh {
                debug!("Catalog cache hit for {}", directory.display());
                return Arc::clone(&entry.items);
            }
            debug!("Catalog cache entry expired for {}", directory.display());
        }

        let items: Arc<[CatalogItem]> = self.source.scan(directory, category).into();
        self.entries.put(
            key,
            CacheEntry {
                items: Arc::clone(&items),
                scanned_at: now,
            },
        );
        items
    }

    /// Drop every entry for `directory`, whatever its category
    pub fn invalidate(&mut self, directory: &Path) {
        let stale: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.directory == directory)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            self.entries.pop(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
