//! In-memory image cache implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::CacheKey;
use crate::domain::ports::ImageCachePort;

static SHARED: LazyLock<Arc<MemoryImageCache>> =
    LazyLock::new(|| Arc::new(MemoryImageCache::new()));

/// Unbounded in-memory cache of decoded images keyed by raw URL string.
/// Thread-safe; concurrent writes to one key resolve as last write wins.
pub struct MemoryImageCache {
    entries: RwLock<HashMap<CacheKey, Arc<image::DynamicImage>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the process-wide cache shared by every view that is not given
    /// its own instance.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        SHARED.clone()
    }

    /// Returns true if `key` is cached, without touching the hit counters.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ImageCachePort for MemoryImageCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<image::DynamicImage>> {
        let entries = self.entries.read();
        if let Some(img) = entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    fn put(&self, key: CacheKey, image: Arc<image::DynamicImage>) {
        debug!(key = %key, "Storing image in memory cache");
        self.entries.write().insert(key, image);
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn clear(&self) {
        self.entries.write().clear();
        debug!("Cleared memory image cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_put_and_get() {
        let cache = MemoryImageCache::new();
        let key = CacheKey::from("https://example.com/cat.png");
        let img = Arc::new(image::DynamicImage::new_rgb8(100, 100));

        cache.put(key.clone(), img.clone());
        let retrieved = cache.get(&key);

        assert!(retrieved.is_some_and(|r| Arc::ptr_eq(&r, &img)));
    }

    #[test]
    fn test_cache_miss() {
        let cache = MemoryImageCache::new();
        assert!(cache.get(&CacheKey::from("nonexistent")).is_none());
    }

    #[test]
    fn test_keys_match_exact_strings_only() {
        let cache = MemoryImageCache::new();
        let img = Arc::new(image::DynamicImage::new_rgb8(10, 10));

        cache.put(CacheKey::from("https://example.com/cat.png"), img);

        assert!(cache.get(&CacheKey::from("https://EXAMPLE.com/cat.png")).is_none());
        assert!(cache.get(&CacheKey::from("https://example.com/cat.png#")).is_none());
        assert!(cache.get(&CacheKey::from("https://example.com/cat.png")).is_some());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MemoryImageCache::new();
        let key = CacheKey::from("k");
        let first = Arc::new(image::DynamicImage::new_rgb8(1, 1));
        let second = Arc::new(image::DynamicImage::new_rgb8(2, 2));

        cache.put(key.clone(), first);
        cache.put(key.clone(), second.clone());

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).is_some_and(|r| Arc::ptr_eq(&r, &second)));
    }

    #[test]
    fn test_cache_has_no_size_bound() {
        let cache = MemoryImageCache::new();
        let img = Arc::new(image::DynamicImage::new_rgb8(1, 1));

        for i in 0..500 {
            cache.put(CacheKey::new(format!("https://example.com/{i}.png")), img.clone());
        }

        assert_eq!(cache.len(), 500);
        assert!(cache.contains(&CacheKey::from("https://example.com/0.png")));
    }

    #[test]
    fn test_cache_stats() {
        let cache = MemoryImageCache::new();
        let key = CacheKey::from("test1");
        cache.put(key.clone(), Arc::new(image::DynamicImage::new_rgb8(10, 10)));

        let _ = cache.get(&key);
        let _ = cache.get(&CacheKey::from("missing"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear() {
        let cache = MemoryImageCache::new();
        cache.put(CacheKey::from("a"), Arc::new(image::DynamicImage::new_rgb8(1, 1)));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_is_one_instance() {
        assert!(Arc::ptr_eq(&MemoryImageCache::shared(), &MemoryImageCache::shared()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes() {
        let cache = Arc::new(MemoryImageCache::new());
        let mut tasks = Vec::new();

        for i in 0..16u32 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                let img = Arc::new(image::DynamicImage::new_rgb8(i + 1, 1));
                cache.put(CacheKey::from("same"), img);
                cache.put(CacheKey::new(format!("k{i}")), Arc::new(image::DynamicImage::new_rgb8(1, 1)));
            }));
        }
        for task in tasks {
            task.await.expect("task panicked");
        }

        assert_eq!(cache.len(), 17);
        assert!(cache.get(&CacheKey::from("same")).is_some());
    }
}
