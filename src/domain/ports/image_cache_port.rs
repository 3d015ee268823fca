//! Port definition for image caching.

use std::sync::Arc;

use crate::domain::entities::CacheKey;

/// Port for the decoded-image cache.
///
/// Implementations must be safe to read from the UI context and write from
/// whichever task completes a download. Methods are synchronous so a cache
/// hit never suspends the caller.
pub trait ImageCachePort: Send + Sync {
    /// Returns the cached image for `key`, if any.
    fn get(&self, key: &CacheKey) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image. An existing entry for the same key is replaced.
    fn put(&self, key: CacheKey, image: Arc<image::DynamicImage>);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every cached image.
    fn clear(&self);
}
