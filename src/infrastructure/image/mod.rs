//! Image handling infrastructure.
//!
//! This module provides:
//! - Unbounded memory caching keyed by raw URL string
//! - HTTP downloads that bypass transport caches
//! - Async image loading pipeline

pub mod decode;
pub mod http_fetcher;
pub mod loader;
pub mod memory_cache;

#[cfg(test)]
pub(crate) mod test_support;

pub use decode::decode_image;
pub use http_fetcher::HttpImageFetcher;
pub use loader::{
    DEFAULT_TIMEOUT_SECS, ImageLoadedEvent, ImageLoader, ImageLoaderConfig, LoadHandle, LoadStart,
    parse_image_url,
};
pub use memory_cache::{CacheStats, MemoryImageCache};
