//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, downloading, loading).
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager, ViewConfig};
pub use self::image::{
    CacheStats, HttpImageFetcher, ImageLoadedEvent, ImageLoader, ImageLoaderConfig, LoadHandle,
    LoadStart, MemoryImageCache,
};
