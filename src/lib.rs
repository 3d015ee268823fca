//! Reliable image - a cache-aware remote image view.
//!
//! Images are fetched once over HTTP with transport caching defeated, kept in
//! an in-memory cache keyed by the raw URL string, and rendered as a filled,
//! rounded image, a loading indicator, or a placeholder.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing the cache, fetcher, loader and config.
pub mod infrastructure;
/// Presentation layer containing the image view and terminal driver.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "reliable-image";
