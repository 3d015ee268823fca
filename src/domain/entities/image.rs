//! Domain types for image loading.

use std::sync::Arc;

/// Cache key for a decoded image.
///
/// This is the raw URL string exactly as the caller supplied it. It is never
/// parsed, hashed or normalized, so two spellings of the same resource are
/// two distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a key from the raw URL string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Display state of a single image view.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A load is expected or in flight.
    #[default]
    Loading,
    /// Image is decoded and ready for display.
    Loaded(Arc<image::DynamicImage>),
    /// Loading failed. The reason is only logged.
    Failed,
}

impl LoadState {
    /// Returns true if the image is ready for rendering.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns true while the loading indicator should be shown.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading)
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns true once no further transition can happen.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed)
    }

    /// Returns the decoded image, if loaded.
    #[must_use]
    pub const fn image(&self) -> Option<&Arc<image::DynamicImage>> {
        match self {
            Self::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

impl PartialEq for LoadState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Idle, Self::Idle)
            | (Self::Loading, Self::Loading)
            | (Self::Failed, Self::Failed) => true,
            (Self::Loaded(a), Self::Loaded(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Where an image was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Loaded from the in-memory cache.
    MemoryCache,
    /// Downloaded from network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Key the image is cached under.
    pub key: CacheKey,
    /// The decoded image.
    pub image: Arc<image::DynamicImage>,
    /// Source of the image.
    pub source: ImageSource,
}

/// Default corner radius of an image frame.
pub const DEFAULT_CORNER_RADIUS: u16 = 8;

/// Bounds an image is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width of the frame.
    pub width: u16,
    /// Height of the frame.
    pub height: u16,
    /// Radius of the rounded corners.
    pub corner_radius: u16,
}

impl ImageFrame {
    /// Creates a frame with the default corner radius.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }

    /// Sets the corner radius.
    #[must_use]
    pub const fn with_corner_radius(mut self, corner_radius: u16) -> Self {
        self.corner_radius = corner_radius;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_raw_string() {
        let key = CacheKey::from("https://example.com/./cat.png");
        assert_eq!(key.as_str(), "https://example.com/./cat.png");
        assert_ne!(key, CacheKey::from("https://example.com/cat.png"));
    }

    #[test]
    fn test_default_state_is_loading() {
        let state = LoadState::default();
        assert!(state.is_loading());
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_loaded_state_compares_by_identity() {
        let a = Arc::new(image::DynamicImage::new_rgb8(4, 4));
        let b = Arc::new(image::DynamicImage::new_rgb8(4, 4));

        assert_eq!(LoadState::Loaded(a.clone()), LoadState::Loaded(a.clone()));
        assert_ne!(LoadState::Loaded(a), LoadState::Loaded(b));
    }

    #[test]
    fn test_frame_default_radius() {
        let frame = ImageFrame::new(40, 10);
        assert_eq!(frame.corner_radius, 8);
        assert_eq!(frame.with_corner_radius(2).corner_radius, 2);
    }
}
