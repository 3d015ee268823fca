//! Domain entities.

mod image;

pub use self::image::{
    CacheKey, DEFAULT_CORNER_RADIUS, ImageFrame, ImageSource, LoadState, LoadedImage,
};
