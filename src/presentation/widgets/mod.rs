mod display;
mod image_view;

pub use display::{
    Display, PLACEHOLDER_GLYPH, SPINNER_FRAMES, placeholder_area, rasterize, round_corners,
};
pub use image_view::ImageView;
