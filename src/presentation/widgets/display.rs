//! Mapping from load state to what an image view shows.

use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use ratatui::layout::Rect;

use crate::domain::entities::{ImageFrame, LoadState};

/// Braille frames of the loading indicator.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Glyph drawn in the failure placeholder.
pub const PLACEHOLDER_GLYPH: &str = "▨";

/// What an image view shows for a given state.
#[derive(Debug, Clone)]
pub enum Display {
    /// The image, filled into the frame and clipped to rounded corners.
    Image {
        /// The decoded image.
        image: Arc<DynamicImage>,
        /// Bounds it fills.
        frame: ImageFrame,
    },
    /// A loading indicator sized to the frame.
    Loading {
        /// Bounds the indicator is centred in.
        frame: ImageFrame,
    },
    /// A muted placeholder glyph fit inside the frame.
    Placeholder {
        /// Bounds the placeholder is fit into.
        frame: ImageFrame,
    },
}

impl Display {
    /// Maps a load state to its display.
    #[must_use]
    pub fn for_state(state: &LoadState, frame: ImageFrame) -> Self {
        match state {
            LoadState::Loaded(image) => Self::Image {
                image: image.clone(),
                frame,
            },
            LoadState::Idle | LoadState::Loading => Self::Loading { frame },
            LoadState::Failed => Self::Placeholder { frame },
        }
    }

    /// Returns the frame this display occupies.
    #[must_use]
    pub const fn frame(&self) -> ImageFrame {
        match self {
            Self::Image { frame, .. } | Self::Loading { frame } | Self::Placeholder { frame } => {
                *frame
            }
        }
    }
}

/// Scales `image` to fill `width x height`, cropping the overflow around the
/// centre, then clears the pixels outside the rounded corners.
#[must_use]
pub fn rasterize(image: &DynamicImage, width: u32, height: u32, corner_radius: u32) -> RgbaImage {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(width, height);
    }

    let mut raster = image
        .resize_to_fill(width, height, FilterType::Triangle)
        .to_rgba8();
    round_corners(&mut raster, corner_radius);
    raster
}

/// Makes every pixel outside a quarter circle of `radius` in each corner
/// fully transparent. The radius is clamped to half the shorter side.
pub fn round_corners(raster: &mut RgbaImage, radius: u32) {
    let (width, height) = raster.dimensions();
    let radius = radius.min(width / 2).min(height / 2);
    if radius == 0 {
        return;
    }

    let r = f64::from(radius);
    for y in 0..height {
        let Some(dy) = corner_offset(y, height, radius) else {
            continue;
        };
        for x in 0..width {
            let Some(dx) = corner_offset(x, width, radius) else {
                continue;
            };
            let px = f64::from(dx) + 0.5 - r;
            let py = f64::from(dy) + 0.5 - r;
            if px * px + py * py > r * r {
                raster.get_pixel_mut(x, y).0[3] = 0;
            }
        }
    }
}

/// Distance of `pos` from the nearest edge, if it lies within a corner band.
fn corner_offset(pos: u32, len: u32, radius: u32) -> Option<u32> {
    if pos < radius {
        Some(pos)
    } else if pos >= len - radius {
        Some(len - 1 - pos)
    } else {
        None
    }
}

/// Largest square (in pixels, two per cell row) that fits in `area`,
/// centred.
#[must_use]
pub fn placeholder_area(area: Rect) -> Rect {
    let side = area.width.min(area.height.saturating_mul(2));
    let width = side;
    let height = (side / 2).max(u16::from(side > 0));

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
