//! Remote image view: load lifecycle plus terminal rendering.

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Widget},
};
use tokio::sync::mpsc;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::domain::entities::{ImageFrame, LoadState, LoadedImage};
use crate::domain::errors::LoadError;
use crate::infrastructure::image::{ImageLoadedEvent, ImageLoader, LoadHandle, LoadStart};

use super::display::{Display, PLACEHOLDER_GLYPH, SPINNER_FRAMES, placeholder_area, rasterize};

const MUTED: Color = Color::DarkGray;
const UPPER_HALF_BLOCK: &str = "▀";

/// A view that shows one remote image.
///
/// The view owns its [`LoadState`]. It asks the loader for the image when it
/// first appears and applies the completion event the UI loop hands back.
/// Dropping the view cancels a load still in flight.
pub struct ImageView {
    url_string: String,
    frame: ImageFrame,
    state: LoadState,
    handle: Option<LoadHandle>,
    raster: Option<RgbaImage>,
    spinner_tick: usize,
}

impl ImageView {
    /// Creates a view of `width x height` cells with the default corner radius.
    #[must_use]
    pub fn new(url_string: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            url_string: url_string.into(),
            frame: ImageFrame::new(width, height),
            state: LoadState::Loading,
            handle: None,
            raster: None,
            spinner_tick: 0,
        }
    }

    /// Sets the corner radius, in image pixels.
    #[must_use]
    pub fn with_corner_radius(mut self, corner_radius: u16) -> Self {
        self.frame = self.frame.with_corner_radius(corner_radius);
        self
    }

    /// Returns the URL string the view displays.
    #[must_use]
    pub fn url_string(&self) -> &str {
        &self.url_string
    }

    /// Returns the view bounds.
    #[must_use]
    pub const fn frame(&self) -> ImageFrame {
        self.frame
    }

    /// Returns the current load state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the in-flight load, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<&LoadHandle> {
        self.handle.as_ref()
    }

    /// Called when the view becomes visible.
    ///
    /// Starts a load unless one is already running or the view has settled.
    /// Returns true if a load was started.
    pub fn on_appear(
        &mut self,
        loader: &ImageLoader,
        events: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> bool {
        if self.handle.is_some() || self.state.is_terminal() {
            return false;
        }

        self.state = LoadState::Loading;
        match loader.start(&self.url_string, events) {
            LoadStart::Ready(result) => self.resolve(result),
            LoadStart::Pending(handle) => self.handle = Some(handle),
        }
        true
    }

    /// Applies a completion event. Events for any load other than the one
    /// this view is waiting on are ignored.
    ///
    /// Returns true if the state changed.
    pub fn apply(&mut self, event: ImageLoadedEvent) -> bool {
        let owned = self
            .handle
            .as_ref()
            .is_some_and(|h| h.id() == event.handle_id && !h.is_cancelled());
        if !owned {
            debug!(key = %event.key, id = %event.handle_id, "Ignoring stale image event");
            return false;
        }

        self.handle = None;
        self.resolve(event.result);
        true
    }

    /// Called when the view is torn down or hidden. Cancels the running load.
    pub fn on_disappear(&mut self, loader: &ImageLoader) {
        if let Some(handle) = self.handle.take() {
            loader.cancel(&handle);
        }
    }

    /// Advances the loading indicator.
    pub fn tick(&mut self) {
        self.spinner_tick = self.spinner_tick.wrapping_add(1);
    }

    /// Returns the current loading indicator frame.
    #[must_use]
    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_tick % SPINNER_FRAMES.len()]
    }

    /// Returns what the view shows for its current state.
    #[must_use]
    pub fn display(&self) -> Display {
        Display::for_state(&self.state, self.frame)
    }

    fn resolve(&mut self, result: Result<LoadedImage, LoadError>) {
        match result {
            Ok(loaded) => {
                debug!(key = %loaded.key, source = %loaded.source, "Image view loaded");
                self.raster = Some(rasterize(
                    &loaded.image,
                    u32::from(self.frame.width),
                    u32::from(self.frame.height) * 2,
                    u32::from(self.frame.corner_radius),
                ));
                self.state = LoadState::Loaded(loaded.image);
            }
            Err(_) => {
                self.raster = None;
                self.state = LoadState::Failed;
            }
        }
    }

    fn render_raster(raster: &RgbaImage, area: Rect, buf: &mut Buffer) {
        let pixel = |x: u32, y: u32| -> Option<Color> {
            raster
                .get_pixel_checked(x, y)
                .filter(|p| p.0[3] > 0)
                .map(|p| Color::Rgb(p.0[0], p.0[1], p.0[2]))
        };

        for row in 0..area.height {
            for col in 0..area.width {
                let top = pixel(u32::from(col), u32::from(row) * 2);
                let bottom = pixel(u32::from(col), u32::from(row) * 2 + 1);
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(top.unwrap_or(Color::Reset))
                        .set_bg(bottom.unwrap_or(Color::Reset));
                }
            }
        }
    }

    fn render_centered(glyph: &str, style: Style, area: Rect, buf: &mut Buffer) {
        let width = u16::try_from(glyph.width()).unwrap_or(u16::MAX);
        if area.width < width || area.height == 0 {
            return;
        }
        let x = area.x + (area.width - width) / 2;
        let y = area.y + area.height / 2;
        buf.set_string(x, y, glyph, style);
    }
}

impl std::fmt::Debug for ImageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageView")
            .field("url_string", &self.url_string)
            .field("frame", &self.frame)
            .field("state", &self.state)
            .field("pending", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for ImageView {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Widget for &ImageView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(Rect::new(
            area.x,
            area.y,
            self.frame.width,
            self.frame.height,
        ));
        if area.is_empty() {
            return;
        }

        match self.display() {
            Display::Image { .. } => {
                if let Some(raster) = &self.raster {
                    ImageView::render_raster(raster, area, buf);
                }
            }
            Display::Loading { .. } => {
                ImageView::render_centered(
                    self.spinner_frame(),
                    Style::default().fg(Color::Gray),
                    area,
                    buf,
                );
            }
            Display::Placeholder { .. } => {
                let style = Style::default().fg(MUTED);
                let fit = placeholder_area(area);
                let block = Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(style);
                let inner = block.inner(fit);
                if inner.is_empty() {
                    ImageView::render_centered(PLACEHOLDER_GLYPH, style, area, buf);
                } else {
                    block.render(fit, buf);
                    ImageView::render_centered(PLACEHOLDER_GLYPH, style, inner, buf);
                }
            }
        }
    }
}
