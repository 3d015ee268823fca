//! Presentation layer with the image view and its terminal driver.

/// Terminal driver.
pub mod app;
/// Reusable widgets.
pub mod widgets;

pub use app::{App, ViewOutcome};
pub use widgets::ImageView;
