//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entities::DEFAULT_CORNER_RADIUS;
use crate::infrastructure::image::ImageLoaderConfig;

pub(crate) const APP_NAME: &str = "reliable-image";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Image loader configuration.
    #[serde(default)]
    pub loader: ImageLoaderConfig,

    /// Image view configuration.
    #[serde(default)]
    pub view: ViewConfig,
}

/// Image view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View width in terminal cells.
    #[serde(default = "default_width")]
    pub width: u16,

    /// View height in terminal cells.
    #[serde(default = "default_height")]
    pub height: u16,

    /// Corner radius in image pixels.
    #[serde(default = "default_corner_radius")]
    pub corner_radius: u16,

    /// Delay between loading indicator frames in milliseconds.
    #[serde(default = "default_spinner_interval_ms")]
    pub spinner_interval_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            corner_radius: default_corner_radius(),
            spinner_interval_ms: default_spinner_interval_ms(),
        }
    }
}

fn default_width() -> u16 {
    40
}

fn default_height() -> u16 {
    12
}

fn default_corner_radius() -> u16 {
    DEFAULT_CORNER_RADIUS
}

fn default_spinner_interval_ms() -> u64 {
    100
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.loader.timeout_secs = timeout_secs;
        }
        if let Some(user_agent) = &args.user_agent {
            self.loader.user_agent = Some(user_agent.clone());
        }
        if let Some(width) = args.width {
            self.view.width = width;
        }
        if let Some(height) = args.height {
            self.view.height = height;
        }
        if let Some(corner_radius) = args.corner_radius {
            self.view.corner_radius = corner_radius;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("reliable-image.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            loader: ImageLoaderConfig::default(),
            view: ViewConfig::default(),
        }
    }
}
