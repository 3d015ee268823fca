use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "reliable-image",
    version,
    about = "Load a remote image through the memory cache and render it in the terminal",
    long_about = None
)]
pub struct CliArgs {
    /// Image URL to load.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// User agent sent with downloads.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// View width in terminal cells.
    #[arg(long)]
    pub width: Option<u16>,

    /// View height in terminal cells.
    #[arg(long)]
    pub height: Option<u16>,

    /// Corner radius in image pixels.
    #[arg(long)]
    pub corner_radius: Option<u16>,

    /// Number of additional views to mount for the same URL afterwards.
    #[arg(long, default_value_t = 0)]
    pub repeat: u32,
}
