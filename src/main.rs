use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use reliable_image::infrastructure::{
    AppConfig, CliArgs, ImageLoader, MemoryImageCache, StorageManager,
};
use reliable_image::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage =
        StorageManager::new().unwrap_or_else(|_| StorageManager::with_dir(PathBuf::from(".")));
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("failed to load configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = reliable_image::VERSION, "Starting reliable-image");

    let cache = MemoryImageCache::shared();
    let loader = Arc::new(ImageLoader::with_http(&config.loader, cache.clone())?);
    let app = App::new(loader, config.view.clone());

    let outcomes = app.run(&args.url, args.repeat).await?;

    for (mount, outcome) in outcomes.iter().enumerate() {
        println!("view {mount}: {outcome}");
    }
    info!(stats = %cache.stats(), "Finished");

    Ok(())
}
