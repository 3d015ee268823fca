//! Cache-aware async image loader.
//!
//! Resolution order: URL validation -> memory cache -> network.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{CacheKey, ImageSource, LoadedImage};
use crate::domain::errors::LoadError;
use crate::domain::ports::{ImageCachePort, ImageFetchPort};

use super::decode::decode_image;
use super::http_fetcher::HttpImageFetcher;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the image loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLoaderConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with downloads. Uses the HTTP client default if unset.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// Message sent when a started load finishes.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// Handle the load was started with.
    pub handle_id: Uuid,
    /// Cache key of the load.
    pub key: CacheKey,
    /// The loaded image, or why loading failed.
    pub result: Result<LoadedImage, LoadError>,
}

/// Handle to a load running in the background.
///
/// Cancelling stops the download and suppresses its event in the common case,
/// but a load that is already sending can still deliver one. Consumers match
/// events against their live handle and drop the rest.
#[derive(Debug)]
pub struct LoadHandle {
    id: Uuid,
    key: CacheKey,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl LoadHandle {
    /// Returns the handle id carried by the completion event.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the cache key being loaded.
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Cancels the load. No-op if it already finished.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.task.abort();
            debug!(key = %self.key, id = %self.id, "Cancelled image load");
        }
    }

    /// Returns true if [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Outcome of [`ImageLoader::start`].
#[derive(Debug)]
pub enum LoadStart {
    /// Resolved without touching the network: a cache hit or an invalid URL.
    Ready(Result<LoadedImage, LoadError>),
    /// A download is running; its result arrives as an [`ImageLoadedEvent`].
    Pending(LoadHandle),
}

enum Lookup {
    Hit(LoadedImage),
    Miss { key: CacheKey, url: Url },
}

/// Loads images through the cache, falling back to the network.
pub struct ImageLoader {
    fetch: FetchJob,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("cached", &self.fetch.cache.len())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader over an injected cache and fetcher.
    #[must_use]
    pub fn new(cache: Arc<dyn ImageCachePort>, fetcher: Arc<dyn ImageFetchPort>) -> Self {
        Self {
            fetch: FetchJob { cache, fetcher },
        }
    }

    /// Creates a loader that downloads over HTTP.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_http(
        config: &ImageLoaderConfig,
        cache: Arc<dyn ImageCachePort>,
    ) -> Result<Self, LoadError> {
        let fetcher = Arc::new(HttpImageFetcher::new(config)?);
        Ok(Self::new(cache, fetcher))
    }

    /// Returns the cache this loader reads and writes.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn ImageCachePort> {
        &self.fetch.cache
    }

    /// Loads an image, checking the cache first.
    ///
    /// # Errors
    /// Returns error if the URL is invalid, the download fails or the body
    /// does not decode.
    pub async fn load(&self, url_string: &str) -> Result<LoadedImage, LoadError> {
        match self.lookup(url_string)? {
            Lookup::Hit(loaded) => Ok(loaded),
            Lookup::Miss { key, url } => self.fetch.run(key, url).await,
        }
    }

    /// Starts loading an image.
    ///
    /// Invalid URLs and cache hits resolve immediately. Otherwise the download
    /// runs on a background task and its result is sent on `events`.
    pub fn start(
        &self,
        url_string: &str,
        events: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> LoadStart {
        let (key, url) = match self.lookup(url_string) {
            Ok(Lookup::Hit(loaded)) => return LoadStart::Ready(Ok(loaded)),
            Ok(Lookup::Miss { key, url }) => (key, url),
            Err(e) => return LoadStart::Ready(Err(e)),
        };

        let id = Uuid::new_v4();
        let cancelled = Arc::new(AtomicBool::new(false));

        let job = self.fetch.clone();
        let task_key = key.clone();
        let task_cancelled = cancelled.clone();
        let events = events.clone();
        let task = tokio::spawn(async move {
            let result = job.run(task_key.clone(), url).await;

            if task_cancelled.load(Ordering::Acquire) {
                debug!(key = %task_key, id = %id, "Dropping result of cancelled load");
                return;
            }

            let event = ImageLoadedEvent {
                handle_id: id,
                key: task_key,
                result,
            };
            if events.send(event).is_err() {
                debug!(id = %id, "Image event receiver dropped");
            }
        });

        LoadStart::Pending(LoadHandle {
            id,
            key,
            cancelled,
            task,
        })
    }

    /// Cancels a started load. See [`LoadHandle`] for delivery guarantees.
    pub fn cancel(&self, handle: &LoadHandle) {
        handle.cancel();
    }

    fn lookup(&self, url_string: &str) -> Result<Lookup, LoadError> {
        let url = match parse_image_url(url_string) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Image load failed");
                return Err(e);
            }
        };

        let key = CacheKey::from(url_string);
        if let Some(image) = self.fetch.cache.get(&key) {
            info!(key = %key, "Loaded image from cache");
            return Ok(Lookup::Hit(LoadedImage {
                key,
                image,
                source: ImageSource::MemoryCache,
            }));
        }

        Ok(Lookup::Miss { key, url })
    }
}

/// Parses a URL string that can be downloaded over HTTP(S).
///
/// # Errors
/// Returns [`LoadError::InvalidUrl`] if the string is not an absolute
/// `http` or `https` URL.
pub fn parse_image_url(input: &str) -> Result<Url, LoadError> {
    let url = Url::parse(input).map_err(|e| LoadError::invalid_url(input, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LoadError::invalid_url(
            input,
            format!("unsupported scheme {other:?}"),
        )),
    }
}

/// Shared pieces a background download needs.
#[derive(Clone)]
struct FetchJob {
    cache: Arc<dyn ImageCachePort>,
    fetcher: Arc<dyn ImageFetchPort>,
}

impl FetchJob {
    async fn run(&self, key: CacheKey, url: Url) -> Result<LoadedImage, LoadError> {
        let result = self.download(key.clone(), &url).await;
        if let Err(e) = &result {
            warn!(key = %key, kind = e.kind(), error = %e, "Image load failed");
        }
        result
    }

    async fn download(&self, key: CacheKey, url: &Url) -> Result<LoadedImage, LoadError> {
        let bytes = self.fetcher.fetch(url).await?;
        let image = Arc::new(decode_image(bytes).await?);

        self.cache.put(key.clone(), image.clone());
        debug!(key = %key, source = "network", "Image loaded successfully");

        Ok(LoadedImage {
            key,
            image,
            source: ImageSource::Network,
        })
    }
}
