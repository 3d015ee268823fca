//! Port definition for downloading image bytes.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::domain::errors::LoadError;

/// Port for fetching raw image bytes from the network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the body at `url`.
    ///
    /// # Errors
    /// Returns [`LoadError::Network`] on transport failure, timeout or a
    /// non-success status.
    async fn fetch(&self, url: &Url) -> Result<Bytes, LoadError>;
}
