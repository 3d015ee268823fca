//! HTTP image fetcher with a cache-defeating request policy.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Request, Url, header};
use tracing::{debug, info};

use crate::domain::errors::LoadError;
use crate::domain::ports::ImageFetchPort;

use super::loader::ImageLoaderConfig;

const NO_CACHE: &str = "no-cache";

/// Downloads image bytes over HTTP.
///
/// Every request is sent with `Cache-Control: no-cache` and `Pragma: no-cache`
/// through a client that has no cookie store, no response cache and keeps no
/// idle connections, so each download behaves like a fresh ephemeral session.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpImageFetcher {
    /// Creates a fetcher from loader configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ImageLoaderConfig) -> Result<Self, LoadError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| LoadError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Builds the GET request for `url` without sending it.
    ///
    /// # Errors
    /// Returns error if the request cannot be built.
    pub fn build_request(&self, url: &Url) -> Result<Request, LoadError> {
        self.client
            .get(url.clone())
            .header(header::CACHE_CONTROL, NO_CACHE)
            .header(header::PRAGMA, NO_CACHE)
            .timeout(self.timeout)
            .build()
            .map_err(|e| LoadError::network(format!("failed to build request: {e}")))
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes, LoadError> {
        let request = self.build_request(url)?;

        info!(url = %url, "Downloading image");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| LoadError::network(format!("request failed: {e}")))?;

        let status = response.status();
        info!(url = %url, status = %status, "Image HTTP status");

        if !status.is_success() {
            return Err(LoadError::network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::network(format!("failed to read body: {e}")))?;

        debug!(url = %url, len = bytes.len(), "Image body received");

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::infrastructure::image::test_support::TestServer;

    fn fetcher() -> HttpImageFetcher {
        HttpImageFetcher::new(&ImageLoaderConfig::default()).expect("client")
    }

    #[test]
    fn test_request_policy() -> Result<(), Box<dyn std::error::Error>> {
        let url = Url::parse("https://example.com/cat.png")?;
        let request = fetcher().build_request(&url)?;

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url(), &url);
        assert_eq!(
            request.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-cache".as_slice())
        );
        assert_eq!(
            request.headers().get(header::PRAGMA).map(|v| v.as_bytes()),
            Some(b"no-cache".as_slice())
        );
        assert_eq!(request.timeout(), Some(&Duration::from_secs(30)));
        Ok(())
    }

    #[test]
    fn test_configured_timeout() -> Result<(), Box<dyn std::error::Error>> {
        let config = ImageLoaderConfig {
            timeout_secs: 5,
            ..ImageLoaderConfig::default()
        };
        let fetcher = HttpImageFetcher::new(&config)?;
        let request = fetcher.build_request(&Url::parse("http://localhost/a.png")?)?;

        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_success_sends_no_cache() -> Result<(), Box<dyn std::error::Error>> {
        let server = TestServer::start(StatusCode::OK, b"hello".to_vec()).await?;

        let bytes = fetcher().fetch(&server.url("/cat.png")).await?;

        assert_eq!(bytes.as_ref(), b"hello");
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, reqwest::Method::GET);
        assert_eq!(request.path, "/cat.png");
        assert_eq!(
            request.headers.get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-cache".as_slice())
        );
        assert!(!request.headers.contains_key(header::COOKIE));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_server_error() -> Result<(), Box<dyn std::error::Error>> {
        let server = TestServer::start(StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).await?;

        let result = fetcher().fetch(&server.url("/cat.png")).await;

        assert_eq!(
            result,
            Err(LoadError::network("HTTP 500: Internal Server Error"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() -> Result<(), Box<dyn std::error::Error>> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/cat.png"))?;
        let result = fetcher().fetch(&url).await;

        assert!(matches!(result, Err(LoadError::Network { .. })));
        Ok(())
    }
}
