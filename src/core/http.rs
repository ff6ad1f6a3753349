use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use tracing::debug;

use crate::core::config::FetchConfig;
use crate::core::error::{FetchError, MetaResult};

/// Fetch boundary: turns a locator into the full payload.
///
/// Implementations must fail with [`FetchError::Status`] on non-success
/// responses. No retries happen at this layer.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for &F {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url).await
    }
}

pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(default_headers);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// [`Fetch`] over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> MetaResult<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryFetcher;
    use super::*;

    #[test]
    fn http_fetcher_builds_from_default_config() {
        assert!(HttpFetcher::new(&FetchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn borrowed_fetcher_delegates() {
        let fetcher = MemoryFetcher::default().with("mem://a", b"payload".to_vec());
        let by_ref = &fetcher;
        assert_eq!(by_ref.fetch("mem://a").await.unwrap(), b"payload");

        let err = by_ref.fetch("mem://missing").await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(fetcher.calls(), 2);
    }
}
