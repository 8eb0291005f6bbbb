//! HTTP source backed by `reqwest`'s streaming body.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use tracing::debug;

use super::{ByteSource, ChunkStream};
use crate::config::SourceConfig;
use crate::error::transport::TransportError;

/// Fetches a word list over HTTP(S) and streams the response body.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Builds the HTTP client from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ByteSource for HttpSource {
    async fn open(&self, locator: &str) -> Result<ChunkStream, TransportError> {
        let response = self.client.get(locator).send().await?;
        let status = response.status();
        debug!(locator, status = status.as_u16(), "source responded");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                locator: locator.to_string(),
            });
        }

        Ok(response.bytes_stream().map_err(TransportError::from).boxed())
    }
}
