//! Byte sources for word lists.
//!
//! A [`ByteSource`] resolves a locator into a stream of raw byte chunks. The
//! ingestion pipeline only ever sees the stream, so it does not care whether
//! the bytes come from HTTP, a local file, or memory.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::config::SourceConfig;
use crate::error::transport::TransportError;

mod file;
mod http;
mod memory;

pub use file::FileSource;
pub use http::HttpSource;
pub use memory::{ChunkFeed, MemorySource};

/// Stream of raw chunks produced by an opened source.
pub type ChunkStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Resolves locators into chunk streams.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Opens `locator` and returns its body as a chunk stream.
    ///
    /// A non-success status or a missing resource is an error here, before
    /// any chunk is produced.
    async fn open(&self, locator: &str) -> Result<ChunkStream, TransportError>;
}

/// Routes `http://` and `https://` locators to HTTP and everything else to
/// the local file system.
#[derive(Debug, Clone)]
pub struct RoutingSource {
    http: HttpSource,
    file: FileSource,
}

impl RoutingSource {
    /// Builds both backends from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, TransportError> {
        Ok(Self {
            http: HttpSource::new(config)?,
            file: FileSource::new(config.chunk_size),
        })
    }
}

#[async_trait]
impl ByteSource for RoutingSource {
    async fn open(&self, locator: &str) -> Result<ChunkStream, TransportError> {
        match scheme(locator) {
            Some("http" | "https") => self.http.open(locator).await,
            None | Some("file") => self.file.open(locator).await,
            Some(_) => Err(TransportError::UnsupportedLocator(locator.to_string())),
        }
    }
}

/// Returns the scheme of a URL-like locator, if it has one.
fn scheme(locator: &str) -> Option<&str> {
    let (scheme, _) = locator.split_once("://")?;
    let valid = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{StreamExt, TryStreamExt};

    #[test]
    fn test_scheme_detection() {
        assert_eq!(scheme("https://example.com/words.txt"), Some("https"));
        assert_eq!(scheme("file:///tmp/words.txt"), Some("file"));
        assert_eq!(scheme("./wordlist.txt"), None);
        assert_eq!(scheme("C:\\words.txt"), None);
    }

    #[tokio::test]
    async fn test_routing_rejects_unknown_scheme() {
        let source = RoutingSource::new(&SourceConfig::default()).unwrap();
        let err = source.open("ftp://example.com/words.txt").await.err().unwrap();
        assert!(matches!(err, TransportError::UnsupportedLocator(_)));
    }

    #[tokio::test]
    async fn test_routing_reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "alpha\nbeta\n").unwrap();

        let source = RoutingSource::new(&SourceConfig::default()).unwrap();
        let locator = format!("file://{}", path.display());
        let chunks: Vec<Bytes> = source.open(&locator).await.unwrap().try_collect().await.unwrap();

        assert_eq!(chunks.concat(), b"alpha\nbeta\n");
    }

    #[tokio::test]
    async fn test_mock_source_contract() {
        let mut source = MockByteSource::new();
        source
            .expect_open()
            .withf(|locator: &str| locator == "mem://words")
            .times(1)
            .returning(|_| Ok(futures::stream::iter(vec![Ok(Bytes::from_static(b"x\n"))]).boxed()));

        let chunks: Vec<Bytes> = source.open("mem://words").await.unwrap().try_collect().await.unwrap();
        assert_eq!(chunks.len(), 1);
    }
}
