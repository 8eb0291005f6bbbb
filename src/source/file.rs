//! Local file source.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::{ByteSource, ChunkStream};
use crate::error::transport::TransportError;

/// Reads a local file in fixed-size chunks.
///
/// Accepts plain paths and `file://` locators.
#[derive(Debug, Clone)]
pub struct FileSource {
    chunk_size: usize,
}

impl FileSource {
    /// Creates a file source that reads `chunk_size` bytes at a time.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn open(&self, locator: &str) -> Result<ChunkStream, TransportError> {
        let path = locator.strip_prefix("file://").unwrap_or(locator);
        let file = File::open(path).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => TransportError::NotFound(path.to_string()),
            _ => TransportError::Io(err),
        })?;

        let chunk_size = self.chunk_size;
        let chunks = futures::stream::try_unfold(file, move |file| read_chunk(file, chunk_size));
        Ok(chunks.boxed())
    }
}

async fn read_chunk(mut file: File, chunk_size: usize) -> Result<Option<(Bytes, File)>, TransportError> {
    let mut buf = vec![0u8; chunk_size];
    let read = file.read(&mut buf).await?;
    if read == 0 {
        return Ok(None);
    }
    buf.truncate(read);
    Ok(Some((Bytes::from(buf), file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_reads_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "abcdefghij").unwrap();

        let source = FileSource::new(4);
        let chunks: Vec<Bytes> = source
            .open(path.to_str().unwrap())
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert!(chunks.iter().all(|c| c.len() <= 4));
        assert_eq!(chunks.concat(), b"abcdefghij");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let err = FileSource::new(16).open(path.to_str().unwrap()).await.err().unwrap();
        assert!(matches!(err, TransportError::NotFound(_)));
    }
}
