//! Lazily read response body
//!
//! Report documents can be large, so a successful fetch hands back the open
//! response rather than buffering it. The caller decides whether to pull
//! chunks, stream, buffer, or copy into a writer.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Body of a successful report response, not yet read
#[derive(Debug)]
pub struct ReportBody {
    response: reqwest::Response,
}

impl ReportBody {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self { response }
    }

    /// Final URL of the response
    pub fn url(&self) -> &Url {
        self.response.url()
    }

    /// Size announced by the server, if any
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Response header value, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    /// Next chunk of the body, `None` once drained
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.response.chunk().await.map_err(Error::Http)
    }

    /// Convert into a stream of chunks
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes>> + Send {
        self.response.bytes_stream().map_err(Error::Http)
    }

    /// Read the rest of the body into memory
    pub async fn bytes(self) -> Result<Bytes> {
        self.response.bytes().await.map_err(Error::Http)
    }

    /// Drain the body into `writer`, returning the number of bytes written.
    ///
    /// Each read races `cancel`; a fired token yields [`Error::Cancelled`]
    /// and leaves whatever was already written in `writer`.
    pub async fn copy_to<W>(&mut self, writer: &mut W, cancel: &CancellationToken) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0u64;
        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                chunk = self.chunk() => chunk?,
            };
            let Some(chunk) = chunk else { break };
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }
}
