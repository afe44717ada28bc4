//! Core gateway trait and error types.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

/// Errors that can occur while submitting a message or consuming its reply.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Raw bytes of a streaming reply, as handed back by a [`Gateway`].
///
/// Chunk boundaries carry no meaning: a frame may span two chunks and a
/// chunk may hold several frames. The `sse` module reassembles lines.
pub type ByteStream = BoxStream<'static, Result<Bytes, ChatError>>;

/// The seam between the chat client and the answering endpoint.
///
/// The production implementation is [`HttpGateway`](crate::transport::HttpGateway);
/// tests substitute scripted gateways.
///
/// # Example
/// ```rust,ignore
/// struct CannedGateway;
///
/// #[async_trait]
/// impl Gateway for CannedGateway {
///     async fn ask(&self, _msg: &str) -> Result<ByteStream, ChatError> {
///         let chunks = vec![Ok(Bytes::from("data: {\"text\":\"hi\"}\n"))];
///         Ok(futures::stream::iter(chunks).boxed())
///     }
/// }
/// ```
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send one user message and obtain the byte stream of the reply.
    ///
    /// # Arguments
    /// - `msg`: trimmed, non-empty user text
    ///
    /// # Errors
    /// Any failure to reach the endpoint or to open the reply stream. The
    /// caller surfaces it as a single visible error message; no retry is
    /// attempted.
    async fn ask(&self, msg: &str) -> Result<ByteStream, ChatError>;
}
