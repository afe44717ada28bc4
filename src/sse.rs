//! Server-Sent Events (SSE) frame decoding.
//!
//! The chat endpoint replies with newline-delimited frames:
//!
//! ```text
//! data: {"text": "Hel"}
//!
//! data: {"text": "lo"}
//!
//! data: [DONE]
//! ```
//!
//! Frame boundaries are not aligned with network reads, so the decoder keeps
//! a byte buffer and carries any trailing incomplete line into the next
//! chunk. Decoding stops at the `[DONE]` terminator; the underlying byte
//! stream is dropped with it, so bytes arriving after the terminator are
//! never read.

use bytes::BytesMut;
use futures::stream::{self, Stream, StreamExt};

use crate::client::ChatError;

/// Sentinel payload signaling the end of the bot's answer.
const DONE_MARKER: &str = "[DONE]";

/// Decode a raw byte stream into the `data: ` payload of each frame.
///
/// Yields one `String` per frame, terminator excluded. Lines without the
/// `data: ` prefix and blank separator lines are skipped. A final
/// unterminated line left in the buffer at end-of-stream is still decoded.
///
/// The input is generic so tests can feed scripted chunks; production code
/// passes the gateway's [`ByteStream`].
pub fn decode_sse<S>(byte_stream: S) -> impl Stream<Item = Result<String, ChatError>> + Send
where
    S: Stream<Item = Result<bytes::Bytes, ChatError>> + Send + 'static,
{
    stream::unfold(
        (Box::pin(byte_stream), BytesMut::new(), false),
        |(mut byte_stream, mut buffer, mut stream_ended)| async move {
            loop {
                if !stream_ended {
                    match byte_stream.next().await {
                        Some(Ok(chunk)) => {
                            buffer.extend_from_slice(&chunk);
                        }
                        Some(Err(e)) => {
                            return Some((Err(e), (byte_stream, buffer, stream_ended)));
                        }
                        None => {
                            // Byte stream ended - flush whatever the buffer still holds
                            stream_ended = true;
                        }
                    }
                }

                // Process complete lines from the buffer
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let raw = buffer.split_to(pos + 1);
                    let line = String::from_utf8_lossy(&raw[..pos]).trim().to_string();

                    if line.is_empty() {
                        continue;
                    }

                    if let Some(data) = parse_sse_line(&line) {
                        if is_done_marker(data) {
                            return None;
                        }

                        return Some((Ok(data.to_string()), (byte_stream, buffer, stream_ended)));
                    }
                }

                // Stream is done and no newline will ever come: decode the tail line
                if stream_ended {
                    if !buffer.is_empty() {
                        let line = String::from_utf8_lossy(&buffer).trim().to_string();
                        buffer.clear();
                        if let Some(data) = parse_sse_line(&line) {
                            if !is_done_marker(data) {
                                return Some((
                                    Ok(data.to_string()),
                                    (byte_stream, buffer, stream_ended),
                                ));
                            }
                        }
                    }

                    return None;
                }

                // No complete lines yet, keep reading
            }
        },
    )
}

/// Extract the payload from an SSE line.
///
/// Lines are in the format `data: <content>`; anything else yields `None`.
///
/// # Example
/// ```
/// use chatstream::sse::parse_sse_line;
///
/// let line = "data: {\"text\": \"hi\"}";
/// assert_eq!(parse_sse_line(line), Some("{\"text\": \"hi\"}"));
///
/// let line = "invalid";
/// assert_eq!(parse_sse_line(line), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix("data: ").map(|s| s.trim())
}

/// Check whether a payload is the `[DONE]` terminator.
///
/// # Example
/// ```
/// use chatstream::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker(""));
/// assert!(!is_done_marker("{\"text\": \"value\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == DONE_MARKER
}
