//! # chatstream - Streaming Chat Client Library
//!
//! A small, pragmatic Rust library for chat front ends that stream their
//! answers: it records submissions in a transcript and incrementally decodes
//! a Server-Sent-Events-style reply into the growing bot message, notifying
//! a pluggable renderer at every step.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - SSE frame decoding with partial-line buffering across network reads
//! - Trait-based gateway seam, easy to stub in tests
//! - Presentation fully delegated to a `Render` implementation
//! - Transport failures surface as in-transcript error messages, never panics
//!
//! ## Architecture
//!
//! Three layers, each behind its own seam:
//!
//! 1. **`Gateway`** turns a submission into a raw byte stream
//!    (`HttpGateway` posts form field `msg` to the `/get` route).
//! 2. **`ChatStreamClient`** owns the transcript and the per-submission
//!    state machine, and drives the SSE decoder over the reply.
//! 3. **`Render`** receives presentation callbacks (message added, delta
//!    appended, typing indicator, scroll) and is implemented by the
//!    embedding application.
//!
//! ## Example
//! ```no_run
//! use chatstream::chat::ChatStreamClient;
//! use chatstream::options::TransportOptions;
//! use chatstream::render::NullRender;
//! use chatstream::transport::HttpGateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = TransportOptions::new("http://localhost:8000");
//!     let gateway = HttpGateway::new(options)?;
//!
//!     let mut client = ChatStreamClient::with_welcome(
//!         gateway,
//!         NullRender,
//!         "Hello! Ask me anything.",
//!     );
//!
//!     client.submit("What can you do?").await;
//!
//!     for message in client.transcript().messages() {
//!         println!("{:?}: {}", message.role, message.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod client;
pub mod model;
pub mod options;
pub mod render;
pub mod sse;
pub mod transcript;
pub mod transport;

// Re-exports for convenience
pub use chat::{ChatStreamClient, Phase};
pub use client::{ByteStream, ChatError, Gateway};
pub use model::{Message, Role, TokenFrame};
pub use render::{NullRender, Render};
pub use transcript::Transcript;
