//! The chat client: submission handling and incremental reply streaming.

use futures::StreamExt;
use tracing::{debug, warn};

use crate::client::{ByteStream, ChatError, Gateway};
use crate::model::{Message, TokenFrame};
use crate::render::Render;
use crate::sse::decode_sse;
use crate::transcript::Transcript;

/// Where the client stands in the current submission.
///
/// `Complete` and `Errored` are both terminal for a submission; the next
/// [`ChatStreamClient::submit`] re-enters `AwaitingResponse` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No submission yet. Declined empty-input submissions leave the phase
    /// untouched.
    Idle,
    /// Request sent, typing indicator visible, reply not yet open.
    AwaitingResponse,
    /// Reply open, bot message accumulating text.
    Streaming,
    /// Reply finished normally.
    Complete,
    /// Request or stream read failed; an error notice was rendered.
    Errored,
}

/// Client that captures submissions and streams replies into the transcript.
///
/// One submission at a time: `submit` takes `&mut self` and runs the whole
/// reply stream to completion before returning, so a second submission
/// cannot interleave with the first one's appends.
///
/// # Example
/// ```rust,no_run
/// use chatstream::chat::ChatStreamClient;
/// use chatstream::options::TransportOptions;
/// use chatstream::render::NullRender;
/// use chatstream::transport::HttpGateway;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gateway = HttpGateway::new(TransportOptions::new("http://localhost:8000"))?;
///     let mut client = ChatStreamClient::with_welcome(
///         gateway,
///         NullRender,
///         "Hello! Ask me anything.",
///     );
///
///     client.submit("What is a transcript?").await;
///
///     for message in client.transcript().messages() {
///         println!("{:?}: {}", message.role, message.text);
///     }
///     Ok(())
/// }
/// ```
pub struct ChatStreamClient<G, R> {
    gateway: G,
    render: R,
    transcript: Transcript,
    welcome_pending: bool,
    phase: Phase,
}

impl<G: Gateway, R: Render> ChatStreamClient<G, R> {
    /// Create a client with an empty transcript.
    pub fn new(gateway: G, render: R) -> Self {
        Self {
            gateway,
            render,
            transcript: Transcript::new(),
            welcome_pending: false,
            phase: Phase::Idle,
        }
    }

    /// Create a client whose transcript starts with a welcome placeholder.
    ///
    /// The placeholder stays visible until the first real submission, then
    /// is removed for good.
    pub fn with_welcome(gateway: G, render: R, welcome: impl Into<String>) -> Self {
        Self {
            gateway,
            render,
            transcript: Transcript::with_welcome(welcome),
            welcome_pending: true,
            phase: Phase::Idle,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    /// Submit one user message and stream the reply into the transcript.
    ///
    /// Empty or whitespace-only input is declined silently: no message is
    /// appended and no request goes out. All other failures are terminal for
    /// this submission and surface as a single `⚠️`-prefixed bot message;
    /// there is no retry.
    pub async fn submit(&mut self, input: &str) {
        let msg = input.trim();
        if msg.is_empty() {
            return;
        }

        if self.welcome_pending {
            if self.transcript.remove_welcome() {
                self.render.welcome_removed();
            }
            self.welcome_pending = false;
        }

        let user = Message::user(msg);
        self.render.message_added(&user);
        self.transcript.push(user);
        self.render.input_cleared();
        self.render.scroll_to_latest();

        self.phase = Phase::AwaitingResponse;
        self.render.typing_shown();
        debug!(len = msg.len(), "submitting message");

        match self.gateway.ask(msg).await {
            Ok(byte_stream) => {
                self.render.typing_hidden();
                self.consume_stream(byte_stream).await;
            }
            Err(err) => {
                warn!("request failed: {err}");
                self.render.typing_hidden();
                self.fail(&err);
            }
        }
    }

    /// Decode frames from the reply and grow the active bot message.
    async fn consume_stream(&mut self, byte_stream: ByteStream) {
        let bot = self.transcript.push(Message::bot(""));
        self.render.message_added(&self.transcript.messages()[bot]);
        self.phase = Phase::Streaming;

        let lines = decode_sse(byte_stream);
        futures::pin_mut!(lines);

        while let Some(next) = lines.next().await {
            match next {
                Ok(payload) => match serde_json::from_str::<TokenFrame>(&payload) {
                    Ok(frame) => {
                        self.transcript.append_to(bot, &frame.text);
                        self.render
                            .message_appended(&frame.text, self.transcript.text_of(bot));
                        self.render.scroll_to_latest();
                    }
                    Err(err) => {
                        // Malformed frame: skip the line, keep the accumulated text intact
                        debug!("skipping malformed frame: {err}");
                    }
                },
                Err(err) => {
                    warn!("stream read failed: {err}");
                    self.fail(&err);
                    return;
                }
            }
        }

        self.phase = Phase::Complete;
        debug!(chars = self.transcript.text_of(bot).len(), "reply complete");
    }

    /// Render a transport failure as a bot message and mark the submission
    /// errored.
    fn fail(&mut self, err: &ChatError) {
        let notice = Message::bot(format!("⚠️ Error: {err}"));
        self.render.message_added(&notice);
        self.transcript.push(notice);
        self.render.scroll_to_latest();
        self.phase = Phase::Errored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::stream;

    /// Gateway replying with a fixed sequence of byte chunks.
    struct ScriptedGateway {
        chunks: Vec<&'static str>,
    }

    #[async_trait]
    impl Gateway for ScriptedGateway {
        async fn ask(&self, _msg: &str) -> Result<ByteStream, ChatError> {
            let chunks: Vec<Result<Bytes, ChatError>> = self
                .chunks
                .iter()
                .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
                .collect();
            Ok(stream::iter(chunks).boxed())
        }
    }

    /// Gateway that fails before any stream is obtained.
    struct FailingGateway;

    #[async_trait]
    impl Gateway for FailingGateway {
        async fn ask(&self, _msg: &str) -> Result<ByteStream, ChatError> {
            Err(ChatError::Gateway("connection refused".into()))
        }
    }

    /// Gateway whose reply stream breaks mid-read.
    struct BrokenStreamGateway;

    #[async_trait]
    impl Gateway for BrokenStreamGateway {
        async fn ask(&self, _msg: &str) -> Result<ByteStream, ChatError> {
            let chunks: Vec<Result<Bytes, ChatError>> = vec![
                Ok(Bytes::from_static(b"data: {\"text\":\"par\"}\n")),
                Err(ChatError::Gateway("connection reset".into())),
            ];
            Ok(stream::iter(chunks).boxed())
        }
    }

    /// Gateway that records whether it was ever asked anything.
    struct CountingGateway {
        asked: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl Gateway for CountingGateway {
        async fn ask(&self, _msg: &str) -> Result<ByteStream, ChatError> {
            self.asked
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(stream::iter(Vec::<Result<Bytes, ChatError>>::new()).boxed())
        }
    }

    /// Renderer that counts callbacks for assertions.
    #[derive(Default)]
    struct RecordingRender {
        added: Vec<Message>,
        deltas: Vec<String>,
        typing_shown: usize,
        typing_hidden: usize,
        welcome_removed: usize,
        input_cleared: usize,
    }

    impl Render for RecordingRender {
        fn message_added(&mut self, message: &Message) {
            self.added.push(message.clone());
        }

        fn message_appended(&mut self, delta: &str, _full: &str) {
            self.deltas.push(delta.to_string());
        }

        fn typing_shown(&mut self) {
            self.typing_shown += 1;
        }

        fn typing_hidden(&mut self) {
            self.typing_hidden += 1;
        }

        fn welcome_removed(&mut self) {
            self.welcome_removed += 1;
        }

        fn input_cleared(&mut self) {
            self.input_cleared += 1;
        }
    }

    fn last_bot_text<G: Gateway, R: Render>(client: &ChatStreamClient<G, R>) -> &str {
        client
            .transcript()
            .messages()
            .iter()
            .rev()
            .find(|m| m.role == Role::Bot)
            .map(|m| m.text.as_str())
            .unwrap_or("")
    }

    #[tokio::test]
    async fn streams_frames_into_one_bot_message() {
        let gateway = ScriptedGateway {
            chunks: vec![
                "data: {\"text\":\"A\"}\n",
                "data: {\"text\":\"B\"}\n",
                "data: [DONE]\n",
            ],
        };
        let mut client = ChatStreamClient::new(gateway, RecordingRender::default());

        client.submit("hello").await;

        assert_eq!(client.phase(), Phase::Complete);
        assert_eq!(client.transcript().len(), 2);
        assert_eq!(client.transcript().messages()[0].role, Role::User);
        assert_eq!(client.transcript().messages()[0].text, "hello");
        assert_eq!(last_bot_text(&client), "AB");
        assert_eq!(client.render().deltas, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn submit_trims_input_and_appends_exactly_one_user_message() {
        let gateway = ScriptedGateway {
            chunks: vec!["data: [DONE]\n"],
        };
        let mut client = ChatStreamClient::new(gateway, RecordingRender::default());

        client.submit("  hi there  ").await;

        let users: Vec<_> = client
            .transcript()
            .messages()
            .iter()
            .filter(|m| m.role == Role::User)
            .collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].text, "hi there");
        assert_eq!(client.render().input_cleared, 1);
    }

    #[tokio::test]
    async fn empty_input_is_a_silent_no_op() {
        let gateway = CountingGateway {
            asked: std::sync::atomic::AtomicUsize::new(0),
        };
        let mut client = ChatStreamClient::new(gateway, RecordingRender::default());

        client.submit("").await;
        client.submit("   \t\n").await;

        assert_eq!(client.phase(), Phase::Idle);
        assert!(client.transcript().is_empty());
        assert_eq!(client.render().typing_shown, 0);
        assert_eq!(
            client
                .gateway
                .asked
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn malformed_frame_is_skipped_without_corrupting_text() {
        let gateway = ScriptedGateway {
            chunks: vec![
                "data: not-json\n",
                "data: {\"text\":\"X\"}\n",
                "data: [DONE]\n",
            ],
        };
        let mut client = ChatStreamClient::new(gateway, RecordingRender::default());

        client.submit("q").await;

        assert_eq!(client.phase(), Phase::Complete);
        assert_eq!(last_bot_text(&client), "X");
    }

    #[tokio::test]
    async fn request_failure_renders_one_warning_message() {
        let mut client = ChatStreamClient::new(FailingGateway, RecordingRender::default());

        client.submit("hello").await;

        assert_eq!(client.phase(), Phase::Errored);
        let bots: Vec<_> = client
            .transcript()
            .messages()
            .iter()
            .filter(|m| m.role == Role::Bot)
            .collect();
        assert_eq!(bots.len(), 1);
        assert!(bots[0].text.starts_with("⚠️"));
        assert!(bots[0].text.contains("connection refused"));
        // Typing indicator was shown and then removed
        assert_eq!(client.render().typing_shown, 1);
        assert_eq!(client.render().typing_hidden, 1);
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_partial_text_and_adds_notice() {
        let mut client = ChatStreamClient::new(BrokenStreamGateway, RecordingRender::default());

        client.submit("hello").await;

        assert_eq!(client.phase(), Phase::Errored);
        let bots: Vec<_> = client
            .transcript()
            .messages()
            .iter()
            .filter(|m| m.role == Role::Bot)
            .collect();
        assert_eq!(bots.len(), 2);
        assert_eq!(bots[0].text, "par");
        assert!(bots[1].text.starts_with("⚠️"));
        assert!(bots[1].text.contains("connection reset"));
    }

    #[tokio::test]
    async fn welcome_placeholder_removed_on_first_submission_only() {
        let gateway = ScriptedGateway {
            chunks: vec!["data: [DONE]\n"],
        };
        let mut client =
            ChatStreamClient::with_welcome(gateway, RecordingRender::default(), "Welcome!");

        assert!(client.transcript().has_welcome());
        assert_eq!(client.transcript().len(), 1);

        client.submit("first").await;
        assert!(!client.transcript().has_welcome());
        assert_eq!(client.render().welcome_removed, 1);

        client.submit("second").await;
        assert!(!client.transcript().has_welcome());
        assert_eq!(client.render().welcome_removed, 1);
    }

    #[tokio::test]
    async fn typing_indicator_balanced_across_submissions() {
        let gateway = ScriptedGateway {
            chunks: vec!["data: {\"text\":\"ok\"}\n", "data: [DONE]\n"],
        };
        let mut client = ChatStreamClient::new(gateway, RecordingRender::default());

        client.submit("one").await;
        client.submit("two").await;

        assert_eq!(client.render().typing_shown, 2);
        assert_eq!(client.render().typing_hidden, 2);
    }

    #[tokio::test]
    async fn frame_split_across_network_chunks_is_reassembled() {
        let gateway = ScriptedGateway {
            chunks: vec!["data: {\"te", "xt\":\"AB\"}\n", "data: [DONE]\n"],
        };
        let mut client = ChatStreamClient::new(gateway, RecordingRender::default());

        client.submit("q").await;

        assert_eq!(client.phase(), Phase::Complete);
        assert_eq!(last_bot_text(&client), "AB");
    }
}
