//! Presentation seam.
//!
//! The chat client owns conversation state and streaming; everything visible
//! (message layout, the typing indicator, scrolling, input handling) belongs
//! to a [`Render`] implementation supplied by the embedding application.
//! All methods have no-op defaults, so a renderer only implements what its
//! surface can show.

use crate::model::Message;

/// Callbacks the chat client invokes as the conversation advances.
pub trait Render {
    /// A message was appended to the transcript (user, bot, or error notice).
    fn message_added(&mut self, _message: &Message) {}

    /// The active bot message grew by `delta`; `full` is its accumulated text.
    fn message_appended(&mut self, _delta: &str, _full: &str) {}

    /// The transient typing indicator should become visible.
    fn typing_shown(&mut self) {}

    /// The transient typing indicator should disappear.
    fn typing_hidden(&mut self) {}

    /// The welcome placeholder was removed (first submission only).
    fn welcome_removed(&mut self) {}

    /// The input field should be cleared after a successful submission.
    fn input_cleared(&mut self) {}

    /// The transcript should scroll so the latest content is in view.
    fn scroll_to_latest(&mut self) {}
}

/// Renderer that ignores every callback. Useful for headless use and tests
/// that only inspect the transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRender;

impl Render for NullRender {}
