//! The transcript: the ordered list of messages in the conversation.

use crate::model::Message;

/// Append-only list of conversation messages.
///
/// Messages are never removed once appended, with one exception: the welcome
/// placeholder a transcript can be seeded with, which goes away on the first
/// real submission.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    welcome: Option<usize>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a welcome placeholder message.
    pub fn with_welcome(text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::bot(text)],
            welcome: Some(0),
        }
    }

    /// Append a message, returning its index.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Append text to the message at `index` in place.
    pub fn append_to(&mut self, index: usize, delta: &str) {
        if let Some(message) = self.messages.get_mut(index) {
            message.text.push_str(delta);
        }
    }

    /// Text of the message at `index`, or `""` if out of range.
    pub fn text_of(&self, index: usize) -> &str {
        self.messages
            .get(index)
            .map(|m| m.text.as_str())
            .unwrap_or("")
    }

    /// Remove the welcome placeholder if still present. Returns whether a
    /// removal happened.
    pub fn remove_welcome(&mut self) -> bool {
        match self.welcome.take() {
            Some(index) => {
                self.messages.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_welcome(&self) -> bool {
        self.welcome.is_some()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
