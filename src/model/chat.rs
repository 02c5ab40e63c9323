//! Chat transcript model.

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The person using the app
    User,
    /// The assistant
    Assistant,
}

/// A single line in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message text
    pub text: String,
    /// Author of the message
    pub sender: Sender,
}

impl ChatMessage {
    /// Create a message written by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    /// Create a message written by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }
}

/// Ordered, append-only log of chat messages for the session.
///
/// Messages can only be appended from inside the crate; nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        log::trace!("Transcript +{:?}: {}", message.sender, message.text);
        self.messages.push(message);
    }

    /// All messages in the order they were appended.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
