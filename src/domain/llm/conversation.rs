use serde::{Deserialize, Serialize};

use super::{ContentPart, Message};

/// An ordered sequence of messages. The last message is the live turn to
/// answer; everything before it is history.
///
/// An empty conversation is a defined empty-history, empty-prompt input, not
/// an error; providers send it through as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Single user turn holding one text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(vec![Message::user(text)])
    }

    /// Single user turn with explicit parts.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(vec![Message::user_with_parts(parts)])
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Split into the live turn and the preceding history, preserving order.
    pub fn split_last(&self) -> (Option<&Message>, &[Message]) {
        match self.messages.split_last() {
            Some((last, history)) => (Some(last), history),
            None => (None, &[]),
        }
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}
