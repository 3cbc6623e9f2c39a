//! LLM client domain models and traits

mod client;
mod conversation;
mod message;

pub use client::{LlmClient, TextStream};
pub use conversation::Conversation;
pub use message::{
    data_url_media_type, strip_base64_data_url, ContentPart, Message, MessageRole,
};

#[cfg(test)]
pub use client::mock::MockLlmClient;
