//! Domain layer - vendor-neutral types, traits, and pure logic

pub mod error;
pub mod extraction;
pub mod llm;
pub mod settings;
pub mod template;

pub use error::DomainError;
pub use extraction::extract_json;
pub use llm::{
    ContentPart, Conversation, LlmClient, Message, MessageRole, TextStream,
};
pub use settings::{SettingsStore, Template};
pub use template::{ClipboardReader, TemplateEngine, TemplateExpansion};
