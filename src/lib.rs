//! spotllm-core
//!
//! Multi-provider LLM client core for a spotlight-style assistant:
//! - One client contract over three vendor wire protocols (OpenAI
//!   chat-completions, Anthropic messages, Gemini chat-with-history), with a
//!   uniform incremental-streaming model
//! - Shortcut/template expansion with clipboard, date, and time placeholders
//! - Structured-field extraction from free-form markdown replies
//!
//! Window chrome, hotkey registration, tray, and rendering are external
//! collaborators; they reach the core through a [`domain::SettingsStore`] and
//! the [`infrastructure::ResponseEvent`] output channel.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    extract_json, ContentPart, Conversation, DomainError, LlmClient, Message, MessageRole,
    SettingsStore, Template, TemplateEngine, TemplateExpansion, TextStream,
};
pub use infrastructure::{
    llm::{LlmClientFactory, ModelMappings},
    InMemorySettingsStore, ResponseEvent, SpotlightService, SystemClipboard,
};
