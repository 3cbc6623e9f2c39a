//! LLM client implementations

mod anthropic;
mod factory;
mod gemini;
mod http_client;
mod model_mapping;
mod openai;
mod sse;

pub use anthropic::{AnthropicClient, DEFAULT_ANTHROPIC_MODEL};
pub use factory::LlmClientFactory;
pub use gemini::{DEFAULT_GEMINI_MODEL, GeminiClient};
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use model_mapping::{ModelMappings, PRIVATE_MARKER};
pub use openai::{DEFAULT_OPENAI_MODEL, OpenAiClient};
