use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use super::sse;
use crate::domain::{Conversation, DomainError, LlmClient, Message, MessageRole, TextStream};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Hard default when the model identifier has no mapping entry.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// GPT-style client: the whole conversation goes out as one flat message
/// array with vendor-native roles. Text only; non-text parts are dropped.
#[derive(Debug)]
pub struct OpenAiClient<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiClient<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: model.into(),
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, conversation: &Conversation, stream: bool) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> = conversation
            .messages()
            .iter()
            .map(OpenAiMessage::from_domain)
            .collect();

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmClient for OpenAiClient<C> {
    async fn get_response(&self, conversation: &Conversation) -> Result<String, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(conversation, false);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    async fn stream_response(
        &self,
        conversation: &Conversation,
    ) -> Result<TextStream, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(conversation, true);
        let byte_stream = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        let stream = sse::data_lines(byte_stream).filter_map(|result| async move {
            match result {
                Ok(data) => parse_sse_data(&data),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// One SSE data payload to at most one stream item. `[DONE]` and delta-free
/// events map to `None`; an error payload surfaces as `Err`.
fn parse_sse_data(data: &str) -> Option<Result<String, DomainError>> {
    if data.trim() == "[DONE]" {
        return None;
    }

    if let Ok(chunk) = serde_json::from_str::<OpenAiStreamChunk>(data) {
        let fragment = chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .unwrap_or_default();
        return if fragment.is_empty() {
            None
        } else {
            Some(Ok(fragment))
        };
    }

    if let Ok(failure) = serde_json::from_str::<OpenAiStreamError>(data) {
        return Some(Err(DomainError::provider("openai", failure.error.message)));
    }

    None
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        Self {
            role,
            content: message.text(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
}

#[derive(Debug, Deserialize)]
struct OpenAiDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}
