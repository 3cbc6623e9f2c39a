use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use super::sse;
use crate::domain::{
    ContentPart, Conversation, DomainError, LlmClient, Message, MessageRole, TextStream,
};

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Hard default when the model identifier has no mapping entry.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

/// Claude-style client: flat message array with content blocks and an
/// explicit max-token cap. Image parts become base64 sources; any
/// `data:<mime>;base64,` prefix is stripped on the way out.
#[derive(Debug)]
pub struct AnthropicClient<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> AnthropicClient<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
            model: model.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, conversation: &Conversation, stream: bool) -> serde_json::Value {
        let messages: Vec<AnthropicMessage> = conversation
            .messages()
            .iter()
            .map(AnthropicMessage::from_domain)
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": MAX_TOKENS,
        });

        if stream {
            body["stream"] = serde_json::json!(true);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: AnthropicResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("anthropic", format!("Failed to parse response: {}", e))
        })?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(content)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmClient for AnthropicClient<C> {
    async fn get_response(&self, conversation: &Conversation) -> Result<String, DomainError> {
        let url = self.messages_url();
        let body = self.build_request(conversation, false);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    async fn stream_response(
        &self,
        conversation: &Conversation,
    ) -> Result<TextStream, DomainError> {
        let url = self.messages_url();
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
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// One SSE data payload to at most one stream item. Only
/// `content_block_delta` text deltas carry displayable text; an `error`
/// event surfaces as `Err`.
fn parse_sse_data(data: &str) -> Option<Result<String, DomainError>> {
    let event = serde_json::from_str::<AnthropicStreamEvent>(data).ok()?;

    if event.event_type == "error" {
        let message = event
            .error
            .map(|failure| failure.message)
            .unwrap_or_else(|| "stream error".to_string());
        return Some(Err(DomainError::provider("anthropic", message)));
    }

    if event.event_type != "content_block_delta" {
        return None;
    }

    let delta = event.delta?;
    if delta.delta_type != "text_delta" {
        return None;
    }
    let text = delta.text?;
    if text.is_empty() { None } else { Some(Ok(text)) }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    Image {
        source: AnthropicImageSource,
    },
}

#[derive(Debug, Serialize)]
struct AnthropicImageSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: String,
    data: String,
}

impl AnthropicMessage {
    /// Unsupported parts are dropped silently; a message whose every part is
    /// dropped still goes out with empty content.
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        let content = message
            .content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(AnthropicContentBlock::Text {
                    text: text.clone(),
                }),
                ContentPart::Image { .. } => {
                    part.image_payload()
                        .map(|(media, data)| AnthropicContentBlock::Image {
                            source: AnthropicImageSource {
                                source_type: "base64",
                                media_type: media.to_string(),
                                data: data.to_string(),
                            },
                        })
                }
                ContentPart::Unsupported => None,
            })
            .collect();

        Self { role, content }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicStreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    delta: Option<StreamDelta>,
    error: Option<StreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(rename = "type", default)]
    delta_type: String,
    text: Option<String>,
}
