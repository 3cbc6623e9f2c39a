use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use super::sse;
use crate::domain::{
    ContentPart, Conversation, DomainError, LlmClient, Message, MessageRole, TextStream,
};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Hard default when the model identifier has no mapping entry.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Gemini-style client: the last turn is the live prompt, everything before
/// it goes out as history with `assistant` remapped to `model`. Image parts
/// ride only in the live turn; history entries keep text only.
#[derive(Debug)]
pub struct GeminiClient<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiClient<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_GEMINI_BASE_URL)
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

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }

    fn build_request(&self, conversation: &Conversation) -> serde_json::Value {
        let (live_parts, history) = convert_messages(conversation);

        let mut contents = history;
        contents.push(GeminiContent {
            role: "user",
            parts: live_parts,
        });

        serde_json::json!({ "contents": contents })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: GeminiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("gemini", format!("Failed to parse response: {}", e))
        })?;

        Ok(response.text())
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmClient for GeminiClient<C> {
    async fn get_response(&self, conversation: &Conversation) -> Result<String, DomainError> {
        let url = self.generate_url();
        let body = self.build_request(conversation);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    async fn stream_response(
        &self,
        conversation: &Conversation,
    ) -> Result<TextStream, DomainError> {
        let url = self.stream_url();
        let body = self.build_request(conversation);
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
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Split the conversation into live-turn parts and remapped history.
///
/// History entries carry text parts only; image and unsupported parts are
/// dropped from them. An empty conversation yields empty parts and empty
/// history, not an error.
fn convert_messages(conversation: &Conversation) -> (Vec<GeminiPart>, Vec<GeminiContent>) {
    let (last, previous) = conversation.split_last();

    let live_parts = last.map(live_turn_parts).unwrap_or_default();

    let history = previous
        .iter()
        .map(|message| GeminiContent {
            role: match message.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            },
            parts: message
                .content
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(GeminiPart::Text { text: text.clone() }),
                    _ => None,
                })
                .collect(),
        })
        .collect();

    (live_parts, history)
}

fn live_turn_parts(message: &Message) -> Vec<GeminiPart> {
    message
        .content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(GeminiPart::Text { text: text.clone() }),
            ContentPart::Image { .. } => {
                part.image_payload().map(|(media, data)| GeminiPart::Inline {
                    inline_data: GeminiInlineData {
                        mime_type: media.to_string(),
                        data: data.to_string(),
                    },
                })
            }
            ContentPart::Unsupported => None,
        })
        .collect()
}

/// One SSE data payload to at most one stream item. Error payloads are
/// checked first: they also deserialize as a candidate-free response, which
/// would otherwise read as an empty delta. They surface as `Err`.
fn parse_sse_data(data: &str) -> Option<Result<String, DomainError>> {
    if let Ok(failure) = serde_json::from_str::<GeminiStreamError>(data) {
        return Some(Err(DomainError::provider("gemini", failure.error.message)));
    }

    let chunk = serde_json::from_str::<GeminiResponse>(data).ok()?;
    let text = chunk.text();
    if text.is_empty() { None } else { Some(Ok(text)) }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiStreamError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}
