//! Output-channel orchestration: raw input in, ordered response events out.
//!
//! Per request the channel sees zero or more `Fragment` events followed by
//! exactly one `Done` or `Error`. Fragments already delivered before a
//! failure stay with the consumer; there is no rollback.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::domain::settings::SettingsStore;
use crate::domain::template::ClipboardReader;
use crate::domain::{extract_json, Conversation, LlmClient, TemplateEngine};
use crate::infrastructure::llm::LlmClientFactory;

/// Ordered events pushed to the UI per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// One incremental piece of the reply, in vendor-delivered order.
    Fragment(String),
    /// Terminal success. `extracted` is set when a template flagged a
    /// response key and the accumulated reply contained it; the caller shows
    /// it in place of `text`.
    Done {
        text: String,
        extracted: Option<String>,
    },
    /// Terminal failure. Whatever fragments were already sent stay visible.
    Error(String),
}

/// Channel pair for one request: the send half goes to
/// [`SpotlightService::handle_input`], the receive half is consumed by the
/// UI as a stream of events.
pub fn response_channel() -> (
    UnboundedSender<ResponseEvent>,
    UnboundedReceiverStream<ResponseEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}

/// Drives one user turn: template expansion, client resolution, streaming,
/// and response-key extraction.
#[derive(Debug)]
pub struct SpotlightService<S: SettingsStore, C: ClipboardReader> {
    settings: Arc<S>,
    engine: TemplateEngine<C>,
}

impl<S: SettingsStore, C: ClipboardReader> SpotlightService<S, C> {
    pub fn new(settings: Arc<S>, clipboard: C) -> Self {
        Self {
            settings,
            engine: TemplateEngine::new(clipboard),
        }
    }

    /// Handle raw spotlight input, resolving the client from settings.
    ///
    /// One turn in flight per UI surface is the caller's invariant; this
    /// method runs a single call to completion or failure.
    pub async fn handle_input(&self, input: &str, tx: &UnboundedSender<ResponseEvent>) {
        let client = match LlmClientFactory::create(
            &self.settings.api_key(),
            &self.settings.model(),
            self.settings.host_url().as_deref(),
        ) {
            Ok(client) => client,
            Err(e) => {
                let _ = tx.send(ResponseEvent::Error(e.to_string()));
                return;
            }
        };

        self.run_with_client(client, input, tx).await;
    }

    /// Same pipeline with an injected client (tests plug a mock in here).
    pub async fn run_with_client(
        &self,
        client: Arc<dyn LlmClient>,
        input: &str,
        tx: &UnboundedSender<ResponseEvent>,
    ) {
        let templates = self.settings.templates();
        let expansion = self.engine.apply(input, &templates);

        tracing::debug!(
            provider = client.provider_name(),
            model = client.model(),
            template_applied = expansion.applied,
            "Dispatching spotlight input"
        );

        let conversation = Conversation::user_text(&expansion.text);

        let mut stream = match client.stream_response(&conversation).await {
            Ok(stream) => stream,
            Err(e) => {
                let _ = tx.send(ResponseEvent::Error(e.to_string()));
                return;
            }
        };

        let mut full_response = String::new();

        while let Some(result) = stream.next().await {
            match result {
                Ok(fragment) => {
                    full_response.push_str(&fragment);
                    if tx.send(ResponseEvent::Fragment(fragment)).is_err() {
                        // Consumer abandoned the channel; dropping the stream
                        // releases the vendor resource.
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.send(ResponseEvent::Error(e.to_string()));
                    return;
                }
            }
        }

        let extracted = expansion
            .response_key
            .as_deref()
            .and_then(|key| extract_response_field(&full_response, key));

        let _ = tx.send(ResponseEvent::Done {
            text: full_response,
            extracted,
        });
    }
}

/// Pull `key` out of the JSON object embedded in `reply`, rendered as
/// display text. A miss is a no-op, never an error.
fn extract_response_field(reply: &str, key: &str) -> Option<String> {
    let json = extract_json(reply)?;
    match json.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
