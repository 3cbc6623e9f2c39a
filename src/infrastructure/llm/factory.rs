use std::sync::Arc;

use super::anthropic::{AnthropicClient, DEFAULT_ANTHROPIC_MODEL};
use super::gemini::{DEFAULT_GEMINI_MODEL, GeminiClient};
use super::http_client::HttpClient;
use super::model_mapping::{ModelMappings, PRIVATE_MARKER};
use super::openai::{DEFAULT_OPENAI_MODEL, OpenAiClient};
use crate::domain::{DomainError, LlmClient};

/// Which of the three wire protocols a model identifier selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vendor {
    OpenAi,
    Gemini,
    Anthropic,
}

/// The polymorphism seam: picks a vendor client from a model identifier.
///
/// Selection is by case-insensitive substring: `gpt` → OpenAI, `gemini` →
/// Gemini, `claude` → Anthropic. A bare `private` identifier selects the
/// OpenAI wire protocol and requires a host URL; vendor-scoped private
/// deployments use an identifier carrying the vendor substring with a mapping
/// value of `"private"`, which redirects that vendor's client to the host URL.
#[derive(Debug)]
pub struct LlmClientFactory;

impl LlmClientFactory {
    /// Create a client using the process-wide model mapping cache.
    ///
    /// This triggers the one-time mapping load on first use.
    pub fn create(
        api_key: &str,
        model_id: &str,
        host_url: Option<&str>,
    ) -> Result<Arc<dyn LlmClient>, DomainError> {
        Self::create_with_mappings(api_key, model_id, host_url, ModelMappings::global())
    }

    /// Create a client against an explicit mapping table (tests inject here).
    pub fn create_with_mappings(
        api_key: &str,
        model_id: &str,
        host_url: Option<&str>,
        mappings: &ModelMappings,
    ) -> Result<Arc<dyn LlmClient>, DomainError> {
        let vendor = select_vendor(model_id)
            .ok_or_else(|| DomainError::unsupported_model(model_id))?;

        let mapped = mappings.resolve(model_id);
        let is_private =
            model_id.eq_ignore_ascii_case(PRIVATE_MARKER) || mappings.is_private(model_id);

        // Private deployments send the user-facing identifier; everything
        // else sends the mapped name or the vendor default.
        let model = if is_private {
            model_id.to_string()
        } else {
            mapped
                .unwrap_or(match vendor {
                    Vendor::OpenAi => DEFAULT_OPENAI_MODEL,
                    Vendor::Gemini => DEFAULT_GEMINI_MODEL,
                    Vendor::Anthropic => DEFAULT_ANTHROPIC_MODEL,
                })
                .to_string()
        };

        let base_url = match (is_private, host_url) {
            (true, Some(url)) if !url.is_empty() => Some(url.to_string()),
            (true, _) if model_id.eq_ignore_ascii_case(PRIVATE_MARKER) => {
                return Err(DomainError::configuration(
                    "Model 'private' requires a host URL",
                ));
            }
            _ => None,
        };

        tracing::debug!(
            model_id,
            model = %model,
            vendor = ?vendor,
            private = is_private,
            "Resolved LLM client"
        );

        let http_client = HttpClient::new();

        let client: Arc<dyn LlmClient> = match (vendor, base_url) {
            (Vendor::OpenAi, Some(url)) => {
                Arc::new(OpenAiClient::with_base_url(http_client, api_key, model, url))
            }
            (Vendor::OpenAi, None) => Arc::new(OpenAiClient::new(http_client, api_key, model)),
            (Vendor::Gemini, Some(url)) => {
                Arc::new(GeminiClient::with_base_url(http_client, api_key, model, url))
            }
            (Vendor::Gemini, None) => Arc::new(GeminiClient::new(http_client, api_key, model)),
            (Vendor::Anthropic, Some(url)) => Arc::new(AnthropicClient::with_base_url(
                http_client,
                api_key,
                model,
                url,
            )),
            (Vendor::Anthropic, None) => {
                Arc::new(AnthropicClient::new(http_client, api_key, model))
            }
        };

        Ok(client)
    }
}

fn select_vendor(model_id: &str) -> Option<Vendor> {
    let lower = model_id.to_lowercase();

    if lower.contains("gpt") {
        Some(Vendor::OpenAi)
    } else if lower.contains("gemini") {
        Some(Vendor::Gemini)
    } else if lower.contains("claude") {
        Some(Vendor::Anthropic)
    } else if lower == PRIVATE_MARKER {
        Some(Vendor::OpenAi)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings() -> ModelMappings {
        ModelMappings::from_json_str(
            r#"{
                "gpt-4": "gpt-4o",
                "gemini-1-5-pro": "gemini-1.5-pro",
                "claude-3-5-sonnet": "claude-3-5-sonnet-20241022",
                "private-claude": "private"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_gpt_model_selects_openai() {
        let client =
            LlmClientFactory::create_with_mappings("key", "gpt-4", None, &mappings()).unwrap();
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.model(), "gpt-4o");
    }

    #[test]
    fn test_gemini_model_selects_gemini() {
        let client =
            LlmClientFactory::create_with_mappings("key", "gemini-1-5-pro", None, &mappings())
                .unwrap();
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_claude_model_selects_anthropic() {
        let client =
            LlmClientFactory::create_with_mappings("key", "claude-3-5-sonnet", None, &mappings())
                .unwrap();
        assert_eq!(client.provider_name(), "anthropic");
        assert_eq!(client.model(), "claude-3-5-sonnet-20241022");
    }

    #[test]
    fn test_selection_is_case_insensitive() {
        let client =
            LlmClientFactory::create_with_mappings("key", "Claude-3-Opus", None, &mappings())
                .unwrap();
        assert_eq!(client.provider_name(), "anthropic");
    }

    #[test]
    fn test_unmapped_model_falls_back_to_vendor_default() {
        let client =
            LlmClientFactory::create_with_mappings("key", "gpt-4-turbo", None, &mappings())
                .unwrap();
        assert_eq!(client.model(), "gpt-4o");

        let client = LlmClientFactory::create_with_mappings(
            "key",
            "claude-3-5-sonnet",
            None,
            &ModelMappings::empty(),
        )
        .unwrap();
        assert_eq!(client.model(), "claude-3-5-sonnet-latest");
    }

    #[test]
    fn test_unsupported_model_carries_original_identifier() {
        let result =
            LlmClientFactory::create_with_mappings("key", "LLaMA-3-70b", None, &mappings());
        match result {
            Err(DomainError::UnsupportedModel { model }) => {
                assert_eq!(model, "LLaMA-3-70b");
            }
            other => panic!("expected UnsupportedModel, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_bare_private_requires_host_url() {
        let result = LlmClientFactory::create_with_mappings("key", "private", None, &mappings());
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_bare_private_with_host_url_selects_openai_wire() {
        let client = LlmClientFactory::create_with_mappings(
            "key",
            "private",
            Some("https://llm.internal"),
            &mappings(),
        )
        .unwrap();
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.model(), "private");
    }

    #[test]
    fn test_vendor_scoped_private_redirects_to_host_url() {
        let client = LlmClientFactory::create_with_mappings(
            "key",
            "private-claude",
            Some("https://claude.internal"),
            &mappings(),
        )
        .unwrap();
        assert_eq!(client.provider_name(), "anthropic");
        assert_eq!(client.model(), "private-claude");
    }

    #[test]
    fn test_vendor_scoped_private_without_host_uses_default_endpoint() {
        let client = LlmClientFactory::create_with_mappings(
            "key",
            "private-claude",
            None,
            &mappings(),
        )
        .unwrap();
        assert_eq!(client.provider_name(), "anthropic");
    }
}
