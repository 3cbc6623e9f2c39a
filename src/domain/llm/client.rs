use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

use super::Conversation;
use crate::domain::DomainError;

/// Lazy sequence of incremental text fragments from a streaming call.
///
/// Finite and single-pass. Every non-empty fragment observed from the vendor
/// is yielded in delivery order; empty fragments are filtered. Dropping the
/// stream releases the underlying vendor resource, whether it was exhausted,
/// failed, or abandoned mid-iteration.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Uniform contract across the three vendor clients.
///
/// Failures abort the in-flight call and surface as a single error; there are
/// no internal retries and no partial success disguised as success.
#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    /// Single-shot call returning the complete reply text.
    async fn get_response(&self, conversation: &Conversation) -> Result<String, DomainError>;

    /// Streaming call returning a [`TextStream`] of fragments.
    async fn stream_response(&self, conversation: &Conversation)
        -> Result<TextStream, DomainError>;

    /// Vendor name, for logging and error attribution.
    fn provider_name(&self) -> &'static str;

    /// Resolved vendor model name this client sends on the wire.
    fn model(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use futures::stream;

    /// Scripted client for exercising the pipeline without a vendor.
    #[derive(Debug)]
    pub struct MockLlmClient {
        name: &'static str,
        fragments: Vec<String>,
        error: Option<String>,
    }

    impl MockLlmClient {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                fragments: Vec::new(),
                error: None,
            }
        }

        pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.fragments = fragments.into_iter().map(Into::into).collect();
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn get_response(
            &self,
            _conversation: &Conversation,
        ) -> Result<String, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }
            Ok(self.fragments.concat())
        }

        async fn stream_response(
            &self,
            _conversation: &Conversation,
        ) -> Result<TextStream, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }
            let items: Vec<Result<String, DomainError>> =
                self.fragments.iter().cloned().map(Ok).collect();
            Ok(Box::pin(stream::iter(items)))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockLlmClient;
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_stream_yields_fragments_in_order() {
        let client = MockLlmClient::new("mock").with_fragments(["Hello", " world", "!"]);
        let mut stream = client
            .stream_response(&Conversation::user_text("Hi"))
            .await
            .unwrap();

        let mut collected = String::new();
        while let Some(fragment) = stream.next().await {
            collected.push_str(&fragment.unwrap());
        }
        assert_eq!(collected, "Hello world!");
    }

    #[tokio::test]
    async fn test_mock_error_surfaces_once() {
        let client = MockLlmClient::new("mock").with_error("API Error");
        let result = client.get_response(&Conversation::default()).await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
