use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::canned::CannedClient;
use crate::error::GenAiError;
use crate::live::LiveClient;

/// What the caller is asking the model for.
///
/// The canned strategy uses this to pick the right fixed response: a
/// schema-valid demo brief, or a substring-keyed answer to the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Brief,
    Query { question: String },
}

/// One request to the generative-text endpoint.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub kind: RequestKind,
}

impl GenerationRequest {
    #[must_use]
    pub fn brief(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: RequestKind::Brief,
        }
    }

    #[must_use]
    pub fn query(prompt: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: RequestKind::Query {
                question: question.into(),
            },
        }
    }
}

/// The generation strategy seam.
///
/// Implementations return raw text. They never surface transport errors:
/// the live strategy degrades to the canned response on network failure,
/// so callers only ever see usable text, the tagged rate-limit notice,
/// or [`GenAiError::GenerationFailed`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenAiError>;
}

/// Configuration for client construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout_secs: u64,
}

/// Select the generation strategy from configuration.
///
/// A configured API key selects [`LiveClient`]; otherwise the offline
/// [`CannedClient`] is returned so every downstream stage works without
/// network access.
///
/// # Errors
///
/// Returns [`GenAiError::Http`] if the underlying HTTP client cannot be
/// constructed.
pub fn build_client(config: &ClientConfig) -> Result<Arc<dyn GenerationClient>, GenAiError> {
    match &config.api_key {
        Some(key) => {
            tracing::info!(model = %config.model, "using live generation client");
            Ok(Arc::new(LiveClient::new(
                key,
                &config.model,
                config.request_timeout_secs,
                &config.api_url,
            )?))
        }
        None => {
            tracing::info!("no generation credential configured — using canned client");
            Ok(Arc::new(CannedClient::new(Duration::from_millis(800))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> ClientConfig {
        ClientConfig {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: api_key.map(str::to_string),
            model: "gpt-4o-mini".to_string(),
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn build_client_without_key_is_canned() {
        let client = build_client(&config(None));
        assert!(client.is_ok());
    }

    #[test]
    fn build_client_with_key_is_live() {
        let client = build_client(&config(Some("sk-test")));
        assert!(client.is_ok());
    }

    #[test]
    fn request_constructors_carry_kind() {
        let brief = GenerationRequest::brief("p");
        assert_eq!(brief.kind, RequestKind::Brief);
        let query = GenerationRequest::query("p", "what is trending?");
        assert!(matches!(query.kind, RequestKind::Query { ref question } if question == "what is trending?"));
    }
}
