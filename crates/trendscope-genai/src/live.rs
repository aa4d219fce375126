//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Sends exactly one POST per [`generate`](GenerationClient::generate)
//! call — no automatic retries. Response classification:
//!
//! - transport failure → the canned response for the request kind
//!   (callers never see raw transport errors);
//! - HTTP 429 → the markdown rate-limit notice, tagged for the parser;
//! - any other non-success status → [`GenAiError::GenerationFailed`]
//!   with a body excerpt;
//! - 2xx → `choices[0].message.content` extracted from the envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::canned::{canned_answer, demo_brief_json, rate_limited_markdown};
use crate::client::{GenerationClient, GenerationRequest, RequestKind};
use crate::error::GenAiError;

const BODY_EXCERPT_CHARS: usize = 200;

/// Live generation strategy over an OpenAI-compatible REST endpoint.
pub struct LiveClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl LiveClient {
    /// Creates a client pointed at `base_url` (e.g.
    /// `https://api.openai.com/v1`, or a wiremock URI in tests).
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("trendscope/0.1 (influencer-analytics)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// The canned degradation for a request kind, used when the transport
/// itself fails.
fn transport_fallback(kind: &RequestKind) -> String {
    match kind {
        RequestKind::Brief => demo_brief_json(),
        RequestKind::Query { question } => canned_answer(question),
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        body.to_string()
    } else {
        body.chars().take(BODY_EXCERPT_CHARS).collect()
    }
}

#[async_trait]
impl GenerationClient for LiveClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenAiError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "stream": false,
        });

        let url = self.completions_url();
        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "generation transport failed — serving canned fallback");
                return Ok(transport_fallback(&request.kind));
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(url = %url, "generation endpoint rate limited");
            return Ok(rate_limited_markdown());
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(url = %url, status = status.as_u16(), "generation endpoint error");
            return Err(GenAiError::GenerationFailed {
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        let envelope: serde_json::Value = response.json().await?;
        let content = envelope["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                GenAiError::MalformedEnvelope(excerpt(&envelope.to_string()))
            })?;

        Ok(content.trim().to_string())
    }
}
