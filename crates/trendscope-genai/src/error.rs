use thiserror::Error;

/// Errors surfaced by the generation client.
///
/// Transport failures never reach callers under normal operation — the
/// live client converts them to the canned fallback. `GenerationFailed`
/// is the one status-driven error callers see.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-success, non-rate-limit status.
    #[error("generation endpoint returned {status}: {body}")]
    GenerationFailed { status: u16, body: String },

    /// A 2xx response whose body does not carry a completion.
    #[error("malformed completion envelope: {0}")]
    MalformedEnvelope(String),
}
