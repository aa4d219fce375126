use thiserror::Error;

use crate::refresh::StoreError;
use trendscope_genai::GenAiError;

/// Errors surfaced by the brief pipeline.
///
/// Everything recoverable is absorbed into a best-effort brief;
/// `NotInitialized` is the only condition a dashboard caller should see
/// as a hard error.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Generation or query requested with an empty canonical content
    /// set — there is nothing to analyze.
    #[error("no influencer content loaded — nothing to analyze")]
    NotInitialized,

    /// Propagated from `query` only; brief generation absorbs these.
    #[error(transparent)]
    Generation(#[from] GenAiError),

    /// The refresh-state store failed to load or persist the timestamp.
    #[error("refresh state store error: {0}")]
    Store(#[from] StoreError),
}
