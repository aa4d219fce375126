//! Trend-brief generation pipeline.
//!
//! Raw platform records flow through normalization into canonical
//! content sets, are rendered into a structured prompt, sent to the
//! generation client, and the response — JSON, JSON buried in prose, or
//! a rate-limit notice — is parsed into a complete [`trendscope_core::TrendBrief`].
//! Deterministic fallback synthesis guarantees a renderable brief under
//! every failure condition; only an empty content set is a hard error.

pub mod alerts;
pub mod assemble;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod parse;
pub mod prompt;
pub mod refresh;
pub mod service;

pub use alerts::{scan_alerts, AlertThresholds};
pub use assemble::{assemble, BriefAnalysis};
pub use error::BriefError;
pub use normalize::normalize_batch;
pub use parse::{extract_json, parse_brief, Extraction};
pub use refresh::{
    AutoRefresh, MemoryStore, RefreshDecision, RefreshPolicy, StoreError, TimestampStore,
};
pub use service::{BriefOutcome, TrendBriefService};
