//! Generation client for trendscope.
//!
//! Owns the single external call to a generative-text endpoint. Two
//! strategies implement the same [`GenerationClient`] seam: [`LiveClient`]
//! talks to an OpenAI-compatible chat-completions endpoint, and
//! [`CannedClient`] serves fixed, schema-valid responses offline. The
//! strategy is selected once at construction — the pipeline never
//! branches on credential presence.

pub mod canned;
pub mod client;
pub mod error;
pub mod live;
pub mod ratelimit;

pub use canned::{
    canned_answer, demo_brief_json, rate_limited_markdown, CannedClient, RATE_LIMIT_MARKER,
};
pub use client::{build_client, ClientConfig, GenerationClient, GenerationRequest, RequestKind};
pub use error::GenAiError;
pub use live::LiveClient;
pub use ratelimit::RateLimiter;
