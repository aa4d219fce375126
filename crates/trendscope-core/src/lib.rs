//! Shared data model and configuration for trendscope.
//!
//! Defines the canonical content shapes produced by normalization, the
//! `TrendBrief` output artifact, the brand-keyword registry used by
//! fallback synthesis, and the env-driven application configuration.

pub mod brands;
pub mod brief;
pub mod config;
pub mod content;

pub use brands::{default_brands, load_brands, BrandKeyword, BrandsFile};
pub use brief::{
    BrandCollaboration, CollaborationKind, ContentAnalysisResult, PlatformInsight, Sentiment,
    SentimentBreakdown, TrendBrief,
};
pub use config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError};
pub use content::{ContentItem, Engagement, InfluencerContentSet, Platform};
