//! The trend brief output artifact.
//!
//! Every vector and map field is always present — possibly empty, never
//! null — so downstream consumers render without null checks. The parse
//! side relies on `#[serde(default)]` to uphold that invariant for
//! partially-populated model output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audience sentiment bucket for a brand collaboration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// Collaboration classification, ordered roughly by commercial weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollaborationKind {
    Sponsorship,
    #[serde(rename = "Product Review")]
    ProductReview,
    #[serde(rename = "UGC Campaign")]
    UgcCampaign,
    #[default]
    #[serde(rename = "Product Mention")]
    ProductMention,
    #[serde(rename = "Content Opportunity")]
    ContentOpportunity,
}

/// One detected (or AI-reported) brand collaboration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandCollaboration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CollaborationKind,
    pub campaign: String,
    pub ai_insights: String,
    /// Percentage string, e.g. "4.2%".
    pub engagement: String,
    /// Magnitude string, e.g. "1.2M".
    pub reach: String,
    pub sentiment: Sentiment,
    pub platform: String,
    pub content_count: u64,
}

/// Sentiment percentages as reported by the model.
///
/// The prompt asks for a 100 sum but the values are passed through
/// unvalidated — consumers must not rely on the sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentBreakdown {
    /// True when no bucket carries a value — the parse-side signal that
    /// the field was absent and should be backfilled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive == 0.0 && self.neutral == 0.0 && self.negative == 0.0
    }
}

/// Cross-platform content analysis section of the brief.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentAnalysisResult {
    pub key_themes: Vec<String>,
    pub trending_topics: Vec<String>,
    pub content_types: BTreeMap<String, u64>,
    pub sentiment_analysis: SentimentBreakdown,
    pub engagement_insights: Vec<String>,
    pub competitor_analysis: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Per-platform insight section of the brief.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformInsight {
    pub summary: String,
    pub top_content_types: Vec<String>,
    pub trending_hashtags: Vec<String>,
    pub engagement_trends: String,
}

/// The structured analysis artifact summarizing influencer content over
/// a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBrief {
    pub summary: String,
    /// Human label for the analyzed window, e.g. "48 hours".
    pub period: String,
    pub key_findings: Vec<String>,
    /// Keyed by lowercase platform name ("youtube", "instagram", ...).
    pub platform_insights: BTreeMap<String, PlatformInsight>,
    pub content_analysis: ContentAnalysisResult,
    pub actionable_recommendations: Vec<String>,
    pub brand_collaborations: Vec<BrandCollaboration>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaboration_kind_uses_human_readable_wire_names() {
        assert_eq!(
            serde_json::to_string(&CollaborationKind::ProductReview).unwrap(),
            "\"Product Review\""
        );
        assert_eq!(
            serde_json::to_string(&CollaborationKind::UgcCampaign).unwrap(),
            "\"UGC Campaign\""
        );
        let parsed: CollaborationKind = serde_json::from_str("\"Content Opportunity\"").unwrap();
        assert_eq!(parsed, CollaborationKind::ContentOpportunity);
    }

    #[test]
    fn partial_collaboration_fills_defaults() {
        let parsed: BrandCollaboration =
            serde_json::from_str(r#"{"name": "Nike", "contentCount": 3}"#).unwrap();
        assert_eq!(parsed.name, "Nike");
        assert_eq!(parsed.content_count, 3);
        assert_eq!(parsed.kind, CollaborationKind::ProductMention);
        assert_eq!(parsed.sentiment, Sentiment::Neutral);
        assert!(parsed.campaign.is_empty());
    }

    #[test]
    fn content_analysis_defaults_are_all_present() {
        let parsed: ContentAnalysisResult = serde_json::from_str("{}").unwrap();
        assert!(parsed.key_themes.is_empty());
        assert!(parsed.content_types.is_empty());
        assert!(parsed.sentiment_analysis.is_empty());
    }

    #[test]
    fn trend_brief_serializes_camel_case() {
        let brief = TrendBrief {
            summary: "s".to_string(),
            period: "48 hours".to_string(),
            key_findings: vec![],
            platform_insights: BTreeMap::new(),
            content_analysis: ContentAnalysisResult::default(),
            actionable_recommendations: vec![],
            brand_collaborations: vec![],
            generated_at: Utc::now(),
        };
        let json = serde_json::to_value(&brief).unwrap();
        assert!(json.get("keyFindings").is_some());
        assert!(json.get("platformInsights").is_some());
        assert!(json.get("actionableRecommendations").is_some());
        assert!(json.get("brandCollaborations").is_some());
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn sentiment_breakdown_empty_detection() {
        assert!(SentimentBreakdown::default().is_empty());
        let populated = SentimentBreakdown {
            positive: 45.0,
            neutral: 35.0,
            negative: 20.0,
        };
        assert!(!populated.is_empty());
    }
}
