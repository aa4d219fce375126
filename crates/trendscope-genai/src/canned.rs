//! Canned responses for offline/demo operation and degraded paths.
//!
//! The demo brief is built with `serde_json::json!` and rendered to a
//! string, so it can never drift out of JSON validity. The rate-limit
//! notice is deliberately markdown, not JSON — the parser detects it by
//! the literal [`RATE_LIMIT_MARKER`] and skips JSON extraction entirely.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::client::{GenerationClient, GenerationRequest, RequestKind};
use crate::error::GenAiError;

/// Literal substring that tags a rate-limited response.
pub const RATE_LIMIT_MARKER: &str = "AI analysis temporarily rate limited";

/// The fixed, schema-valid demo brief returned when no credential is
/// configured or the live endpoint is unreachable.
#[must_use]
pub fn demo_brief_json() -> String {
    json!({
        "summary": "[Demo] Influencer content shows steady engagement growth led by short-form video, with fitness and lifestyle themes dominating the tracked period.",
        "keyFindings": [
            "Short-form video outperforms static posts on every tracked platform",
            "Posting consistency correlates with follower engagement rate",
            "Fitness and lifestyle hashtags drive the widest reach",
            "Audience comments concentrate within the first 24 hours after posting",
            "Cross-platform influencers retain higher average engagement"
        ],
        "platformInsights": {
            "youtube": {
                "summary": "Long-form videos anchor subscriber loyalty while shorts drive discovery.",
                "topContentTypes": ["video"],
                "trendingHashtags": ["#fitness", "#vlog", "#tutorial"],
                "engagementTrends": "Watch time stable, comment volume rising week over week"
            },
            "instagram": {
                "summary": "Reels dominate reach; carousel posts retain saves and shares.",
                "topContentTypes": ["Reel", "Post"],
                "trendingHashtags": ["#ootd", "#wellness", "#grwm"],
                "engagementTrends": "Reel engagement up, static post reach flat"
            }
        },
        "contentAnalysis": {
            "keyThemes": ["fitness", "lifestyle", "fashion"],
            "trendingTopics": ["#fitness", "#wellness", "#ootd"],
            "contentTypes": {"videos": 4, "reels": 3, "photos": 2, "stories": 1},
            "sentimentAnalysis": {"positive": 58.0, "neutral": 30.0, "negative": 12.0},
            "engagementInsights": [
                "Video content averages 3x the interactions of photo posts",
                "Evening posts outperform morning posts on engagement rate"
            ],
            "competitorAnalysis": [
                "Peer accounts post 20% more frequently at similar engagement"
            ],
            "recommendations": [
                "Shift budget toward short-form video formats",
                "Standardize a posting cadence of 4-5 items per week"
            ]
        },
        "actionableRecommendations": [
            "Prioritize Reels and Shorts for the next campaign cycle",
            "Seed branded hashtags in the first line of captions",
            "Engage comments within the first hour of posting"
        ],
        "brandCollaborations": [
            {
                "name": "Gymshark",
                "type": "Sponsorship",
                "campaign": "Organic brand mentions",
                "aiInsights": "Consistent apparel placement across workout content",
                "engagement": "5.4%",
                "reach": "120.0K",
                "sentiment": "positive",
                "platform": "instagram",
                "contentCount": 3
            }
        ]
    })
    .to_string()
}

/// The markdown-formatted notice returned when the endpoint reports a
/// quota/rate-limit condition.
#[must_use]
pub fn rate_limited_markdown() -> String {
    format!(
        "## Analysis unavailable\n\n\
         {RATE_LIMIT_MARKER} — the generation endpoint reported a quota limit.\n\n\
         Locally computed metrics are shown instead. Try again in a few minutes."
    )
}

/// Best-effort canned answer for a free-form question, keyed by
/// substring match.
#[must_use]
pub fn canned_answer(question: &str) -> String {
    let q = question.to_lowercase();
    if q.contains("engagement") {
        "Engagement is strongest on short-form video; likes and comments concentrate within \
         the first day after posting, and evening posts outperform morning posts."
            .to_string()
    } else if q.contains("hashtag") || q.contains("trend") {
        "Fitness, wellness, and fashion hashtags are currently the most frequent across the \
         tracked content, with short-form video formats trending upward."
            .to_string()
    } else if q.contains("brand") || q.contains("collab") || q.contains("sponsor") {
        "Recurring brand mentions cluster around apparel and lifestyle products; accounts with \
         repeated organic mentions are the strongest collaboration candidates."
            .to_string()
    } else if q.contains("platform") {
        "Instagram Reels currently deliver the widest reach, while YouTube retains the most \
         loyal per-item engagement."
            .to_string()
    } else {
        "Based on the tracked content, audience interest centers on short-form video with \
         lifestyle themes; posting consistency remains the clearest engagement lever."
            .to_string()
    }
}

/// Offline generation strategy serving fixed responses after a short
/// simulated delay.
pub struct CannedClient {
    simulated_delay: Duration,
}

impl CannedClient {
    #[must_use]
    pub fn new(simulated_delay: Duration) -> Self {
        Self { simulated_delay }
    }
}

#[async_trait]
impl GenerationClient for CannedClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenAiError> {
        tokio::time::sleep(self.simulated_delay).await;
        match &request.kind {
            RequestKind::Brief => Ok(demo_brief_json()),
            RequestKind::Query { question } => Ok(canned_answer(question)),
        }
    }
}
