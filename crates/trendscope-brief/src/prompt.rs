//! Prompt formatting.
//!
//! Renders the canonical content set into a bounded text block plus the
//! fixed structured-analysis instruction. Deterministic: the same input
//! always produces the same prompt — no clock reads, no randomness.
//!
//! Size policy: at most [`MAX_ITEMS_PER_INFLUENCER`] items per set,
//! captions cut at [`MAX_CAPTION_CHARS`] chars, and the whole content
//! section bounded by [`CONTENT_CHAR_BUDGET`]; overflowing item blocks
//! are dropped whole with a logged warning, never silently.

use std::fmt::Write as _;

use trendscope_core::{ContentItem, InfluencerContentSet};

pub const MAX_ITEMS_PER_INFLUENCER: usize = 10;
pub const MAX_CAPTION_CHARS: usize = 280;
pub const CONTENT_CHAR_BUDGET: usize = 16_000;

const BRIEF_INSTRUCTIONS: &str = r#"Analyze the influencer content above and respond with ONLY a JSON object (no markdown fences, no prose) in exactly this shape:

{
  "summary": "2-3 sentence overview of the period",
  "keyFindings": ["5 to 7 specific findings grounded in the data"],
  "platformInsights": {
    "youtube": {
      "summary": "...",
      "topContentTypes": ["..."],
      "trendingHashtags": ["..."],
      "engagementTrends": "..."
    }
  },
  "contentAnalysis": {
    "keyThemes": ["..."],
    "trendingTopics": ["..."],
    "contentTypes": {"videos": 0, "reels": 0, "photos": 0, "stories": 0},
    "sentimentAnalysis": {"positive": 0, "neutral": 0, "negative": 0},
    "engagementInsights": ["..."],
    "competitorAnalysis": ["..."],
    "recommendations": ["..."]
  },
  "actionableRecommendations": ["..."],
  "brandCollaborations": [
    {
      "name": "brand name",
      "type": "Sponsorship | Product Review | UGC Campaign | Product Mention",
      "campaign": "...",
      "aiInsights": "...",
      "engagement": "4.2%",
      "reach": "120K",
      "sentiment": "positive | neutral | negative",
      "platform": "...",
      "contentCount": 0
    }
  ]
}

Rules: sentimentAnalysis percentages must sum to 100. Populate every array with entries grounded in the content shown — do not invent influencers or brands that are not present. Only include platforms that appear in the data."#;

/// Build the trend-brief prompt for a canonical content set.
#[must_use]
pub fn build_brief_prompt(sets: &[InfluencerContentSet], timeframe: &str) -> String {
    format!(
        "You are a social media analyst. Below is influencer content from the last {timeframe}.\n\n{}\n\n{BRIEF_INSTRUCTIONS}",
        render_content(sets)
    )
}

/// Build a free-form question prompt over the same content dump.
#[must_use]
pub fn build_query_prompt(sets: &[InfluencerContentSet], question: &str) -> String {
    format!(
        "You are a social media analyst. Below is the tracked influencer content.\n\n{}\n\nAnswer this question in plain text, grounded in the content above:\n{question}",
        render_content(sets)
    )
}

/// Render every content item grouped by influencer and platform, within
/// the character budget.
fn render_content(sets: &[InfluencerContentSet]) -> String {
    let mut out = String::new();
    let mut dropped = 0usize;

    for set in sets {
        let header = format!("## {} ({})\n", set.influencer_name, set.platform);
        let over_per_set = set.content.len().saturating_sub(MAX_ITEMS_PER_INFLUENCER);
        dropped += over_per_set;

        let mut wrote_header = false;
        for item in set.content.iter().take(MAX_ITEMS_PER_INFLUENCER) {
            let block = render_item(item);
            let needed = block.len() + if wrote_header { 0 } else { header.len() };
            if out.len() + needed > CONTENT_CHAR_BUDGET {
                dropped += 1;
                continue;
            }
            if !wrote_header {
                out.push_str(&header);
                wrote_header = true;
            }
            out.push_str(&block);
        }
        if wrote_header {
            out.push('\n');
        }
    }

    if dropped > 0 {
        tracing::warn!(
            dropped,
            budget = CONTENT_CHAR_BUDGET,
            "prompt content truncated — dropped items beyond the size budget"
        );
    }

    out.trim_end().to_string()
}

fn render_item(item: &ContentItem) -> String {
    let mut line = format!("- [{}] {}", item.content_type, item.timestamp);
    if let Some(title) = &item.title {
        let _ = write!(line, " \"{}\"", truncate(title, MAX_CAPTION_CHARS));
    }
    if let Some(caption) = &item.caption {
        let _ = write!(line, " — {}", truncate(caption, MAX_CAPTION_CHARS));
    }
    if !item.hashtags.is_empty() {
        let tags: Vec<String> = item.hashtags.iter().map(|t| format!("#{t}")).collect();
        let _ = write!(line, " [{}]", tags.join(" "));
    }
    let e = &item.engagement;
    let _ = write!(line, " (likes={} comments={}", e.likes, e.comments);
    if let Some(views) = e.views {
        let _ = write!(line, " views={views}");
    }
    if let Some(shares) = e.shares {
        let _ = write!(line, " shares={shares}");
    }
    line.push_str(")\n");
    line
}

/// Cut at a char boundary, appending an ellipsis when shortened.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_core::{Engagement, Platform};

    fn item(caption: &str, likes: u64) -> ContentItem {
        ContentItem {
            platform: Platform::Instagram,
            influencer_name: "jane".to_string(),
            title: None,
            caption: Some(caption.to_string()),
            hashtags: vec!["style".to_string()],
            mentions: vec![],
            engagement: Engagement {
                likes,
                comments: 3,
                views: Some(900),
                shares: None,
            },
            timestamp: "2025-06-01T10:00:00Z".to_string(),
            content_type: "Reel".to_string(),
        }
    }

    fn set(items: Vec<ContentItem>) -> InfluencerContentSet {
        InfluencerContentSet {
            platform: Platform::Instagram,
            influencer_name: "jane".to_string(),
            content: items,
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let sets = vec![set(vec![item("hello world", 10)])];
        assert_eq!(
            build_brief_prompt(&sets, "48 hours"),
            build_brief_prompt(&sets, "48 hours")
        );
    }

    #[test]
    fn prompt_includes_timeframe_and_instructions() {
        let sets = vec![set(vec![item("hello", 10)])];
        let prompt = build_brief_prompt(&sets, "72 hours");
        assert!(prompt.contains("last 72 hours"));
        assert!(prompt.contains("sentimentAnalysis percentages must sum to 100"));
        assert!(prompt.contains("\"keyFindings\""));
    }

    #[test]
    fn prompt_renders_item_details() {
        let sets = vec![set(vec![item("spring haul", 42)])];
        let prompt = build_brief_prompt(&sets, "48 hours");
        assert!(prompt.contains("## jane (instagram)"));
        assert!(prompt.contains("[Reel] 2025-06-01T10:00:00Z"));
        assert!(prompt.contains("spring haul"));
        assert!(prompt.contains("#style"));
        assert!(prompt.contains("likes=42 comments=3 views=900"));
    }

    #[test]
    fn per_influencer_item_cap_applies() {
        let items: Vec<ContentItem> = (0..30).map(|i| item(&format!("post {i}"), i)).collect();
        let sets = vec![set(items)];
        let prompt = build_brief_prompt(&sets, "48 hours");
        assert!(prompt.contains("post 9"));
        assert!(!prompt.contains("post 10"), "items beyond the cap are dropped");
    }

    #[test]
    fn long_captions_are_truncated_with_ellipsis() {
        let long = "x".repeat(1000);
        let sets = vec![set(vec![item(&long, 1)])];
        let prompt = build_brief_prompt(&sets, "48 hours");
        assert!(prompt.contains('…'));
        assert!(!prompt.contains(&long));
    }

    #[test]
    fn content_budget_drops_whole_blocks() {
        // Many influencers with near-budget captions force drops.
        let sets: Vec<InfluencerContentSet> = (0..200)
            .map(|i| {
                InfluencerContentSet {
                    platform: Platform::Instagram,
                    influencer_name: format!("inf{i}"),
                    content: vec![item(&"y".repeat(250), 1)],
                }
            })
            .collect();
        let rendered = render_content(&sets);
        assert!(rendered.len() <= CONTENT_CHAR_BUDGET);
    }

    #[test]
    fn query_prompt_carries_the_question() {
        let sets = vec![set(vec![item("hello", 10)])];
        let prompt = build_query_prompt(&sets, "what is trending?");
        assert!(prompt.ends_with("what is trending?"));
        assert!(prompt.contains("## jane (instagram)"));
    }
}
