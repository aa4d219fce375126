//! Content normalization.
//!
//! Converts heterogeneous influencer records — whatever field names the
//! source platform used — into the canonical [`InfluencerContentSet`]
//! shape. Every lookup walks a fixed precedence list, numeric fields
//! default to 0 when absent or non-numeric, and nothing here can fail:
//! malformed input produces a best-effort canonical item, never an
//! error. Pure function, no I/O, no clock reads, so normalizing the
//! same batch twice yields identical output.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use trendscope_core::{ContentItem, Engagement, InfluencerContentSet, Platform};

fn hashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("hashtag regex is valid"))
}

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9_.]+)").expect("mention regex is valid"))
}

/// Normalize a batch of loosely-typed influencer records.
#[must_use]
pub fn normalize_batch(batch: &[Value]) -> Vec<InfluencerContentSet> {
    batch.iter().map(normalize_influencer).collect()
}

fn normalize_influencer(record: &Value) -> InfluencerContentSet {
    let influencer_name = first_string(record, &["influencerName", "name", "username", "channelName"])
        .unwrap_or_else(|| "unknown".to_string());

    let platform = first_string(record, &["platform"])
        .map(|p| Platform::parse(&p))
        .unwrap_or(Platform::Other);

    let content = ["content", "videos", "posts", "items"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .map(|item| normalize_item(item, platform, &influencer_name))
                .collect()
        })
        .unwrap_or_default();

    InfluencerContentSet {
        platform,
        influencer_name,
        content,
    }
}

fn normalize_item(item: &Value, platform: Platform, influencer_name: &str) -> ContentItem {
    let title = first_string(item, &["title", "videoTitle"]);
    let caption = first_string(item, &["caption", "description", "text"]);

    let tag_source = format!(
        "{} {}",
        title.as_deref().unwrap_or(""),
        caption.as_deref().unwrap_or("")
    );
    let hashtags = string_array(item, "hashtags")
        .map(|tags| dedupe(tags.iter().map(|t| t.trim_start_matches('#').to_string())))
        .filter(|tags| !tags.is_empty())
        .unwrap_or_else(|| extract_tags(hashtag_re(), &tag_source));
    let mentions = string_array(item, "mentions")
        .map(|m| dedupe(m.iter().map(|t| t.trim_start_matches('@').to_string())))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| extract_tags(mention_re(), &tag_source));

    let engagement = Engagement {
        likes: first_u64(item, &["likes", "likesCount", "likeCount"]).unwrap_or(0),
        comments: first_u64(item, &["comments", "commentsCount", "commentCount"]).unwrap_or(0),
        views: first_u64(item, &["views", "viewCount", "viewsCount"]),
        shares: first_u64(item, &["shares", "sharesCount"]),
    };

    let timestamp =
        first_string(item, &["timestamp", "publishedAt", "takenAt", "date"]).unwrap_or_default();

    let content_type = first_string(item, &["type", "contentType", "mediaType"])
        .unwrap_or_else(|| default_type(platform).to_string());

    ContentItem {
        platform,
        influencer_name: influencer_name.to_string(),
        title,
        caption,
        hashtags,
        mentions,
        engagement,
        timestamp,
        content_type,
    }
}

fn default_type(platform: Platform) -> &'static str {
    match platform {
        Platform::Youtube => "video",
        Platform::Instagram | Platform::Other => "Post",
    }
}

/// First present, non-empty string among `keys`.
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// First numeric value among `keys`. Accepts JSON numbers and numeric
/// strings; negatives and garbage yield `None` for that key.
fn first_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| {
        let field = value.get(*key)?;
        field
            .as_u64()
            .or_else(|| field.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
    })
}

fn string_array(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

/// Regex capture groups from `text`, deduplicated, order preserved.
fn extract_tags(re: &Regex, text: &str) -> Vec<String> {
    dedupe(
        re.captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    )
}

fn dedupe(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .filter(|item| !item.is_empty() && seen.insert(item.to_lowercase()))
        .collect()
}
