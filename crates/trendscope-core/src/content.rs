use serde::{Deserialize, Serialize};

/// Source platform of a content item.
///
/// Unknown platform strings normalize to [`Platform::Other`] rather than
/// failing, so a batch with an unexpected source still produces items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Other,
}

impl Platform {
    /// Parse a loosely-typed platform label, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "youtube" | "yt" => Platform::Youtube,
            "instagram" | "ig" | "insta" => Platform::Instagram,
            _ => Platform::Other,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Youtube => write!(f, "youtube"),
            Platform::Instagram => write!(f, "instagram"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// Engagement counters for one content item.
///
/// `likes` and `comments` are always present; missing or non-numeric
/// source fields default to 0. `views` and `shares` stay absent when the
/// source platform does not report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
}

impl Engagement {
    /// Likes plus comments — the interaction count used by thresholds.
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.likes.saturating_add(self.comments)
    }
}

/// The canonical, platform-agnostic representation of one post or video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub platform: Platform,
    pub influencer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Ordered, deduplicated, stored without the leading `#`.
    pub hashtags: Vec<String>,
    /// Ordered, deduplicated, stored without the leading `@`.
    pub mentions: Vec<String>,
    pub engagement: Engagement,
    /// ISO-8601 string as received from the source; empty when absent.
    pub timestamp: String,
    /// Free-form content type, e.g. "video", "Reel", "Post".
    #[serde(rename = "type")]
    pub content_type: String,
}

impl ContentItem {
    /// Lowercased concatenation of title, caption, and hashtags — the
    /// text scanned for brand keyword co-occurrence.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut text = String::new();
        if let Some(title) = &self.title {
            text.push_str(title);
            text.push(' ');
        }
        if let Some(caption) = &self.caption {
            text.push_str(caption);
            text.push(' ');
        }
        for tag in &self.hashtags {
            text.push_str(tag);
            text.push(' ');
        }
        text.to_lowercase()
    }
}

/// All canonical content for one tracked influencer/platform pairing.
///
/// Assembled fresh per trend-brief request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerContentSet {
    pub platform: Platform,
    pub influencer_name: String,
    pub content: Vec<ContentItem>,
}
