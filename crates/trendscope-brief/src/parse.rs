//! Tolerant response parsing.
//!
//! Model output arrives as JSON, JSON buried in prose or code fences,
//! or the markdown rate-limit notice. [`extract_json`] classifies the
//! text into a tagged [`Extraction`] — it never errors — and
//! [`parse_brief`] turns any of the three outcomes into a complete
//! [`BriefAnalysis`], backfilling absent fields from deterministic
//! fallback synthesis.

use serde::de::DeserializeOwned;
use serde_json::Value;

use trendscope_core::{BrandCollaboration, BrandKeyword, InfluencerContentSet};
use trendscope_genai::RATE_LIMIT_MARKER;

use crate::assemble::BriefAnalysis;
use crate::fallback;

/// Outcome of locating a JSON object in raw model text.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Parsed(Value),
    RateLimited,
    Malformed,
}

/// Classify raw model text.
///
/// Rate-limit detection runs first and skips JSON extraction entirely.
/// Otherwise the first balanced `{...}` object substring is located
/// (code fences unwrapped, trailing commas stripped) and parsed.
#[must_use]
pub fn extract_json(text: &str) -> Extraction {
    if text.contains(RATE_LIMIT_MARKER) {
        return Extraction::RateLimited;
    }

    let candidate = unwrap_code_fence(text);
    let Some(object) = locate_object(candidate) else {
        return Extraction::Malformed;
    };
    let cleaned = strip_trailing_commas(object);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) if value.is_object() => Extraction::Parsed(value),
        _ => Extraction::Malformed,
    }
}

/// Unwrap a ```json (or bare ```) fenced block if one is present.
fn unwrap_code_fence(text: &str) -> &str {
    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        // Skip the language tag line, if any.
        let content_start = after.find('\n').map_or(0, |i| i + 1);
        let body = &after[content_start..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    text
}

/// First balanced `{...}` substring, ignoring braces inside JSON
/// strings. Returns `None` when the object never closes (truncated
/// output).
fn locate_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop commas that directly precede a closing `}` or `]`.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace()).copied();
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse raw model text into a complete analysis. Never fails: every
/// outcome — parsed, rate limited, malformed — yields a renderable
/// structure with every field populated.
#[must_use]
pub fn parse_brief(
    text: &str,
    sets: &[InfluencerContentSet],
    brands: &[BrandKeyword],
) -> BriefAnalysis {
    match extract_json(text) {
        Extraction::Parsed(value) => from_parsed(&value, sets, brands),
        Extraction::RateLimited => {
            tracing::warn!("generation was rate limited — synthesizing brief locally");
            rate_limited_analysis(sets, brands)
        }
        Extraction::Malformed => {
            tracing::warn!("model response was not parseable JSON — synthesizing brief locally");
            full_fallback(sets, brands)
        }
    }
}

/// Deserialize one top-level field, defaulting on absence or shape
/// mismatch.
fn field<T: DeserializeOwned + Default>(value: &Value, key: &str) -> T {
    value
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Collaborations are salvaged per element: a single bad entry must not
/// discard the rest of the model's list.
fn salvage_collaborations(value: &Value) -> Vec<BrandCollaboration> {
    value
        .get("brandCollaborations")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn from_parsed(
    value: &Value,
    sets: &[InfluencerContentSet],
    brands: &[BrandKeyword],
) -> BriefAnalysis {
    let mut summary: String = field(value, "summary");
    if summary.trim().is_empty() {
        summary = fallback::fallback_summary(sets);
    }

    let mut key_findings: Vec<String> = field(value, "keyFindings");
    if key_findings.is_empty() {
        key_findings = fallback::fallback_key_findings(sets);
    }
    key_findings.truncate(7);

    let mut platform_insights: std::collections::BTreeMap<String, trendscope_core::PlatformInsight> =
        field(value, "platformInsights");
    if platform_insights.is_empty() {
        platform_insights = fallback::synthesize_platform_insights(sets);
    }

    let mut content_analysis: trendscope_core::ContentAnalysisResult =
        field(value, "contentAnalysis");
    let synthesized = fallback::synthesize_analysis(sets);
    if content_analysis.content_types.is_empty() {
        content_analysis.content_types = synthesized.content_types.clone();
    }
    if content_analysis.sentiment_analysis.is_empty() {
        content_analysis.sentiment_analysis = fallback::default_sentiment();
    }
    if content_analysis.key_themes.is_empty() {
        content_analysis.key_themes = synthesized.key_themes.clone();
    }
    if content_analysis.trending_topics.is_empty() {
        content_analysis.trending_topics = synthesized.trending_topics.clone();
    }
    if content_analysis.engagement_insights.is_empty() {
        content_analysis.engagement_insights = synthesized.engagement_insights.clone();
    }
    if content_analysis.recommendations.is_empty() {
        content_analysis.recommendations = fallback::default_recommendations();
    }

    let mut actionable_recommendations: Vec<String> = field(value, "actionableRecommendations");
    if actionable_recommendations.is_empty() {
        actionable_recommendations = fallback::default_recommendations();
    }

    let mut brand_collaborations = salvage_collaborations(value);
    if brand_collaborations.is_empty() {
        brand_collaborations = fallback::synthesize_collaborations(sets, brands);
    }

    BriefAnalysis {
        summary,
        key_findings,
        platform_insights,
        content_analysis,
        actionable_recommendations,
        brand_collaborations,
    }
}

fn rate_limited_analysis(
    sets: &[InfluencerContentSet],
    brands: &[BrandKeyword],
) -> BriefAnalysis {
    let mut key_findings = vec![format!("{RATE_LIMIT_MARKER} — findings computed locally")];
    key_findings.extend(fallback::fallback_key_findings(sets));
    key_findings.truncate(7);

    let mut recommendations =
        vec![format!("{RATE_LIMIT_MARKER} — retry shortly for model-generated recommendations")];
    recommendations.extend(fallback::default_recommendations());

    BriefAnalysis {
        summary: format!(
            "{RATE_LIMIT_MARKER}. Showing locally computed metrics; retry in a few minutes."
        ),
        key_findings,
        platform_insights: fallback::synthesize_platform_insights(sets),
        content_analysis: fallback::synthesize_analysis(sets),
        actionable_recommendations: recommendations,
        brand_collaborations: fallback::synthesize_collaborations(sets, brands),
    }
}

fn full_fallback(sets: &[InfluencerContentSet], brands: &[BrandKeyword]) -> BriefAnalysis {
    BriefAnalysis {
        summary: fallback::fallback_summary(sets),
        key_findings: fallback::fallback_key_findings(sets),
        platform_insights: fallback::synthesize_platform_insights(sets),
        content_analysis: fallback::synthesize_analysis(sets),
        actionable_recommendations: fallback::default_recommendations(),
        brand_collaborations: fallback::synthesize_collaborations(sets, brands),
    }
}
