//! Deterministic fallback synthesis.
//!
//! Reconstructs an analysis structure from the canonical content set
//! alone — no AI involved — for use when the generation endpoint is
//! unreachable, rate limited, or returns unparseable text. Everything
//! here is a pure function of its inputs.

use std::collections::BTreeMap;

use trendscope_core::{
    BrandCollaboration, BrandKeyword, CollaborationKind, ContentAnalysisResult, ContentItem,
    InfluencerContentSet, PlatformInsight, Sentiment, SentimentBreakdown,
};

/// Brands mentioned fewer times than this are not reported.
pub const MIN_BRAND_MENTIONS: u64 = 2;

/// Average interactions per mention at which a brand presence reads as
/// a sponsorship rather than a review.
const SPONSORSHIP_AVG_INTERACTIONS: u64 = 5_000;
const PRODUCT_REVIEW_AVG_INTERACTIONS: u64 = 1_500;

const POSITIVE_AVG_INTERACTIONS: u64 = 800;
const NEUTRAL_AVG_INTERACTIONS: u64 = 150;

/// Reach credited per mention when the item reports no view count.
const DEFAULT_REACH_PER_MENTION: u64 = 1_000;

const TOP_HASHTAG_LIMIT: usize = 5;

fn all_items(sets: &[InfluencerContentSet]) -> impl Iterator<Item = &ContentItem> {
    sets.iter().flat_map(|set| set.content.iter())
}

/// Bucket a free-form content-type string.
fn classify_type(raw: &str) -> &'static str {
    let lower = raw.to_lowercase();
    if lower.contains("video") || lower.contains("youtube") {
        "videos"
    } else if lower.contains("reel") {
        "reels"
    } else if lower.contains("story") {
        "stories"
    } else {
        "photos"
    }
}

/// Count content items per bucket. All four buckets are always present,
/// zero counts included.
#[must_use]
pub fn count_content_types(sets: &[InfluencerContentSet]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = ["videos", "reels", "photos", "stories"]
        .iter()
        .map(|k| ((*k).to_string(), 0))
        .collect();
    for item in all_items(sets) {
        *counts
            .entry(classify_type(&item.content_type).to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Hashtags by descending frequency (case-insensitive), ties broken
/// alphabetically for determinism. Returns the casing first seen.
#[must_use]
pub fn top_hashtags(sets: &[InfluencerContentSet], limit: usize) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, (String, u64)> = BTreeMap::new();
    for item in all_items(sets) {
        for tag in &item.hashtags {
            let entry = counts
                .entry(tag.to_lowercase())
                .or_insert_with(|| (tag.clone(), 0));
            entry.1 += 1;
        }
    }
    let mut ranked: Vec<(String, u64)> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[allow(clippy::cast_precision_loss)]
fn humanize_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[derive(Default)]
struct BrandTally {
    mentions: u64,
    interactions: u64,
    reach: u64,
    per_platform: BTreeMap<String, u64>,
}

/// Detect brand collaborations by keyword co-occurrence.
///
/// Each item mentioning a brand (in its title, caption, or hashtags)
/// counts once toward that brand; engagement and reach (views, or a
/// fixed default when unknown) are summed across matches. Brands below
/// [`MIN_BRAND_MENTIONS`] are discarded. When nothing clears the bar, a
/// single placeholder record is emitted so consumers never see an empty
/// list on the fallback path.
#[must_use]
pub fn synthesize_collaborations(
    sets: &[InfluencerContentSet],
    brands: &[BrandKeyword],
) -> Vec<BrandCollaboration> {
    let mut collaborations = Vec::new();

    for brand in brands {
        let terms = brand.match_terms();
        let mut tally = BrandTally::default();

        for item in all_items(sets) {
            let text = item.search_text();
            if terms.iter().any(|term| text.contains(term.as_str())) {
                tally.mentions += 1;
                tally.interactions += item.engagement.interactions();
                tally.reach += item.engagement.views.unwrap_or(DEFAULT_REACH_PER_MENTION);
                *tally
                    .per_platform
                    .entry(item.platform.to_string())
                    .or_insert(0) += 1;
            }
        }

        if tally.mentions < MIN_BRAND_MENTIONS {
            continue;
        }

        let avg_interactions = tally.interactions / tally.mentions;
        let kind = if avg_interactions >= SPONSORSHIP_AVG_INTERACTIONS {
            CollaborationKind::Sponsorship
        } else if avg_interactions >= PRODUCT_REVIEW_AVG_INTERACTIONS {
            CollaborationKind::ProductReview
        } else {
            CollaborationKind::ProductMention
        };
        let sentiment = if avg_interactions >= POSITIVE_AVG_INTERACTIONS {
            Sentiment::Positive
        } else if avg_interactions >= NEUTRAL_AVG_INTERACTIONS {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        };

        // Dominant platform: highest match count, alphabetical on ties.
        let platform = tally
            .per_platform
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "other".to_string());

        #[allow(clippy::cast_precision_loss)]
        let engagement_rate = tally.interactions as f64 / tally.reach.max(1) as f64 * 100.0;

        collaborations.push(BrandCollaboration {
            name: brand.name.clone(),
            kind,
            campaign: "Organic brand mentions".to_string(),
            ai_insights: format!(
                "{} tracked posts mention {} with an average of {} interactions each",
                tally.mentions, brand.name, avg_interactions
            ),
            engagement: format!("{engagement_rate:.1}%"),
            reach: humanize_count(tally.reach),
            sentiment,
            platform,
            content_count: tally.mentions,
        });
    }

    if collaborations.is_empty() {
        collaborations.push(BrandCollaboration {
            name: "No brand collaborations detected".to_string(),
            kind: CollaborationKind::ContentOpportunity,
            campaign: "Prospecting".to_string(),
            ai_insights: "No tracked brand reached the minimum mention threshold in this period."
                .to_string(),
            engagement: "0.0%".to_string(),
            reach: "0".to_string(),
            sentiment: Sentiment::Neutral,
            platform: "all".to_string(),
            content_count: 0,
        });
    }

    collaborations
}

/// Deterministic replacement for the model's content-analysis section.
#[must_use]
pub fn synthesize_analysis(sets: &[InfluencerContentSet]) -> ContentAnalysisResult {
    let hashtags = top_hashtags(sets, TOP_HASHTAG_LIMIT);
    let item_count = all_items(sets).count() as u64;
    let total_interactions: u64 = all_items(sets).map(|i| i.engagement.interactions()).sum();
    let total_likes: u64 = all_items(sets).map(|i| i.engagement.likes).sum();

    let mut engagement_insights = Vec::new();
    if item_count > 0 {
        engagement_insights.push(format!(
            "Total engagement across {item_count} items: {total_interactions} interactions"
        ));
        engagement_insights.push(format!(
            "Average likes per item: {}",
            total_likes / item_count
        ));
        if let Some((platform, avg)) = best_platform(sets) {
            engagement_insights.push(format!(
                "{platform} delivers the highest average engagement ({avg} interactions per item)"
            ));
        }
    }

    ContentAnalysisResult {
        key_themes: hashtags.iter().map(|(tag, _)| tag.clone()).collect(),
        trending_topics: hashtags.iter().map(|(tag, _)| format!("#{tag}")).collect(),
        content_types: count_content_types(sets),
        sentiment_analysis: default_sentiment(),
        engagement_insights,
        competitor_analysis: Vec::new(),
        recommendations: default_recommendations(),
    }
}

/// The documented default sentiment split used when the model reports
/// nothing usable.
#[must_use]
pub fn default_sentiment() -> SentimentBreakdown {
    SentimentBreakdown {
        positive: 45.0,
        neutral: 35.0,
        negative: 20.0,
    }
}

/// The documented default recommendation set.
#[must_use]
pub fn default_recommendations() -> Vec<String> {
    vec![
        "Increase short-form video output on the best-performing platform".to_string(),
        "Post during peak audience hours and keep a consistent cadence".to_string(),
        "Double down on the hashtags already driving discovery".to_string(),
    ]
}

/// Average interactions per item for the strongest platform.
fn best_platform(sets: &[InfluencerContentSet]) -> Option<(String, u64)> {
    let mut per_platform: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for item in all_items(sets) {
        let entry = per_platform.entry(item.platform.to_string()).or_insert((0, 0));
        entry.0 += item.engagement.interactions();
        entry.1 += 1;
    }
    per_platform
        .into_iter()
        .map(|(platform, (total, count))| (platform, total / count.max(1)))
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
}

/// Deterministic per-platform insight sections.
#[must_use]
pub fn synthesize_platform_insights(
    sets: &[InfluencerContentSet],
) -> BTreeMap<String, PlatformInsight> {
    let mut grouped: BTreeMap<String, Vec<&InfluencerContentSet>> = BTreeMap::new();
    for set in sets {
        grouped.entry(set.platform.to_string()).or_default().push(set);
    }

    grouped
        .into_iter()
        .map(|(platform, platform_sets)| {
            let owned: Vec<InfluencerContentSet> =
                platform_sets.iter().map(|s| (*s).clone()).collect();
            let item_count = all_items(&owned).count() as u64;
            let influencer_count = owned.len();
            let total_interactions: u64 =
                all_items(&owned).map(|i| i.engagement.interactions()).sum();

            // Raw type labels by frequency, most common first.
            let mut type_counts: BTreeMap<String, u64> = BTreeMap::new();
            for item in all_items(&owned) {
                *type_counts.entry(item.content_type.clone()).or_insert(0) += 1;
            }
            let mut top_types: Vec<(String, u64)> = type_counts.into_iter().collect();
            top_types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

            let insight = PlatformInsight {
                summary: format!(
                    "{item_count} items from {influencer_count} influencer(s) tracked on {platform}"
                ),
                top_content_types: top_types.into_iter().take(3).map(|(t, _)| t).collect(),
                trending_hashtags: top_hashtags(&owned, TOP_HASHTAG_LIMIT)
                    .into_iter()
                    .map(|(tag, _)| format!("#{tag}"))
                    .collect(),
                engagement_trends: format!(
                    "Average {} interactions per item",
                    total_interactions / item_count.max(1)
                ),
            };
            (platform, insight)
        })
        .collect()
}

/// Deterministic overview sentence for the fallback brief.
#[must_use]
pub fn fallback_summary(sets: &[InfluencerContentSet]) -> String {
    let item_count = all_items(sets).count();
    let influencer_count = sets.len();
    let platform_count = sets
        .iter()
        .map(|s| s.platform)
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    format!(
        "Automated analysis of {item_count} content items from {influencer_count} influencer(s) \
         across {platform_count} platform(s)."
    )
}

/// Deterministic key findings, capped at 7 entries.
#[must_use]
pub fn fallback_key_findings(sets: &[InfluencerContentSet]) -> Vec<String> {
    let mut findings = Vec::new();
    let item_count = all_items(sets).count() as u64;
    findings.push(format!("{item_count} content items analyzed this period"));

    if let Some((platform, avg)) = best_platform(sets) {
        findings.push(format!(
            "{platform} leads engagement with {avg} interactions per item"
        ));
    }
    if let Some((tag, count)) = top_hashtags(sets, 1).into_iter().next() {
        findings.push(format!("#{tag} is the most used hashtag ({count} uses)"));
    }
    if let Some((name, interactions)) = top_influencer(sets) {
        findings.push(format!(
            "{name} drives the most engagement ({interactions} total interactions)"
        ));
    }
    let counts = count_content_types(sets);
    if let Some((bucket, count)) = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .filter(|(_, count)| **count > 0)
    {
        findings.push(format!("{bucket} dominate the content mix ({count} items)"));
    }

    findings.truncate(7);
    findings
}

fn top_influencer(sets: &[InfluencerContentSet]) -> Option<(String, u64)> {
    sets.iter()
        .map(|set| {
            let total: u64 = set.content.iter().map(|i| i.engagement.interactions()).sum();
            (set.influencer_name.clone(), total)
        })
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .filter(|(_, total)| *total > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_core::{default_brands, Engagement, Platform};

    fn item(content_type: &str, caption: &str, likes: u64, views: Option<u64>) -> ContentItem {
        ContentItem {
            platform: Platform::Instagram,
            influencer_name: "jane".to_string(),
            title: None,
            caption: Some(caption.to_string()),
            hashtags: vec![],
            mentions: vec![],
            engagement: Engagement {
                likes,
                comments: 0,
                views,
                shares: None,
            },
            timestamp: String::new(),
            content_type: content_type.to_string(),
        }
    }

    fn single_set(items: Vec<ContentItem>) -> Vec<InfluencerContentSet> {
        vec![InfluencerContentSet {
            platform: Platform::Instagram,
            influencer_name: "jane".to_string(),
            content: items,
        }]
    }

    #[test]
    fn content_type_counting_matches_buckets() {
        let sets = single_set(vec![
            item("Video", "a", 0, None),
            item("video", "b", 0, None),
            item("Reel", "c", 0, None),
            item("Post", "d", 0, None),
        ]);
        let counts = count_content_types(&sets);
        assert_eq!(counts["videos"], 2);
        assert_eq!(counts["reels"], 1);
        assert_eq!(counts["photos"], 1);
        assert_eq!(counts["stories"], 0, "zero buckets stay present");
    }

    #[test]
    fn brand_below_mention_threshold_is_excluded() {
        let sets = single_set(vec![
            item("Post", "loving my new Apple watch", 100, None),
            item("Post", "Samsung drop day", 100, None),
            item("Post", "more Samsung content", 100, None),
            item("Post", "Samsung again", 100, None),
        ]);
        let collabs = synthesize_collaborations(&sets, &default_brands());
        assert_eq!(collabs.len(), 1, "only Samsung clears the 2-mention bar");
        assert_eq!(collabs[0].name, "Samsung");
        assert_eq!(collabs[0].content_count, 3);
    }

    #[test]
    fn brand_kind_upgrades_with_average_interactions() {
        let sets = single_set(vec![
            item("Post", "Nike fit", 6000, Some(10_000)),
            item("Post", "Nike again", 6000, Some(10_000)),
        ]);
        let collabs = synthesize_collaborations(&sets, &default_brands());
        assert_eq!(collabs[0].kind, CollaborationKind::Sponsorship);
        assert_eq!(collabs[0].sentiment, Sentiment::Positive);
    }

    #[test]
    fn low_engagement_brand_is_product_mention_negative() {
        let sets = single_set(vec![
            item("Post", "Nike post", 10, None),
            item("Post", "Nike other", 20, None),
        ]);
        let collabs = synthesize_collaborations(&sets, &default_brands());
        assert_eq!(collabs[0].kind, CollaborationKind::ProductMention);
        assert_eq!(collabs[0].sentiment, Sentiment::Negative);
    }

    #[test]
    fn reach_defaults_when_views_unknown() {
        let sets = single_set(vec![
            item("Post", "Nike a", 10, None),
            item("Post", "Nike b", 10, None),
        ]);
        let collabs = synthesize_collaborations(&sets, &default_brands());
        // 2 mentions x 1000 default reach.
        assert_eq!(collabs[0].reach, "2.0K");
    }

    #[test]
    fn no_qualifying_brand_emits_placeholder() {
        let sets = single_set(vec![item("Post", "nothing branded here", 10, None)]);
        let collabs = synthesize_collaborations(&sets, &default_brands());
        assert_eq!(collabs.len(), 1);
        assert_eq!(collabs[0].kind, CollaborationKind::ContentOpportunity);
        assert_eq!(collabs[0].content_count, 0);
    }

    #[test]
    fn brand_matching_is_case_insensitive_and_covers_hashtags() {
        let mut a = item("Post", "great shoes", 50, None);
        a.hashtags = vec!["NIKE".to_string()];
        let b = item("Post", "nike on foot", 50, None);
        let sets = single_set(vec![a, b]);
        let collabs = synthesize_collaborations(&sets, &default_brands());
        assert_eq!(collabs[0].name, "Nike");
        assert_eq!(collabs[0].content_count, 2);
    }

    #[test]
    fn synthesized_analysis_is_fully_populated() {
        let mut a = item("Video", "watch this", 500, Some(10_000));
        a.hashtags = vec!["fitness".to_string()];
        let mut b = item("Reel", "quick tip", 300, None);
        b.hashtags = vec!["fitness".to_string(), "wellness".to_string()];
        let sets = single_set(vec![a, b]);

        let analysis = synthesize_analysis(&sets);
        assert_eq!(analysis.key_themes[0], "fitness");
        assert_eq!(analysis.trending_topics[0], "#fitness");
        assert_eq!(analysis.content_types["videos"], 1);
        assert!(!analysis.sentiment_analysis.is_empty());
        assert!(!analysis.engagement_insights.is_empty());
        assert!(!analysis.recommendations.is_empty());
    }

    #[test]
    fn empty_set_synthesis_stays_renderable() {
        let sets: Vec<InfluencerContentSet> = Vec::new();
        let analysis = synthesize_analysis(&sets);
        assert_eq!(analysis.content_types.len(), 4);
        assert!(analysis.key_themes.is_empty());

        let insights = synthesize_platform_insights(&sets);
        assert!(insights.is_empty());

        assert!(fallback_summary(&sets).contains("0 content items"));
    }

    #[test]
    fn platform_insights_group_by_platform() {
        let mut yt = item("video", "long form", 1000, Some(40_000));
        yt.platform = Platform::Youtube;
        let sets = vec![
            InfluencerContentSet {
                platform: Platform::Youtube,
                influencer_name: "tech".to_string(),
                content: vec![yt],
            },
            InfluencerContentSet {
                platform: Platform::Instagram,
                influencer_name: "jane".to_string(),
                content: vec![item("Reel", "short", 200, None)],
            },
        ];
        let insights = synthesize_platform_insights(&sets);
        assert_eq!(insights.len(), 2);
        assert!(insights["youtube"].summary.contains("youtube"));
        assert_eq!(insights["youtube"].top_content_types, vec!["video"]);
        assert!(insights["instagram"]
            .engagement_trends
            .contains("200 interactions"));
    }

    #[test]
    fn key_findings_are_capped_and_non_empty() {
        let sets = single_set(vec![item("Video", "x", 100, None)]);
        let findings = fallback_key_findings(&sets);
        assert!(!findings.is_empty());
        assert!(findings.len() <= 7);
    }

    #[test]
    fn humanize_count_formats_magnitudes() {
        assert_eq!(humanize_count(850), "850");
        assert_eq!(humanize_count(45_300), "45.3K");
        assert_eq!(humanize_count(1_200_000), "1.2M");
    }
}
