//! Engagement alerts.
//!
//! Pure threshold scan over the canonical content set. One alert string
//! per breach: an item can trip both the engagement-rate check and the
//! view-count check. The optional AI sentiment augmentation lives in
//! the service layer.

use trendscope_core::InfluencerContentSet;

/// Breach thresholds for the alert scan.
#[derive(Debug, Clone, Copy)]
pub struct AlertThresholds {
    /// Engagement rate, percent, at or above which an item alerts.
    /// Rate = (likes + comments) / views × 100; items with no view
    /// count are skipped for this check.
    pub engagement_rate_pct: f64,
    /// View count at or above which an item alerts.
    pub min_views: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            engagement_rate_pct: 5.0,
            min_views: 100_000,
        }
    }
}

/// Scan every item for threshold breaches.
#[must_use]
pub fn scan_alerts(sets: &[InfluencerContentSet], thresholds: &AlertThresholds) -> Vec<String> {
    let mut alerts = Vec::new();

    for set in sets {
        for item in &set.content {
            let interactions = item.engagement.interactions();

            if let Some(views) = item.engagement.views.filter(|v| *v > 0) {
                #[allow(clippy::cast_precision_loss)]
                let rate = interactions as f64 / views as f64 * 100.0;
                if rate >= thresholds.engagement_rate_pct {
                    alerts.push(format!(
                        "High engagement rate: {}'s {} is at {:.1}% ({} likes, {} comments on {} views)",
                        set.influencer_name,
                        item.content_type,
                        rate,
                        item.engagement.likes,
                        item.engagement.comments,
                        views
                    ));
                }
                if views >= thresholds.min_views {
                    alerts.push(format!(
                        "View spike: {}'s {} reached {} views",
                        set.influencer_name, item.content_type, views
                    ));
                }
            }
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_core::{ContentItem, Engagement, Platform};

    fn set_with(items: Vec<(u64, u64, Option<u64>)>) -> Vec<InfluencerContentSet> {
        let content = items
            .into_iter()
            .map(|(likes, comments, views)| ContentItem {
                platform: Platform::Instagram,
                influencer_name: "jane".to_string(),
                title: None,
                caption: None,
                hashtags: vec![],
                mentions: vec![],
                engagement: Engagement {
                    likes,
                    comments,
                    views,
                    shares: None,
                },
                timestamp: String::new(),
                content_type: "Reel".to_string(),
            })
            .collect();
        vec![InfluencerContentSet {
            platform: Platform::Instagram,
            influencer_name: "jane".to_string(),
            content,
        }]
    }

    #[test]
    fn engagement_rate_breach_alerts() {
        // 600 interactions on 10_000 views = 6%.
        let sets = set_with(vec![(500, 100, Some(10_000))]);
        let alerts = scan_alerts(&sets, &AlertThresholds::default());
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("High engagement rate"));
        assert!(alerts[0].contains("6.0%"));
    }

    #[test]
    fn view_spike_breach_alerts() {
        let sets = set_with(vec![(10, 0, Some(250_000))]);
        let alerts = scan_alerts(&sets, &AlertThresholds::default());
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("View spike"));
    }

    #[test]
    fn one_item_can_breach_both_thresholds() {
        // 6% rate AND above the view floor.
        let sets = set_with(vec![(12_000, 0, Some(200_000))]);
        let alerts = scan_alerts(&sets, &AlertThresholds::default());
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn items_without_views_are_skipped() {
        let sets = set_with(vec![(1_000_000, 0, None)]);
        let alerts = scan_alerts(&sets, &AlertThresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn quiet_content_produces_no_alerts() {
        let sets = set_with(vec![(10, 1, Some(50_000))]);
        let alerts = scan_alerts(&sets, &AlertThresholds::default());
        assert!(alerts.is_empty());
    }
}
