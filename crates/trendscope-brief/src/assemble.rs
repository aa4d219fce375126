//! Brief assembly.
//!
//! The final, pure step: merge the parsed-or-synthesized analysis with
//! the caller-supplied period label and the generation timestamp.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use trendscope_core::{BrandCollaboration, ContentAnalysisResult, PlatformInsight, TrendBrief};

/// Analysis sections produced by the parser/synthesizer — a
/// [`TrendBrief`] minus `period` and `generated_at`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BriefAnalysis {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub platform_insights: BTreeMap<String, PlatformInsight>,
    pub content_analysis: ContentAnalysisResult,
    pub actionable_recommendations: Vec<String>,
    pub brand_collaborations: Vec<BrandCollaboration>,
}

/// Produce the final brief. Pure: the timestamp is supplied by the
/// caller, not read from a clock.
#[must_use]
pub fn assemble(analysis: BriefAnalysis, period: &str, generated_at: DateTime<Utc>) -> TrendBrief {
    let mut key_findings = analysis.key_findings;
    key_findings.truncate(7);

    TrendBrief {
        summary: analysis.summary,
        period: period.to_string(),
        key_findings,
        platform_insights: analysis.platform_insights,
        content_analysis: analysis.content_analysis,
        actionable_recommendations: analysis.actionable_recommendations,
        brand_collaborations: analysis.brand_collaborations,
        generated_at,
    }
}
