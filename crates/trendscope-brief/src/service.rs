//! Pipeline orchestration.
//!
//! `TrendBriefService` wires the stages together: normalize → gate on
//! the refresh policy → prompt → generate → parse/fallback → assemble,
//! persisting the last-generated timestamp on every accepted
//! generation.
//!
//! Concurrency discipline: at most one generation call is in flight. A
//! request arriving while one is outstanding does not queue — it is
//! satisfied from the canned demo path immediately and does not touch
//! the timestamp. Requests that do win the lock are additionally spaced
//! by the minimum-interval rate limiter.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use trendscope_core::{BrandKeyword, InfluencerContentSet, TrendBrief};
use trendscope_genai::{demo_brief_json, GenerationClient, GenerationRequest, RateLimiter};

use crate::alerts::{scan_alerts, AlertThresholds};
use crate::assemble::assemble;
use crate::error::BriefError;
use crate::normalize::normalize_batch;
use crate::parse::parse_brief;
use crate::prompt::{build_brief_prompt, build_query_prompt};
use crate::refresh::{RefreshDecision, RefreshPolicy, TimestampStore};

/// Fewer breaches than this triggers the AI sentiment augmentation.
const ALERT_AI_AUGMENT_BELOW: usize = 3;

/// Result of a brief request: a new brief, or confirmation that the
/// existing one is still within its refresh interval.
#[derive(Debug)]
pub enum BriefOutcome {
    Generated(TrendBrief),
    Skipped {
        last_generated_at: DateTime<Utc>,
        next_due_at: DateTime<Utc>,
    },
}

pub struct TrendBriefService {
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn TimestampStore>,
    policy: RefreshPolicy,
    limiter: RateLimiter,
    brands: Vec<BrandKeyword>,
    content: RwLock<Vec<InfluencerContentSet>>,
    in_flight: Mutex<()>,
}

impl TrendBriefService {
    #[must_use]
    pub fn new(
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn TimestampStore>,
        policy: RefreshPolicy,
        min_request_interval: Duration,
        brands: Vec<BrandKeyword>,
    ) -> Self {
        Self {
            client,
            store,
            policy,
            limiter: RateLimiter::new(min_request_interval),
            brands,
            content: RwLock::new(Vec::new()),
            in_flight: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Normalize a raw influencer batch and store the canonical set for
    /// subsequent brief, query, and alert requests. Returns the number
    /// of canonical content items.
    pub fn load_content(&self, batch: &[Value]) -> usize {
        let sets = normalize_batch(batch);
        let item_count: usize = sets.iter().map(|s| s.content.len()).sum();
        tracing::info!(
            influencers = sets.len(),
            items = item_count,
            "canonical content set loaded"
        );
        *self.content.write().expect("content lock poisoned") = sets;
        item_count
    }

    /// Snapshot the stored canonical set, failing when there is nothing
    /// to analyze.
    fn snapshot(&self) -> Result<Vec<InfluencerContentSet>, BriefError> {
        let sets = self.content.read().expect("content lock poisoned").clone();
        if sets.iter().all(|s| s.content.is_empty()) {
            return Err(BriefError::NotInitialized);
        }
        Ok(sets)
    }

    /// Generate (or decline to generate) a trend brief.
    ///
    /// Non-forced requests are gated by the refresh policy; `force`
    /// bypasses the cooldown deliberately and still resets the
    /// timestamp. Endpoint failures never surface here — the canned
    /// demo brief stands in.
    ///
    /// # Errors
    ///
    /// [`BriefError::NotInitialized`] when no content is loaded;
    /// [`BriefError::Store`] when the timestamp store fails.
    pub async fn generate_brief(
        &self,
        timeframe: &str,
        force: bool,
    ) -> Result<BriefOutcome, BriefError> {
        let sets = self.snapshot()?;

        if !force {
            let last = self.store.load()?;
            if let RefreshDecision::Fresh { age } = self.policy.assess(last, Utc::now()) {
                let last_generated_at = last.expect("Fresh implies a stored timestamp");
                tracing::debug!(age_minutes = age.num_minutes(), "brief still fresh — skipping generation");
                return Ok(BriefOutcome::Skipped {
                    last_generated_at,
                    next_due_at: self.policy.next_due(last_generated_at),
                });
            }
        }

        // Single flight: a concurrent request gets the canned demo
        // brief instead of queueing, and leaves the timestamp alone.
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("generation already in flight — serving canned demo brief");
            let analysis = parse_brief(&demo_brief_json(), &sets, &self.brands);
            return Ok(BriefOutcome::Generated(assemble(
                analysis,
                timeframe,
                Utc::now(),
            )));
        };

        self.limiter.acquire().await;

        let request = GenerationRequest::brief(build_brief_prompt(&sets, timeframe));
        let raw = match self.client.generate(&request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed — serving canned demo brief");
                demo_brief_json()
            }
        };

        let analysis = parse_brief(&raw, &sets, &self.brands);
        let generated_at = Utc::now();
        let brief = assemble(analysis, timeframe, generated_at);

        self.store.save(generated_at)?;
        tracing::info!(%generated_at, "trend brief generated");

        Ok(BriefOutcome::Generated(brief))
    }

    /// Answer a free-form question over the stored content set.
    ///
    /// Returns the model's raw text. Unlike brief generation, a
    /// non-rate-limit endpoint failure propagates to the caller.
    ///
    /// # Errors
    ///
    /// [`BriefError::NotInitialized`] when no content is loaded;
    /// [`BriefError::Generation`] when the endpoint reports an error
    /// status.
    pub async fn query(&self, question: &str) -> Result<String, BriefError> {
        let sets = self.snapshot()?;

        let request = GenerationRequest::query(build_query_prompt(&sets, question), question);

        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("generation already in flight — serving canned answer");
            return Ok(trendscope_genai::canned_answer(question));
        };

        self.limiter.acquire().await;
        let answer = self.client.generate(&request).await?;
        Ok(answer)
    }

    /// Scan the stored content for threshold breaches.
    ///
    /// When fewer than three breaches fire, one AI-generated sentiment
    /// alert is appended best-effort; failures there are logged and
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`BriefError::NotInitialized`] when no content is loaded.
    pub async fn alerts(
        &self,
        thresholds: &AlertThresholds,
    ) -> Result<Vec<String>, BriefError> {
        let sets = self.snapshot()?;
        let mut alerts = scan_alerts(&sets, thresholds);

        if alerts.len() < ALERT_AI_AUGMENT_BELOW {
            if let Some(augmented) = self.sentiment_alert(&sets).await {
                alerts.push(augmented);
            }
        }

        Ok(alerts)
    }

    /// Best-effort AI sentiment line for quiet alert periods.
    async fn sentiment_alert(&self, sets: &[InfluencerContentSet]) -> Option<String> {
        let question = "Summarize the current audience sentiment across this content in one sentence.";
        let request = GenerationRequest::query(build_query_prompt(sets, question), question);

        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("generation in flight — skipping sentiment alert");
            return None;
        };

        self.limiter.acquire().await;
        match self.client.generate(&request).await {
            Ok(text) => Some(format!("Sentiment check: {}", text.trim())),
            Err(e) => {
                tracing::warn!(error = %e, "sentiment alert generation failed — omitting");
                None
            }
        }
    }
}
