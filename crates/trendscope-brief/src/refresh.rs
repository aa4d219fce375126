//! Refresh policy and state.
//!
//! The "last generated" timestamp is explicit state owned by the caller
//! and persisted through the [`TimestampStore`] port — there is no
//! hidden global. Policy assessment is a pure function of the stored
//! timestamp and an injected `now`, so gating is testable without a
//! clock. [`AutoRefresh`] schedules the periodic staleness check and is
//! cancelled on shutdown.

use std::sync::Arc;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::service::{BriefOutcome, TrendBriefService};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timestamp store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored timestamp: {0}")]
    Invalid(String),
}

/// Persistence port for the last-generated timestamp.
///
/// The production adapter writes one ISO-8601 line under the fixed key
/// `last-generated-timestamp`; tests use [`MemoryStore`].
pub trait TimestampStore: Send + Sync {
    /// `None` until the first successful generation.
    fn load(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn save(&self, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn preloaded(at: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(Some(at)),
        }
    }
}

impl TimestampStore for MemoryStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(*self.inner.lock().expect("memory store lock poisoned"))
    }

    fn save(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        *self.inner.lock().expect("memory store lock poisoned") = Some(at);
        Ok(())
    }
}

/// Where the brief stands relative to the refresh interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    NeverGenerated,
    Fresh { age: Duration },
    Stale { age: Duration },
}

impl RefreshDecision {
    /// True for every state except `Fresh`.
    #[must_use]
    pub fn must_generate(&self) -> bool {
        !matches!(self, RefreshDecision::Fresh { .. })
    }
}

/// Time-based refresh gating.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    interval: Duration,
}

impl RefreshPolicy {
    #[must_use]
    pub fn hours(hours: i64) -> Self {
        Self {
            interval: Duration::hours(hours),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Assess staleness. `Stale` at exactly `interval` elapsed.
    #[must_use]
    pub fn assess(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> RefreshDecision {
        match last {
            None => RefreshDecision::NeverGenerated,
            Some(at) => {
                let age = now - at;
                if age >= self.interval {
                    RefreshDecision::Stale { age }
                } else {
                    RefreshDecision::Fresh { age }
                }
            }
        }
    }

    #[must_use]
    pub fn next_due(&self, last: DateTime<Utc>) -> DateTime<Utc> {
        last + self.interval
    }
}

/// Periodic staleness check driving scheduled generation.
///
/// The job fires every refresh interval and generates only when the
/// policy reports `Stale` (non-forced generation is gated inside the
/// service). Keep the handle alive for the lifetime of the process;
/// [`AutoRefresh::shutdown`] cancels the recurring job.
pub struct AutoRefresh {
    scheduler: JobScheduler,
}

impl AutoRefresh {
    /// Builds and starts the scheduler with one repeated job.
    ///
    /// # Errors
    ///
    /// Returns [`JobSchedulerError`] if the scheduler cannot be
    /// initialised or started.
    pub async fn start(
        service: Arc<TrendBriefService>,
        timeframe: String,
        period: std::time::Duration,
    ) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_repeated_async(period, move |_uuid, _lock| {
            let service = Arc::clone(&service);
            let timeframe = timeframe.clone();
            Box::pin(async move {
                match service.generate_brief(&timeframe, false).await {
                    Ok(BriefOutcome::Generated(_)) => {
                        tracing::info!("auto-refresh generated a new trend brief");
                    }
                    Ok(BriefOutcome::Skipped { next_due_at, .. }) => {
                        tracing::debug!(%next_due_at, "auto-refresh check — brief still fresh");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "auto-refresh generation failed");
                    }
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;
        Ok(Self { scheduler })
    }

    /// Cancels the recurring job and tears down the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`JobSchedulerError`] if shutdown fails.
    pub async fn shutdown(mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_generated_until_first_save() {
        let policy = RefreshPolicy::hours(24);
        let decision = policy.assess(None, Utc::now());
        assert_eq!(decision, RefreshDecision::NeverGenerated);
        assert!(decision.must_generate());
    }

    #[test]
    fn fresh_within_interval() {
        let policy = RefreshPolicy::hours(24);
        let now = Utc::now();
        let decision = policy.assess(Some(now - Duration::hours(23)), now);
        assert!(matches!(decision, RefreshDecision::Fresh { .. }));
        assert!(!decision.must_generate());
    }

    #[test]
    fn stale_at_and_past_interval() {
        let policy = RefreshPolicy::hours(24);
        let now = Utc::now();
        assert!(matches!(
            policy.assess(Some(now - Duration::hours(24)), now),
            RefreshDecision::Stale { .. }
        ));
        assert!(matches!(
            policy.assess(Some(now - Duration::hours(25)), now),
            RefreshDecision::Stale { .. }
        ));
    }

    #[test]
    fn next_due_adds_the_interval() {
        let policy = RefreshPolicy::hours(6);
        let last = Utc::now();
        assert_eq!(policy.next_due(last), last + Duration::hours(6));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        let at = Utc::now();
        store.save(at).unwrap();
        assert_eq!(store.load().unwrap(), Some(at));
    }
}
