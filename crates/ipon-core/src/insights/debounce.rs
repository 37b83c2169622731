//! Debounce and staleness control for insight evaluations
//!
//! Rapid input changes (per-keystroke amount edits, bursts of ledger pushes)
//! coalesce into a single evaluation after a quiet period. Each submission
//! bumps a generation counter; a submission that is superseded during the
//! quiet period resolves without ever touching the backend, and an evaluation
//! whose generation is no longer current when its call resolves is discarded
//! instead of overwriting newer state (last-trigger-wins).
//!
//! There is no hard cancellation of an in-flight network call, only disregard
//! of its result.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{Language, LedgerSnapshot};
use crate::overview::Overview;

use super::engine::{AnalysisContext, InsightBatch, InsightEngine, InsightTask};

/// Default quiet period before a pending evaluation fires
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1500);

struct Pending<T> {
    generation: u64,
    latest: Option<T>,
}

/// Coalesces rapid submissions into the most recent one
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Arc<Mutex<Pending<T>>>,
}

impl<T: Clone> Debouncer<T> {
    pub fn new() -> Self {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Arc::new(Mutex::new(Pending {
                generation: 0,
                latest: None,
            })),
        }
    }

    /// Submit a new input and wait out the quiet period
    ///
    /// Resolves to the surviving input and its generation stamp, or None when
    /// a later submission superseded this one before the period elapsed.
    pub async fn submit(&self, input: T) -> Option<(T, u64)> {
        let generation = {
            let mut pending = self.pending.lock().await;
            pending.generation += 1;
            pending.latest = Some(input);
            pending.generation
        };

        tokio::time::sleep(self.quiet).await;

        let pending = self.pending.lock().await;
        if pending.generation == generation {
            pending.latest.clone().map(|input| (input, generation))
        } else {
            debug!(generation, "Debounced submission superseded");
            None
        }
    }

    /// Whether a generation stamp still reflects the newest submission
    pub async fn is_current(&self, generation: u64) -> bool {
        self.pending.lock().await.generation == generation
    }
}

impl<T: Clone> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One trigger's immutable input: the snapshot and numeric state captured at
/// trigger time, plus the task instance for the call site
#[derive(Clone)]
pub struct TriggerInput {
    pub snapshot: Arc<LedgerSnapshot>,
    pub overview: Arc<Overview>,
    pub language: Language,
    pub task: Arc<dyn InsightTask>,
}

impl TriggerInput {
    pub fn new(
        snapshot: Arc<LedgerSnapshot>,
        overview: Arc<Overview>,
        task: Arc<dyn InsightTask>,
    ) -> Self {
        let language = snapshot
            .profile
            .as_ref()
            .map(|p| p.language)
            .unwrap_or_default();
        Self {
            snapshot,
            overview,
            language,
            task,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Debounced, staleness-checked evaluation loop for one trigger key
///
/// Submissions share one generation sequence, so a new trigger both cancels
/// pending quiet periods and marks any outstanding evaluation stale.
pub struct InsightSession {
    engine: InsightEngine,
    debouncer: Debouncer<TriggerInput>,
    latest: Mutex<Option<InsightBatch>>,
}

impl InsightSession {
    pub fn new(engine: InsightEngine) -> Self {
        Self::with_quiet_period(engine, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(engine: InsightEngine, quiet: Duration) -> Self {
        Self {
            engine,
            debouncer: Debouncer::with_quiet_period(quiet),
            latest: Mutex::new(None),
        }
    }

    /// Submit a changed input
    ///
    /// Resolves to the evaluated batch, or None when this submission was
    /// superseded during the quiet period or its result arrived stale.
    pub async fn submit(&self, input: TriggerInput) -> Option<InsightBatch> {
        let (input, generation) = self.debouncer.submit(input).await?;

        let ctx = AnalysisContext::new(&input.snapshot, &input.overview)
            .with_language(input.language);
        let batch = self.engine.evaluate(input.task.as_ref(), &ctx).await;

        if !self.debouncer.is_current(generation).await {
            warn!(task = %batch.task, generation, "Discarding stale insight result");
            return None;
        }

        let mut latest = self.latest.lock().await;
        *latest = Some(batch.clone());
        Some(batch)
    }

    /// Most recent batch that survived debounce and staleness checks
    pub async fn latest(&self) -> Option<InsightBatch> {
        self.latest.lock().await.clone()
    }

    pub fn engine(&self) -> &InsightEngine {
        &self.engine
    }
}
