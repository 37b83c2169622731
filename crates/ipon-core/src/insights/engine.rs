//! Insight engine - one orchestrator for every call site
//!
//! Each call site used to re-implement the same flow: build a prompt from the
//! numeric state, invoke the generative service, clean and parse the
//! response, and fall back to a canned message when anything goes wrong. The
//! engine implements that flow once; call sites only supply an [`InsightTask`]
//! with their prompt builder, response schema, and fallback text.
//!
//! A failed or malformed generation degrades to exactly one fallback insight.
//! The numeric state in the [`AnalysisContext`] is computed before any
//! generative call and is never affected by one.

use tracing::{debug, warn};

use crate::ai::{extract_json_array, GenAiClient, GenerativeBackend};
use crate::error::Result;
use crate::models::{Language, LedgerSnapshot};
use crate::overview::Overview;

use super::types::{Insight, InsightKind, InsightSource, TaskKind};
use super::{
    BudgetTipsTask, DashboardTask, PredictionsTask, RecommendationsTask, SavingsTask,
};

/// Immutable inputs for one evaluation, captured at trigger time
pub struct AnalysisContext<'a> {
    /// Ledger snapshot the evaluation runs against
    pub snapshot: &'a LedgerSnapshot,
    /// Numeric state computed from the snapshot
    pub overview: &'a Overview,
    /// Output language for generated text
    pub language: Language,
}

impl<'a> AnalysisContext<'a> {
    /// Create a context, taking the language from the profile when present
    pub fn new(snapshot: &'a LedgerSnapshot, overview: &'a Overview) -> Self {
        let language = snapshot
            .profile
            .as_ref()
            .map(|p| p.language)
            .unwrap_or_default();
        Self {
            snapshot,
            overview,
            language,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// One insight call site: prompt builder, response validator, fallback
pub trait InsightTask: Send + Sync {
    /// Trigger key for debounce and staleness tracking
    fn kind(&self) -> TaskKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Build the prompt for this context
    ///
    /// Returning None means the inputs are incomplete; the evaluation
    /// short-circuits to an idle empty result without touching the backend.
    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String>;

    /// Validate and convert the parsed JSON array into insight records
    ///
    /// Any missing required field fails the whole call; there is no partial
    /// acceptance of individual array elements.
    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>>;

    /// Deterministic insight substituted when generation or validation fails
    fn fallback(&self, language: Language) -> Insight;

    /// Locally computed insights appended regardless of the generative
    /// outcome (e.g. advisory warnings derived from the numeric state)
    fn local_insights(&self, _ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        Vec::new()
    }
}

/// Result of evaluating one task
#[derive(Debug, Clone)]
pub struct InsightBatch {
    pub task: TaskKind,
    pub insights: Vec<Insight>,
}

impl InsightBatch {
    fn idle(task: TaskKind) -> Self {
        Self {
            task,
            insights: Vec::new(),
        }
    }

    /// True when incomplete inputs short-circuited the evaluation
    pub fn is_idle(&self) -> bool {
        self.insights.is_empty()
    }
}

/// The insight orchestrator
///
/// Holds an injected generative client; construct one per composition root
/// rather than sharing a global.
pub struct InsightEngine {
    client: GenAiClient,
    tasks: Vec<Box<dyn InsightTask>>,
}

impl InsightEngine {
    /// Create an engine with the built-in snapshot-driven tasks registered
    ///
    /// The entry tip task is not registered by default because it exists per
    /// draft expense; use [`InsightSession`](super::InsightSession) for it.
    pub fn new(client: GenAiClient) -> Self {
        let mut engine = Self::bare(client);
        engine.register(Box::new(DashboardTask::new()));
        engine.register(Box::new(RecommendationsTask::new()));
        engine.register(Box::new(BudgetTipsTask::new()));
        engine.register(Box::new(SavingsTask::new()));
        engine.register(Box::new(PredictionsTask::new()));
        engine
    }

    /// Create an engine with no registered tasks
    pub fn bare(client: GenAiClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
        }
    }

    /// Register an additional task
    pub fn register(&mut self, task: Box<dyn InsightTask>) {
        self.tasks.push(task);
    }

    /// Get the underlying client
    pub fn client(&self) -> &GenAiClient {
        &self.client
    }

    /// Kinds of all registered tasks
    pub fn task_kinds(&self) -> Vec<TaskKind> {
        self.tasks.iter().map(|t| t.kind()).collect()
    }

    /// Evaluate a single task against a context
    ///
    /// Never returns an error: external-service failures degrade to the
    /// task's fallback insight and incomplete inputs yield an idle batch.
    pub async fn evaluate(&self, task: &dyn InsightTask, ctx: &AnalysisContext<'_>) -> InsightBatch {
        let Some(prompt) = task.build_prompt(ctx) else {
            debug!(task = %task.kind(), "Inputs incomplete, skipping generation");
            return InsightBatch::idle(task.kind());
        };

        let mut insights = match self.generate_insights(task, &prompt, ctx).await {
            Ok(insights) => insights,
            Err(e) => {
                warn!(task = %task.kind(), error = %e, "Generation failed, using fallback");
                let mut fallback = task.fallback(ctx.language);
                fallback.source = InsightSource::Fallback;
                fallback.seen = false;
                vec![fallback]
            }
        };

        insights.extend(task.local_insights(ctx));

        InsightBatch {
            task: task.kind(),
            insights,
        }
    }

    /// Evaluate every registered task in registration order
    pub async fn analyze_all(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightBatch> {
        let mut batches = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let batch = self.evaluate(task.as_ref(), ctx).await;
            debug!(
                task = %batch.task,
                count = batch.insights.len(),
                "Insight evaluation complete"
            );
            batches.push(batch);
        }
        batches
    }

    async fn generate_insights(
        &self,
        task: &dyn InsightTask,
        prompt: &str,
        ctx: &AnalysisContext<'_>,
    ) -> Result<Vec<Insight>> {
        let raw = self.client.generate(prompt).await?;
        debug!(task = %task.kind(), raw_len = raw.len(), "Generative response received");

        let payload = extract_json_array(&raw)?;
        let insights = task.parse(&payload)?;
        Ok(normalize(insights, ctx))
    }
}

/// Normalize generated insights into the record shape handed to callers
///
/// Sets the source tag, initializes the seen flag, strips goal references
/// from non-suggestions, and drops suggestions whose goal reference no
/// longer resolves against the snapshot.
fn normalize(insights: Vec<Insight>, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
    insights
        .into_iter()
        .filter_map(|mut insight| {
            insight.source = InsightSource::Generated;
            insight.seen = false;

            if insight.kind == InsightKind::Suggestion {
                if let Some(ref goal_id) = insight.target_goal_id {
                    if ctx.snapshot.goal(goal_id).is_none() {
                        warn!(goal_id = %goal_id, "Dropping suggestion with unresolved goal");
                        return None;
                    }
                }
            } else {
                insight.target_goal_id = None;
            }

            Some(insight)
        })
        .collect()
}
