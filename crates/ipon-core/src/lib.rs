//! Ipon Core Library
//!
//! Computation core for the Ipon personal cash-flow tool:
//! - Recurrence projector expanding recurring transactions into weekly forecasts
//! - Windowed aggregation with category ranking and trends
//! - Risk and health scoring
//! - Percentage-based budget allocation with a 50/30/20 baseline
//! - Savings goal projection
//! - Pluggable generative text backends (Gemini, mock)
//! - Insight orchestration with debounce, staleness control, and deterministic
//!   fallbacks
//!
//! Screen rendering, navigation, persistence, and authentication live in the
//! surrounding application layers; this crate only consumes their snapshots
//! and hands back plain data.

pub mod aggregate;
pub mod ai;
pub mod budget;
pub mod error;
pub mod forecast;
pub mod goals;
pub mod insights;
pub mod models;
pub mod overview;
pub mod score;

pub use aggregate::{aggregate as aggregate_window, AggregateSnapshot, CategoryTotal};
pub use ai::{extract_json_array, GenAiClient, GeminiBackend, GenerativeBackend, MockBackend};
pub use budget::{
    allocate, default_allocation, fifty_thirty_twenty, Allocation, BudgetLine, BudgetReport,
    BudgetStatus, SplitPlan,
};
pub use error::{Error, Result};
pub use forecast::{
    project, shortfall, upcoming_challenges, weekly_equivalent, ChallengeSeverity,
    UpcomingChallenge,
};
pub use goals::{project_goals, weekly_spare, GoalProjection, GoalStatus};
pub use insights::{
    AnalysisContext, BudgetTipsTask, DashboardTask, Debouncer, EntryRiskLevel, EntryTipTask,
    Insight, InsightBatch, InsightEngine, InsightKind, InsightSession, InsightSource, InsightTask,
    PredictedImpact, PredictionsTask, RecommendationsTask, SavingsTask, TaskKind, TriggerInput,
};
pub use models::{
    ForecastPoint, Frequency, Language, LedgerSnapshot, Profile, SavingsGoal, Transaction,
};
pub use overview::Overview;
pub use score::{confidence_level, health_score, risk_ratio};
