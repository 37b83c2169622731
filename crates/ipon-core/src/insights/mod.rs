//! Insight Orchestrator
//!
//! Translates the computed numeric state into a small ordered list of
//! natural-language insight records. Generation is preferred, a deterministic
//! per-language fallback is guaranteed: the numeric state reaches the caller
//! no matter what the generative service does.
//!
//! ## Call sites
//!
//! - **Dashboard** - alert cards from balance and shortfall
//! - **Recommendations** - risk-aware advice with impact estimates
//! - **Budget Tips** - 50/30/20 coaching
//! - **Savings** - goal projections and contribution suggestions
//! - **Entry Tip** - one debounced tip while an expense is typed
//! - **Predictions** - data-driven spending forecasts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ipon_core::ai::GenAiClient;
//! use ipon_core::insights::{AnalysisContext, InsightEngine};
//!
//! let engine = InsightEngine::new(GenAiClient::from_env().expect("configured backend"));
//! let ctx = AnalysisContext::new(&snapshot, &overview);
//! let batches = engine.analyze_all(&ctx).await;
//! ```

pub mod budget_tips;
pub mod dashboard;
pub mod debounce;
pub mod engine;
pub mod entry_tip;
pub mod predictions;
pub mod recommendations;
pub mod savings;
pub mod types;

pub use budget_tips::BudgetTipsTask;
pub use dashboard::DashboardTask;
pub use debounce::{Debouncer, InsightSession, TriggerInput, DEFAULT_QUIET_PERIOD};
pub use engine::{AnalysisContext, InsightBatch, InsightEngine, InsightTask};
pub use entry_tip::{EntryRiskLevel, EntryTipTask, PredictedImpact};
pub use predictions::PredictionsTask;
pub use recommendations::RecommendationsTask;
pub use savings::SavingsTask;
pub use types::{Insight, InsightKind, InsightSource, TaskKind};
