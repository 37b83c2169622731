//! 50/30/20 budget coaching tips
//!
//! Generates coaching tips from the needs/wants/savings rollup. The advisory
//! allocation-sum warning is computed locally and surfaced alongside whatever
//! the generative step produced, so it survives a degraded call.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Language;

use super::engine::{AnalysisContext, InsightTask};
use super::types::{Insight, InsightKind, TaskKind};

pub struct BudgetTipsTask;

impl BudgetTipsTask {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BudgetTipsTask {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TipRow {
    icon: String,
    text: String,
    #[serde(rename = "type")]
    kind: String,
}

impl InsightTask for BudgetTipsTask {
    fn kind(&self) -> TaskKind {
        TaskKind::BudgetTips
    }

    fn name(&self) -> &'static str {
        "Budget Tips"
    }

    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String> {
        let plan = ctx.overview.split_plan.as_ref()?;

        Some(format!(
            "You are a friendly and strategic Filipino financial coach for an app called Ipon.\n\
             Analyze the user's budget based on the 50/30/20 rule and generate 2-3 concise, \
             actionable tips.\n\
             The user's preferred language is {language}. Respond in that language.\n\
             \n\
             Context (50/30/20 Rule):\n\
             - Needs (50%): Allocated \u{20b1}{needs_alloc:.0}, Spent \u{20b1}{needs_spent:.0}\n\
             - Wants (30%): Allocated \u{20b1}{wants_alloc:.0}, Spent \u{20b1}{wants_spent:.0}\n\
             - Savings (20%): Target \u{20b1}{savings_target:.0}, Achieved \u{20b1}{savings_actual:.0}\n\
             \n\
             Instructions:\n\
             - Return only a JSON array of 2-3 tip objects, with no other text.\n\
             - Each object must have 'icon' (an emoji), 'text' (the tip), and 'type' ('warning', \
             'critical', 'info', 'success').\n\
             - If 'Wants' spending is over budget, create a 'warning' tip about it.\n\
             - If 'Needs' spending is over budget, create a 'critical' tip about it.\n\
             - If 'Savings' are below target but positive, create an encouraging 'info' tip.\n\
             - If the user is doing great on all fronts, provide a 'success' tip congratulating \
             them.\n\
             - Make the tips specific and creative. Instead of \"cut back\", suggest \"try a \
             cheaper brand\" or \"look for free entertainment options\".",
            language = ctx.language.prompt_name(),
            needs_alloc = plan.needs.allocated,
            needs_spent = plan.needs.actual,
            wants_alloc = plan.wants.allocated,
            wants_spent = plan.wants.actual,
            savings_target = plan.savings.allocated,
            savings_actual = plan.savings.actual,
        ))
    }

    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>> {
        let rows: Vec<TipRow> = serde_json::from_value(payload.clone())?;

        rows.into_iter()
            .map(|row| {
                let kind = match row.kind.as_str() {
                    "warning" => InsightKind::Warning,
                    "critical" => InsightKind::Critical,
                    "info" | "success" => InsightKind::Info,
                    other => {
                        return Err(Error::InvalidResponse(format!("Unknown tip type: {}", other)))
                    }
                };
                Ok(Insight::new(kind, format!("{} {}", row.icon, row.text)))
            })
            .collect()
    }

    fn fallback(&self, language: Language) -> Insight {
        let text = match language {
            Language::En => "Could not get AI tips at the moment. Please check your connection.",
            Language::Fil => "Hindi makakuha ng AI tips sa ngayon. Pakisuri ang inyong koneksyon.",
        };
        Insight::fallback(InsightKind::Warning, text)
    }

    /// The advisory sum-to-100 warning; the allocation is never rejected
    fn local_insights(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let budget = &ctx.overview.budget;
        if budget.balanced {
            return Vec::new();
        }

        let text = match ctx.language {
            Language::En => format!(
                "Your budget allocation is {:.0}%. Adjust to reach 100%.",
                budget.total_percentage
            ),
            Language::Fil => format!(
                "Ang inyong budget allocation ay {:.0}%. I-adjust upang maabot ang 100%.",
                budget.total_percentage
            ),
        };
        vec![Insight::fallback(InsightKind::Warning, text)]
    }
}
