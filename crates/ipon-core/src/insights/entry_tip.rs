//! Single tip while an expense is being entered
//!
//! This is the per-keystroke call site: the draft amount changes with every
//! edit, so callers run it through an [`InsightSession`](super::InsightSession)
//! to debounce. The predicted budget impact is computed locally and stays
//! available even when the generative step degrades.

use serde::{Deserialize, Serialize};

use crate::budget::BudgetLine;
use crate::error::Result;
use crate::models::Language;

use super::engine::{AnalysisContext, InsightTask};
use super::types::{Insight, InsightKind, TaskKind};

/// Budget usage above this share triggers the local warning insight
const BUDGET_WARNING_THRESHOLD: f64 = 85.0;

/// Qualitative risk of one draft expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRiskLevel {
    Low,
    Medium,
    High,
}

/// Locally computed effect of the draft expense on its category budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedImpact {
    /// Budget usage after the draft expense, in percent
    pub budget_usage: f64,
    /// Budget left after the draft expense; negative when exceeded
    pub remaining_budget: f64,
    pub risk_level: EntryRiskLevel,
}

/// One draft expense as typed into the entry form
pub struct EntryTipTask {
    /// Raw amount text; unparseable or non-positive input is incomplete
    amount: String,
    category_id: String,
}

impl EntryTipTask {
    pub fn new(amount: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            category_id: category_id.into(),
        }
    }

    fn parsed_amount(&self) -> Option<f64> {
        let amount: f64 = self.amount.trim().parse().ok()?;
        (amount.is_finite() && amount > 0.0).then_some(amount)
    }

    fn budget_line<'a>(&self, ctx: &'a AnalysisContext<'_>) -> Option<&'a BudgetLine> {
        ctx.overview
            .budget
            .lines
            .iter()
            .find(|l| l.category_id == self.category_id)
    }

    /// Predicted impact of the draft on its category budget
    ///
    /// None when the draft is incomplete or the category has no budget line.
    pub fn predicted_impact(&self, ctx: &AnalysisContext<'_>) -> Option<PredictedImpact> {
        let amount = self.parsed_amount()?;
        let line = self.budget_line(ctx)?;

        let new_spent = line.spent + amount;
        let budget_usage = if line.budget_amount > 0.0 {
            new_spent / line.budget_amount * 100.0
        } else {
            0.0
        };
        let risk_level = if budget_usage > 90.0 {
            EntryRiskLevel::High
        } else if budget_usage > 70.0 {
            EntryRiskLevel::Medium
        } else {
            EntryRiskLevel::Low
        };

        Some(PredictedImpact {
            budget_usage,
            remaining_budget: line.budget_amount - new_spent,
            risk_level,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TipRow {
    text: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl InsightTask for EntryTipTask {
    fn kind(&self) -> TaskKind {
        TaskKind::EntryTip
    }

    fn name(&self) -> &'static str {
        "Expense Entry Tip"
    }

    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String> {
        let amount = self.parsed_amount()?;
        let line = self.budget_line(ctx)?;
        let impact = self.predicted_impact(ctx)?;

        Some(format!(
            "You are a friendly Filipino financial assistant for an app called Ipon. A user is \
             about to log an expense. Provide a single, concise, and actionable tip or insight \
             based on their situation. The user's preferred language is {language}. Respond in \
             that language.\n\
             \n\
             Context:\n\
             - Expense Amount: \u{20b1}{amount:.0}\n\
             - Category: {category}\n\
             - Budget for this category: \u{20b1}{budget:.0}\n\
             - Amount already spent in this category: \u{20b1}{spent:.0}\n\
             - Budget usage after this expense: {usage:.0}%\n\
             \n\
             Instructions:\n\
             - Return only a JSON array with exactly one object, with no other text and no \
             markdown.\n\
             - The object must have 'type' ('tip') and 'text' (a single sentence).",
            language = ctx.language.prompt_name(),
            amount = amount,
            category = line.category_id,
            budget = line.budget_amount,
            spent = line.spent,
            usage = impact.budget_usage,
        ))
    }

    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>> {
        let rows: Vec<TipRow> = serde_json::from_value(payload.clone())?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let kind = match row.kind.as_deref() {
                    Some("warning") => InsightKind::Warning,
                    _ => InsightKind::Info,
                };
                Insight::new(kind, row.text)
            })
            .collect())
    }

    fn fallback(&self, language: Language) -> Insight {
        let text = match language {
            Language::En => "Could not get an AI suggestion right now.",
            Language::Fil => "Hindi makakuha ng AI suggestion sa ngayon.",
        };
        Insight::fallback(InsightKind::Warning, text)
    }

    /// Deterministic warning when the draft pushes the category near its cap
    fn local_insights(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let Some(impact) = self.predicted_impact(ctx) else {
            return Vec::new();
        };
        if impact.budget_usage <= BUDGET_WARNING_THRESHOLD {
            return Vec::new();
        }

        let text = match ctx.language {
            Language::En => format!(
                "This expense will use {:.0}% of your '{}' budget!",
                impact.budget_usage, self.category_id
            ),
            Language::Fil => format!(
                "Ang gastong ito ay gagamitin ang {:.0}% ng inyong '{}' budget!",
                impact.budget_usage, self.category_id
            ),
        };
        vec![Insight::fallback(InsightKind::Warning, text)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::default_allocation;
    use crate::models::{LedgerSnapshot, Profile, Transaction};
    use crate::overview::Overview;
    use chrono::{TimeZone, Utc};

    fn fixture() -> (LedgerSnapshot, Overview) {
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let snapshot = LedgerSnapshot {
            profile: Some(Profile {
                monthly_income: 10000.0,
                payday: "30th".to_string(),
                family_size: 3,
                language: Language::En,
            }),
            income: vec![Transaction::once(10000.0, "salary", now)],
            // food budget is 30% of 10000 = 3000; 2500 already spent
            expenses: vec![Transaction::once(2500.0, "food", now)],
            goals: vec![],
            initial_balance: 0.0,
        };
        let overview = Overview::compute(&snapshot, &default_allocation(), now, 4);
        (snapshot, overview)
    }

    #[test]
    fn test_incomplete_draft_is_idle() {
        let (snapshot, overview) = fixture();
        let ctx = AnalysisContext::new(&snapshot, &overview);

        for (amount, category) in [("", "food"), ("abc", "food"), ("0", "food"), ("100", "nope")] {
            let task = EntryTipTask::new(amount, category);
            assert!(task.build_prompt(&ctx).is_none(), "{}/{}", amount, category);
            assert!(task.predicted_impact(&ctx).is_none());
        }
    }

    #[test]
    fn test_predicted_impact_levels() {
        let (snapshot, overview) = fixture();
        let ctx = AnalysisContext::new(&snapshot, &overview);

        // 2500 + 100 = 2600 of 3000 -> 86.7%, medium risk
        let impact = EntryTipTask::new("100", "food")
            .predicted_impact(&ctx)
            .unwrap();
        assert_eq!(impact.risk_level, EntryRiskLevel::Medium);
        assert!((impact.remaining_budget - 400.0).abs() < 1e-9);

        // 2500 + 300 = 2800 of 3000 -> 93.3%, high risk
        let impact = EntryTipTask::new("300", "food")
            .predicted_impact(&ctx)
            .unwrap();
        assert_eq!(impact.risk_level, EntryRiskLevel::High);

        // Transport budget untouched: 50 of 1000 -> low risk
        let impact = EntryTipTask::new("50", "transport")
            .predicted_impact(&ctx)
            .unwrap();
        assert_eq!(impact.risk_level, EntryRiskLevel::Low);
    }

    #[test]
    fn test_local_warning_above_threshold() {
        let (snapshot, overview) = fixture();
        let ctx = AnalysisContext::new(&snapshot, &overview);

        let warnings = EntryTipTask::new("300", "food").local_insights(&ctx);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].text.contains("93% of your 'food' budget"));

        let quiet = EntryTipTask::new("10", "transport").local_insights(&ctx);
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_parse_single_tip() {
        let task = EntryTipTask::new("100", "food");
        let payload = serde_json::json!([
            {"type": "tip", "text": "Consider a packed lunch twice this week."}
        ]);
        let insights = task.parse(&payload).unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Info);
    }
}
