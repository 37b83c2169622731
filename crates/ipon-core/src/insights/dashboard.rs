//! Dashboard alert cards
//!
//! Turns the balance/shortfall/cash-flow summary into one or two short alert
//! cards for the home screen.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Language;

use super::engine::{AnalysisContext, InsightTask};
use super::types::{Insight, InsightKind, TaskKind};

/// Expense-to-income ratio above which the prompt asks for a warning card
const HIGH_EXPENSE_RATIO_PERCENT: f64 = 85.0;

pub struct DashboardTask;

impl DashboardTask {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DashboardTask {
    fn default() -> Self {
        Self::new()
    }
}

/// Alert object schema expected from the model
#[derive(Debug, Deserialize)]
struct AlertRow {
    #[allow(dead_code)]
    id: String,
    #[serde(rename = "type")]
    kind: String,
    message: String,
    solution: String,
}

impl InsightTask for DashboardTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Dashboard
    }

    fn name(&self) -> &'static str {
        "Dashboard Alerts"
    }

    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String> {
        if ctx.snapshot.is_empty() {
            return None;
        }

        let overview = ctx.overview;
        Some(format!(
            "You are a friendly and encouraging Filipino financial assistant for an app called Ipon.\n\
             Analyze the user's dashboard summary and generate 1-2 concise, actionable alert cards.\n\
             The user's preferred language is {language}. Respond in that language.\n\
             \n\
             Context:\n\
             - Current Balance: \u{20b1}{balance:.0}\n\
             - Predicted Shortfall in the next {weeks} weeks: \u{20b1}{shortfall:.0}\n\
             - Total Income (this period): \u{20b1}{income:.0}\n\
             - Total Expenses (this period): \u{20b1}{expenses:.0}\n\
             \n\
             Instructions:\n\
             - Return only a JSON array of alert objects, with no other text.\n\
             - Each object must have 'id' (a unique string), 'type' ('critical', 'warning', 'info'), \
             'message' (the main alert text), and 'solution' (a brief, actionable next step).\n\
             - If the predicted shortfall is greater than 0, that is the most important issue. \
             Create a 'critical' alert about it.\n\
             - If total expenses are high compared to total income (above {ratio:.0}%) but there is \
             no shortfall, create a 'warning' alert.\n\
             - If the user is doing well (no shortfall, reasonable expenses), create a positive and \
             encouraging 'info' alert.\n\
             - The tone should be helpful and not alarming, even for critical alerts.",
            language = ctx.language.prompt_name(),
            balance = overview.current_balance,
            weeks = overview.forecast.len(),
            shortfall = overview.predicted_shortfall,
            income = overview.aggregate.total_income,
            expenses = overview.aggregate.total_expenses,
            ratio = HIGH_EXPENSE_RATIO_PERCENT,
        ))
    }

    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>> {
        let rows: Vec<AlertRow> = serde_json::from_value(payload.clone())?;

        rows.into_iter()
            .map(|row| {
                let kind = match row.kind.as_str() {
                    "critical" => InsightKind::Critical,
                    "warning" => InsightKind::Warning,
                    "info" => InsightKind::Info,
                    other => {
                        return Err(Error::InvalidResponse(format!(
                            "Unknown alert type: {}",
                            other
                        )))
                    }
                };
                Ok(Insight::new(
                    kind,
                    format!("{} {}", row.message, row.solution),
                ))
            })
            .collect()
    }

    fn fallback(&self, language: Language) -> Insight {
        let text = match language {
            Language::En => {
                "Could not get AI insights at the moment. Please try refreshing the app."
            }
            Language::Fil => {
                "Hindi makakuha ng AI insights sa ngayon. Pakisubukang i-refresh ang app."
            }
        };
        Insight::fallback(InsightKind::Warning, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alert_rows() {
        let task = DashboardTask::new();
        let payload = serde_json::json!([
            {
                "id": "shortfall_1",
                "type": "critical",
                "message": "A shortfall of \u{20b1}1,200 is likely in week 3.",
                "solution": "Trim non-essential spending this week."
            }
        ]);

        let insights = task.parse(&payload).unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Critical);
        assert!(insights[0].text.contains("Trim non-essential"));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let task = DashboardTask::new();
        let payload = serde_json::json!([
            {"id": "x", "type": "panic", "message": "m", "solution": "s"}
        ]);
        assert!(task.parse(&payload).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let task = DashboardTask::new();
        let payload = serde_json::json!([{"id": "x", "type": "info", "message": "m"}]);
        assert!(task.parse(&payload).is_err());
    }

    #[test]
    fn test_fallback_localized() {
        let task = DashboardTask::new();
        assert!(task.fallback(Language::En).text.starts_with("Could not"));
        assert!(task.fallback(Language::Fil).text.starts_with("Hindi"));
    }
}
