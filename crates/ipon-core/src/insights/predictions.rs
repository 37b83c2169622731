//! Data-driven spending predictions
//!
//! Projects likely future spending from the current week's totals. The prompt
//! asks for predictions rather than tips; amounts come back as display
//! strings and are parsed opportunistically.

use serde::Deserialize;

use crate::aggregate;
use crate::error::{Error, Result};
use crate::models::Language;

use super::engine::{AnalysisContext, InsightTask};
use super::types::{Insight, InsightKind, TaskKind};

pub struct PredictionsTask;

impl PredictionsTask {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PredictionsTask {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct PredictionRow {
    #[serde(rename = "type")]
    kind: String,
    icon: String,
    title: String,
    message: String,
    amount: Option<String>,
}

/// Parse a display amount like "\u{20b1}1,200" into a number; None when the
/// string has no usable digits
fn parse_display_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().ok()
}

impl InsightTask for PredictionsTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Predictions
    }

    fn name(&self) -> &'static str {
        "Spending Predictions"
    }

    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String> {
        let profile = ctx.snapshot.profile.as_ref()?;
        if ctx.snapshot.expenses.is_empty() {
            return None;
        }

        let weekly = aggregate::aggregate(
            &ctx.snapshot.income,
            &ctx.snapshot.expenses,
            ctx.overview.as_of,
            7,
        );
        let top_category = weekly
            .top_categories
            .first()
            .map(|c| c.category.clone())
            .unwrap_or_else(|| "None".to_string());

        Some(format!(
            "You are a sharp and predictive Filipino financial analyst for an app called Ipon.\n\
             Analyze the user's recent expenses to generate 2-3 concise, data-driven predictions \
             about their future spending. Avoid generic tips or suggestions. Focus on what is \
             likely to happen.\n\
             The user's preferred language is {language}. Respond in that language.\n\
             \n\
             Context:\n\
             - User's Monthly Income: \u{20b1}{income:.0}\n\
             - Total expenses this week: \u{20b1}{weekly_total:.0}\n\
             - Top spending category this week: {top_category}\n\
             \n\
             Instructions:\n\
             - Return only a JSON array of 2-3 prediction objects, with no other text.\n\
             - Each object must have 'type' ('prediction', 'warning'), 'icon' (an emoji), 'title' \
             (a short, catchy prediction title), 'message' (the detailed prediction), and an \
             optional 'amount' (a relevant amount as a string like '\u{20b1}1,200').\n\
             - Prediction 1 (Spending Forecast): based on this week's total, project the monthly \
             total.\n\
             - Prediction 2 (Category Overspend): if a top category is identified, predict whether \
             it will exceed a typical budget share; otherwise make another general prediction.\n\
             - Prediction 3 (Next Big Expense): predict the next likely large expense from the \
             transaction history.\n\
             - The tone should be neutral and predictive.",
            language = ctx.language.prompt_name(),
            income = profile.monthly_income,
            weekly_total = weekly.total_expenses,
            top_category = top_category,
        ))
    }

    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>> {
        let rows: Vec<PredictionRow> = serde_json::from_value(payload.clone())?;

        rows.into_iter()
            .map(|row| {
                let kind = match row.kind.as_str() {
                    "prediction" => InsightKind::Prediction,
                    "warning" => InsightKind::Warning,
                    other => {
                        return Err(Error::InvalidResponse(format!(
                            "Unknown prediction type: {}",
                            other
                        )))
                    }
                };

                let mut insight = Insight::new(
                    kind,
                    format!("{} {}: {}", row.icon, row.title, row.message),
                );
                if let Some(amount) = row.amount.as_deref().and_then(parse_display_amount) {
                    insight = insight.with_impact(amount);
                }
                Ok(insight)
            })
            .collect()
    }

    fn fallback(&self, language: Language) -> Insight {
        let text = match language {
            Language::En => "Could not get AI predictions.",
            Language::Fil => "Hindi makuha ang mga hula ng AI.",
        };
        Insight::fallback(InsightKind::Warning, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_amount() {
        assert_eq!(parse_display_amount("\u{20b1}1,200"), Some(1200.0));
        assert_eq!(parse_display_amount("1200.50"), Some(1200.5));
        assert_eq!(parse_display_amount("around \u{20b1}900"), Some(900.0));
        assert_eq!(parse_display_amount("unknown"), None);
    }

    #[test]
    fn test_parse_prediction_rows() {
        let task = PredictionsTask::new();
        let payload = serde_json::json!([
            {
                "type": "prediction",
                "icon": "\u{1f4c8}",
                "title": "Monthly Spending Forecast",
                "message": "At your current rate, you're projected to spend ~\u{20b1}8,000 this month.",
                "amount": "\u{20b1}8,000"
            },
            {
                "type": "warning",
                "icon": "\u{26a0}",
                "title": "Food Budget Alert",
                "message": "Your 'food' spending is on track to exceed a typical 25% budget."
            }
        ]);

        let insights = task.parse(&payload).unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::Prediction);
        assert_eq!(insights[0].impact_amount, Some(8000.0));
        assert_eq!(insights[1].kind, InsightKind::Warning);
        assert_eq!(insights[1].impact_amount, None);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let task = PredictionsTask::new();
        let payload = serde_json::json!([
            {"type": "tip", "icon": "x", "title": "t", "message": "m"}
        ]);
        assert!(task.parse(&payload).is_err());
    }
}
