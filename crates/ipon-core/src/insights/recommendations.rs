//! Risk-aware recommendations
//!
//! Generates actionable recommendations from the risk level and the heaviest
//! recent spending categories, each with an estimated monthly impact.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Language;

use super::engine::{AnalysisContext, InsightTask};
use super::types::{Insight, InsightKind, TaskKind};

pub struct RecommendationsTask;

impl RecommendationsTask {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecommendationsTask {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationRow {
    text: String,
    /// Estimated monthly savings from following the advice
    impact: f64,
    priority: String,
}

fn priority_rank(priority: &str) -> Result<u8> {
    match priority {
        "high" => Ok(0),
        "medium" => Ok(1),
        "low" => Ok(2),
        other => Err(Error::InvalidResponse(format!(
            "Unknown priority: {}",
            other
        ))),
    }
}

impl InsightTask for RecommendationsTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Recommendations
    }

    fn name(&self) -> &'static str {
        "Recommendations"
    }

    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String> {
        if ctx.snapshot.expenses.is_empty() {
            return None;
        }

        let top_categories = ctx
            .overview
            .aggregate
            .top_categories
            .iter()
            .map(|c| format!("{}: \u{20b1}{:.0}", c.category, c.total))
            .collect::<Vec<_>>()
            .join(", ");

        Some(format!(
            "You are a sharp and insightful Filipino financial analyst for an app called Ipon.\n\
             Analyze the user's financial risk and spending habits to generate 3 concise, \
             actionable recommendations.\n\
             The user's preferred language is {language}. Respond in that language.\n\
             \n\
             Context:\n\
             - Financial Risk Level: {risk:.0}% (where higher is more risk)\n\
             - Top Spending Categories (last {days} days): {categories}\n\
             \n\
             Instructions:\n\
             - Return only a JSON array of 3 recommendation objects, with no other text.\n\
             - Each object must have 'text' (the recommendation), 'impact' (an estimated monthly \
             savings in \u{20b1} as a number), and 'priority' ('high', 'medium', 'low').\n\
             - If the risk level is high (above 80%), the top priority recommendation MUST address \
             it directly.\n\
             - Create specific, creative recommendations based on the top spending categories. For \
             example, if 'food' is high, suggest meal prepping; if 'transport' is high, suggest a \
             carpool or public transport routes.\n\
             - Ensure the 'impact' amount is a realistic monthly saving from following the advice.\n\
             - The tone should be empowering and strategic.",
            language = ctx.language.prompt_name(),
            risk = ctx.overview.risk_ratio * 100.0,
            days = ctx.overview.aggregate.window_days,
            categories = if top_categories.is_empty() {
                "None".to_string()
            } else {
                top_categories
            },
        ))
    }

    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>> {
        let rows: Vec<RecommendationRow> = serde_json::from_value(payload.clone())?;

        let mut ranked: Vec<(u8, Insight)> = rows
            .into_iter()
            .map(|row| {
                let rank = priority_rank(&row.priority)?;
                Ok((
                    rank,
                    Insight::new(InsightKind::Suggestion, row.text).with_impact(row.impact),
                ))
            })
            .collect::<Result<_>>()?;

        ranked.sort_by_key(|(rank, _)| *rank);
        Ok(ranked.into_iter().map(|(_, insight)| insight).collect())
    }

    fn fallback(&self, language: Language) -> Insight {
        let text = match language {
            Language::En => "Could not get AI recommendations at the moment.",
            Language::Fil => "Hindi makakuha ng mga mungkahi mula sa AI sa ngayon.",
        };
        Insight::fallback(InsightKind::Warning, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_by_priority() {
        let task = RecommendationsTask::new();
        let payload = serde_json::json!([
            {"text": "Save a little each payday", "impact": 200.0, "priority": "low"},
            {"text": "Cut your top category", "impact": 1500.0, "priority": "high"},
            {"text": "Try a no-spend weekend", "impact": 1000.0, "priority": "medium"}
        ]);

        let insights = task.parse(&payload).unwrap();
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].text, "Cut your top category");
        assert_eq!(insights[0].impact_amount, Some(1500.0));
        assert!(insights.iter().all(|i| i.kind == InsightKind::Suggestion));
    }

    #[test]
    fn test_parse_rejects_unknown_priority() {
        let task = RecommendationsTask::new();
        let payload = serde_json::json!([
            {"text": "x", "impact": 1.0, "priority": "urgent"}
        ]);
        assert!(task.parse(&payload).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_impact() {
        let task = RecommendationsTask::new();
        let payload = serde_json::json!([{"text": "x", "priority": "high"}]);
        assert!(task.parse(&payload).is_err());
    }
}
