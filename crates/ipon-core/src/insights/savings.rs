//! Savings goal insights
//!
//! Generates insights about the savings rate and at-risk goals, including
//! contribution suggestions that must point at a concrete goal. Suggestions
//! whose goal reference cannot be resolved are discarded during engine
//! normalization.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::goals::weekly_spare;
use crate::models::Language;

use super::engine::{AnalysisContext, InsightTask};
use super::types::{Insight, InsightKind, TaskKind};

pub struct SavingsTask;

impl SavingsTask {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SavingsTask {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct SavingsRow {
    icon: String,
    text: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "goalId")]
    goal_id: Option<String>,
    #[serde(rename = "suggestedAmount")]
    suggested_amount: Option<f64>,
}

impl InsightTask for SavingsTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Savings
    }

    fn name(&self) -> &'static str {
        "Savings Insights"
    }

    fn build_prompt(&self, ctx: &AnalysisContext<'_>) -> Option<String> {
        let profile = ctx.snapshot.profile.as_ref()?;
        if profile.monthly_income == 0.0 || ctx.snapshot.goals.is_empty() {
            return None;
        }

        let monthly_savings = ctx.overview.estimated_monthly_savings;
        let at_risk: Vec<String> = ctx
            .overview
            .goal_projections
            .iter()
            .filter(|p| p.at_risk())
            .map(|p| format!("'{}' (id: {})", p.goal.name, p.goal.id))
            .collect();

        Some(format!(
            "You are a friendly Filipino financial assistant for an app called Ipon.\n\
             Analyze the user's savings situation and provide 2-3 concise, actionable insights.\n\
             The user's preferred language is {language}. Respond in that language.\n\
             \n\
             Context:\n\
             - Estimated Monthly Savings: \u{20b1}{savings:.0}\n\
             - At-Risk Goals: {at_risk}\n\
             - Estimated Weekly Spare Money: \u{20b1}{spare:.0}\n\
             \n\
             Instructions:\n\
             - Return only a JSON array of insight objects, with no other text.\n\
             - Each object must have 'icon' (an emoji), 'text' (the insight), and 'type' ('info', \
             'warning', 'critical', 'suggestion').\n\
             - If you create a 'suggestion' to contribute spare money, it MUST target the first \
             at-risk goal and MUST also include 'goalId' and 'suggestedAmount'.\n\
             - If there are no at-risk goals but there is spare money, suggest putting it towards \
             the goal with the nearest target date.\n\
             - If monthly savings are negative, provide a 'warning' insight about it.\n\
             - If there are at-risk goals, provide a 'critical' insight about one of them.\n\
             - Always include a general 'info' insight about their savings potential if it is \
             positive.",
            language = ctx.language.prompt_name(),
            savings = monthly_savings,
            at_risk = if at_risk.is_empty() {
                "None".to_string()
            } else {
                at_risk.join(", ")
            },
            spare = weekly_spare(monthly_savings),
        ))
    }

    fn parse(&self, payload: &serde_json::Value) -> Result<Vec<Insight>> {
        let rows: Vec<SavingsRow> = serde_json::from_value(payload.clone())?;

        rows.into_iter()
            .map(|row| {
                let kind = match row.kind.as_str() {
                    "info" => InsightKind::Info,
                    "warning" => InsightKind::Warning,
                    "critical" => InsightKind::Critical,
                    "suggestion" => InsightKind::Suggestion,
                    other => {
                        return Err(Error::InvalidResponse(format!(
                            "Unknown insight type: {}",
                            other
                        )))
                    }
                };

                let mut insight = Insight::new(kind, format!("{} {}", row.icon, row.text));

                if kind == InsightKind::Suggestion {
                    // A contribution suggestion is useless without its target
                    let goal_id = row.goal_id.ok_or_else(|| {
                        Error::InvalidResponse("Suggestion missing goalId".into())
                    })?;
                    let amount = row.suggested_amount.ok_or_else(|| {
                        Error::InvalidResponse("Suggestion missing suggestedAmount".into())
                    })?;
                    insight = insight.with_goal(goal_id).with_impact(amount);
                } else if let Some(amount) = row.suggested_amount {
                    insight = insight.with_impact(amount);
                }

                Ok(insight)
            })
            .collect()
    }

    fn fallback(&self, language: Language) -> Insight {
        let text = match language {
            Language::En => {
                "Could not get AI insights at the moment. Projections are still calculated locally."
            }
            Language::Fil => {
                "Hindi makakuha ng AI insights sa ngayon. Lokal pa ring kinakalkula ang mga projection."
            }
        };
        Insight::fallback(InsightKind::Warning, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggestion_with_goal() {
        let task = SavingsTask::new();
        let payload = serde_json::json!([
            {"icon": "\u{1f4a1}", "text": "You can save about \u{20b1}3,000 monthly.", "type": "info"},
            {
                "icon": "\u{1f4b8}",
                "text": "Put \u{20b1}750 towards your bike fund this week.",
                "type": "suggestion",
                "goalId": "g1",
                "suggestedAmount": 750.0
            }
        ]);

        let insights = task.parse(&payload).unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[1].kind, InsightKind::Suggestion);
        assert_eq!(insights[1].target_goal_id.as_deref(), Some("g1"));
        assert_eq!(insights[1].impact_amount, Some(750.0));
    }

    #[test]
    fn test_parse_suggestion_without_goal_fails() {
        let task = SavingsTask::new();
        let payload = serde_json::json!([
            {"icon": "\u{1f4b8}", "text": "Save more", "type": "suggestion"}
        ]);
        assert!(task.parse(&payload).is_err());
    }

    #[test]
    fn test_parse_suggestion_without_amount_fails() {
        let task = SavingsTask::new();
        let payload = serde_json::json!([
            {"icon": "\u{1f4b8}", "text": "Save more", "type": "suggestion", "goalId": "g1"}
        ]);
        assert!(task.parse(&payload).is_err());
    }
}
