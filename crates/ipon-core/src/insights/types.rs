//! Core types for the insight engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an insight is trying to tell the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Neutral observation, no action needed
    Info,
    /// Worth attention
    Warning,
    /// Requires action
    Critical,
    /// An actionable recommendation, optionally targeting a savings goal
    Suggestion,
    /// A forecast of likely future spending
    Prediction,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Info => "info",
            InsightKind::Warning => "warning",
            InsightKind::Critical => "critical",
            InsightKind::Suggestion => "suggestion",
            InsightKind::Prediction => "prediction",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(InsightKind::Info),
            "warning" => Ok(InsightKind::Warning),
            "critical" => Ok(InsightKind::Critical),
            "suggestion" => Ok(InsightKind::Suggestion),
            "prediction" => Ok(InsightKind::Prediction),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// Where an insight's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    /// Produced by the generative text service
    Generated,
    /// Deterministic local substitute
    Fallback,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSource::Generated => "generated",
            InsightSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for InsightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The insight call sites, used as trigger keys for debounce and staleness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Dashboard alert cards
    Dashboard,
    /// Risk-aware recommendations
    Recommendations,
    /// 50/30/20 budget coaching tips
    BudgetTips,
    /// Savings goal insights and contribution suggestions
    Savings,
    /// Single tip while an expense is being entered
    EntryTip,
    /// Data-driven spending predictions
    Predictions,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Dashboard => "dashboard",
            TaskKind::Recommendations => "recommendations",
            TaskKind::BudgetTips => "budget_tips",
            TaskKind::Savings => "savings",
            TaskKind::EntryTip => "entry_tip",
            TaskKind::Predictions => "predictions",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single natural-language statement attached to computed financial state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
    /// Estimated money effect of acting on the insight
    pub impact_amount: Option<f64>,
    /// Savings goal a suggestion points at; only present for suggestions
    pub target_goal_id: Option<String>,
    pub source: InsightSource,
    /// Whether the user has acknowledged this insight
    pub seen: bool,
}

impl Insight {
    /// Create a generated insight; the engine normalizes source and seen
    pub fn new(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            impact_amount: None,
            target_goal_id: None,
            source: InsightSource::Generated,
            seen: false,
        }
    }

    /// Create a deterministic fallback insight
    pub fn fallback(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            source: InsightSource::Fallback,
            ..Self::new(kind, text)
        }
    }

    pub fn with_impact(mut self, amount: f64) -> Self {
        self.impact_amount = Some(amount);
        self
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.target_goal_id = Some(goal_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            InsightKind::Info,
            InsightKind::Warning,
            InsightKind::Critical,
            InsightKind::Suggestion,
            InsightKind::Prediction,
        ] {
            assert_eq!(InsightKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(InsightKind::from_str("tip").is_err());
    }

    #[test]
    fn test_insight_builder() {
        let insight = Insight::new(InsightKind::Suggestion, "Put spare money on your goal")
            .with_impact(750.0)
            .with_goal("g1");

        assert_eq!(insight.kind, InsightKind::Suggestion);
        assert_eq!(insight.impact_amount, Some(750.0));
        assert_eq!(insight.target_goal_id.as_deref(), Some("g1"));
        assert_eq!(insight.source, InsightSource::Generated);
        assert!(!insight.seen);
    }

    #[test]
    fn test_fallback_tag() {
        let insight = Insight::fallback(InsightKind::Warning, "Could not reach the service");
        assert_eq!(insight.source, InsightSource::Fallback);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&InsightKind::Prediction).unwrap();
        assert_eq!(json, "\"prediction\"");
        let json = serde_json::to_string(&InsightSource::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
    }
}
