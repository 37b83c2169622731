//! Domain models for Ipon
//!
//! Everything here is a read-only snapshot of state owned by the external
//! ledger store. The core never mutates a transaction or profile; each push
//! update from the store replaces the whole snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cadence of a recurring transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output language for generated insight text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fil,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fil => "fil",
        }
    }

    /// Human-readable language name used in prompt instructions
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fil => "Tagalog/Filipino",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fil" => Ok(Self::Fil),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense entry
///
/// Amounts are always non-negative; whether a transaction adds to or drains
/// the balance depends on which ledger collection it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub is_recurring: bool,
    /// Present only when `is_recurring` is true
    pub frequency: Option<Frequency>,
    pub description: Option<String>,
}

impl Transaction {
    /// Create a one-off transaction
    pub fn once(amount: f64, category: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            amount,
            category: category.into(),
            timestamp,
            is_recurring: false,
            frequency: None,
            description: None,
        }
    }

    /// Create a recurring transaction
    pub fn recurring(
        amount: f64,
        category: impl Into<String>,
        timestamp: DateTime<Utc>,
        frequency: Frequency,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            timestamp,
            is_recurring: true,
            frequency: Some(frequency),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// User profile snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub monthly_income: f64,
    pub payday: String,
    pub family_size: u32,
    pub language: Language,
}

/// A savings goal from the ledger store's goal collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub saved_amount: f64,
    pub target_date: NaiveDate,
}

impl SavingsGoal {
    /// Amount still missing; never negative
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.saved_amount).max(0.0)
    }
}

/// Wholesale snapshot of the user's ledger as pushed by the external store
///
/// The store delivers an initial value and a full replacement on every
/// change; there is no diffing contract. Evaluations capture one snapshot at
/// trigger time and never observe later updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub profile: Option<Profile>,
    pub income: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    pub goals: Vec<SavingsGoal>,
    /// Balance before any of the recorded transactions
    pub initial_balance: f64,
}

impl LedgerSnapshot {
    pub fn total_income(&self) -> f64 {
        self.income.iter().map(|t| t.amount).sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|t| t.amount).sum()
    }

    /// Current actual balance: initial balance plus all recorded cash flow
    pub fn current_balance(&self) -> f64 {
        self.initial_balance + self.total_income() - self.total_expenses()
    }

    /// True when the ledger has no transactions at all
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }

    pub fn goal(&self, id: &str) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == id)
    }
}

/// One projected period of the cash-flow forecast
///
/// Created fresh on every projection run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period_label: String,
    pub period_index: usize,
    pub income: f64,
    pub expenses: f64,
    /// Running balance after this period's net flow
    pub balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_frequency_round_trip() {
        for f in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            assert_eq!(Frequency::from_str(f.as_str()).unwrap(), f);
        }
        assert!(Frequency::from_str("fortnightly").is_err());
    }

    #[test]
    fn test_language_prompt_name() {
        assert_eq!(Language::En.prompt_name(), "English");
        assert_eq!(Language::Fil.prompt_name(), "Tagalog/Filipino");
    }

    #[test]
    fn test_current_balance() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let snapshot = LedgerSnapshot {
            initial_balance: 1000.0,
            income: vec![Transaction::once(5000.0, "salary", t0)],
            expenses: vec![
                Transaction::once(1200.0, "food", t0),
                Transaction::once(300.0, "transport", t0),
            ],
            ..Default::default()
        };

        assert_eq!(snapshot.current_balance(), 4500.0);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_goal_remaining_never_negative() {
        let goal = SavingsGoal {
            id: "g1".to_string(),
            name: "Emergency fund".to_string(),
            target_amount: 1000.0,
            saved_amount: 1500.0,
            target_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        assert_eq!(goal.remaining(), 0.0);
    }
}
