//! Recurrence Projector
//!
//! Expands recurring transactions into per-week cash-flow deltas over a
//! forecast horizon. The model is stationary: a recurring transaction
//! contributes the same weekly-equivalent amount to every projected week
//! rather than being placed on calendar-exact due dates. Calendar-exact due
//! dates are only used by [`upcoming_challenges`], which surfaces individual
//! bills coming due in the next month.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ForecastPoint, Frequency, Transaction};

/// Default forecast horizon in weeks
pub const DEFAULT_HORIZON_WEEKS: usize = 4;

/// A single upcoming bill above this amount is flagged as critical
pub const LARGE_EXPENSE_THRESHOLD: f64 = 4000.0;

/// Maximum number of upcoming challenges surfaced to callers
const MAX_CHALLENGES: usize = 3;

/// Convert a recurring amount to its weekly-equivalent contribution
pub fn weekly_equivalent(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Daily => amount * 7.0,
        Frequency::Weekly => amount,
        Frequency::Monthly => amount / 4.0,
        Frequency::Yearly => amount / 52.0,
    }
}

/// Sum of weekly-equivalent amounts across the recurring entries of a list
///
/// Non-recurring transactions contribute nothing to future periods.
fn weekly_delta(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_recurring)
        .filter_map(|t| t.frequency.map(|f| weekly_equivalent(t.amount, f)))
        .sum()
}

/// Project the running balance over `horizon` weeks
///
/// The running balance is seeded with the current actual balance; week *i*
/// ends at `balance(i-1) + income(i) - expenses(i)`. Output is deterministic:
/// identical inputs produce bit-for-bit identical points. With no recurring
/// transactions every point equals the seed balance, and a negative seed
/// propagates unchanged through the additions.
pub fn project(
    income: &[Transaction],
    expenses: &[Transaction],
    seed_balance: f64,
    horizon: usize,
) -> Vec<ForecastPoint> {
    let weekly_income = weekly_delta(income);
    let weekly_expenses = weekly_delta(expenses);

    let mut balance = seed_balance;
    (0..horizon)
        .map(|i| {
            balance += weekly_income - weekly_expenses;
            ForecastPoint {
                period_label: format!("Week {}", i + 1),
                period_index: i,
                income: weekly_income,
                expenses: weekly_expenses,
                balance,
            }
        })
        .collect()
}

/// Magnitude of the most negative projected balance, or 0.0 if the balance
/// never dips below zero
pub fn shortfall(points: &[ForecastPoint]) -> f64 {
    points
        .iter()
        .map(|p| p.balance)
        .fold(f64::INFINITY, f64::min)
        .min(0.0)
        .abs()
}

/// Severity of an upcoming recurring bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeSeverity {
    Info,
    Warning,
    Critical,
}

impl ChallengeSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ChallengeSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring bill coming due within the next month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingChallenge {
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub estimate: f64,
    pub severity: ChallengeSeverity,
}

/// Next due date for a recurrence, walked forward from its first occurrence
///
/// Daily recurrences are not walked; they are background noise rather than
/// discrete bills.
fn next_due_date(
    first_seen: DateTime<Utc>,
    frequency: Frequency,
    today: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let mut next = first_seen;
    while next < today {
        next = match frequency {
            Frequency::Daily => return None,
            Frequency::Weekly => next + Duration::days(7),
            Frequency::Monthly => next.checked_add_months(Months::new(1))?,
            Frequency::Yearly => next.checked_add_months(Months::new(12))?,
        };
    }
    Some(next)
}

/// Scan recurring expenses for bills due within the next month
///
/// Bills above [`LARGE_EXPENSE_THRESHOLD`] are critical, bills due within
/// seven days are warnings, the rest informational. Sorted by due date and
/// capped at three entries.
pub fn upcoming_challenges(expenses: &[Transaction], today: DateTime<Utc>) -> Vec<UpcomingChallenge> {
    let next_month = match today.checked_add_months(Months::new(1)) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let seven_days = today + Duration::days(7);

    let mut challenges: Vec<UpcomingChallenge> = expenses
        .iter()
        .filter(|e| e.is_recurring)
        .filter_map(|e| {
            let frequency = e.frequency?;
            if frequency == Frequency::Daily {
                return None;
            }
            let due = next_due_date(e.timestamp, frequency, today)?;
            if due < today || due > next_month {
                return None;
            }

            let severity = if e.amount > LARGE_EXPENSE_THRESHOLD {
                ChallengeSeverity::Critical
            } else if due <= seven_days {
                ChallengeSeverity::Warning
            } else {
                ChallengeSeverity::Info
            };

            Some(UpcomingChallenge {
                title: e
                    .description
                    .clone()
                    .unwrap_or_else(|| e.category.clone()),
                due_date: due,
                estimate: e.amount,
                severity,
            })
        })
        .collect();

    challenges.sort_by_key(|c| c.due_date);
    challenges.truncate(MAX_CHALLENGES);
    challenges
}
