//! Overview composition
//!
//! One-stop computation of the numeric state: forecast, scores, aggregates,
//! budget, goal projections. Everything here is synchronous and pure given
//! its inputs; it is computed before any generative call and returned to
//! callers even when the natural-language layer degrades.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AggregateSnapshot};
use crate::budget::{allocate, fifty_thirty_twenty, Allocation, BudgetReport, SplitPlan};
use crate::forecast::{project, shortfall, upcoming_challenges, UpcomingChallenge};
use crate::goals::{project_goals, GoalProjection};
use crate::models::{ForecastPoint, LedgerSnapshot, Transaction};
use crate::score::{confidence_level, health_score, risk_ratio};

/// Window used for the overview's aggregate summary, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// The full numeric state computed from one ledger snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    /// Reference instant the overview was computed against
    pub as_of: DateTime<Utc>,
    pub current_balance: f64,
    pub forecast: Vec<ForecastPoint>,
    pub predicted_shortfall: f64,
    /// Risk ratio in [0, 1] over the aggregate window
    pub risk_ratio: f64,
    /// Health score in [0, 100]
    pub health_score: u8,
    pub confidence_level: u8,
    /// Monthly income minus the window's expenses; can go negative
    pub estimated_monthly_savings: f64,
    pub aggregate: AggregateSnapshot,
    pub budget: BudgetReport,
    /// None when there is no profile or no monthly income
    pub split_plan: Option<SplitPlan>,
    pub goal_projections: Vec<GoalProjection>,
    pub upcoming_challenges: Vec<UpcomingChallenge>,
}

impl Overview {
    /// Compute the overview for a snapshot as of `now`
    pub fn compute(
        snapshot: &LedgerSnapshot,
        allocations: &[Allocation],
        now: DateTime<Utc>,
        horizon_weeks: usize,
    ) -> Self {
        let current_balance = snapshot.current_balance();
        let forecast = project(
            &snapshot.income,
            &snapshot.expenses,
            current_balance,
            horizon_weeks,
        );
        let predicted_shortfall = shortfall(&forecast);

        let aggregate = aggregate(
            &snapshot.income,
            &snapshot.expenses,
            now,
            DEFAULT_WINDOW_DAYS,
        );

        let monthly_income = snapshot
            .profile
            .as_ref()
            .map(|p| p.monthly_income)
            .unwrap_or(0.0);
        let estimated_monthly_savings = monthly_income - aggregate.total_expenses;

        let split_plan = (monthly_income > 0.0).then(|| {
            fifty_thirty_twenty(monthly_income, &window_expenses(snapshot, now))
        });

        Self {
            as_of: now,
            current_balance,
            predicted_shortfall,
            risk_ratio: risk_ratio(aggregate.total_income, aggregate.total_expenses),
            health_score: health_score(current_balance, predicted_shortfall),
            confidence_level: confidence_level(snapshot.income.len() + snapshot.expenses.len()),
            estimated_monthly_savings,
            budget: allocate(monthly_income, allocations, &aggregate.by_category),
            split_plan,
            goal_projections: project_goals(
                &snapshot.goals,
                estimated_monthly_savings,
                now.date_naive(),
            ),
            upcoming_challenges: upcoming_challenges(&snapshot.expenses, now),
            forecast,
            aggregate,
        }
    }
}

/// Expenses inside the overview's aggregate window
fn window_expenses(snapshot: &LedgerSnapshot, now: DateTime<Utc>) -> Vec<Transaction> {
    let start = now - Duration::days(DEFAULT_WINDOW_DAYS as i64);
    snapshot
        .expenses
        .iter()
        .filter(|t| t.timestamp > start && t.timestamp <= now)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::default_allocation;
    use crate::goals::GoalStatus;
    use crate::models::{Frequency, Language, Profile, SavingsGoal};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap()
    }

    fn snapshot() -> LedgerSnapshot {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        LedgerSnapshot {
            profile: Some(Profile {
                monthly_income: 20000.0,
                payday: "15th".to_string(),
                family_size: 4,
                language: Language::En,
            }),
            income: vec![
                Transaction::recurring(20000.0, "salary", t0, Frequency::Monthly),
            ],
            expenses: vec![
                Transaction::once(6000.0, "food", t0),
                Transaction::recurring(2000.0, "bills", t0, Frequency::Monthly),
            ],
            goals: vec![SavingsGoal {
                id: "g1".to_string(),
                name: "Laptop".to_string(),
                target_amount: 30000.0,
                saved_amount: 6000.0,
                target_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            }],
            initial_balance: 500.0,
        }
    }

    #[test]
    fn test_compute_wires_components_together() {
        let snapshot = snapshot();
        let overview = Overview::compute(&snapshot, &default_allocation(), now(), 4);

        assert_eq!(overview.current_balance, 500.0 + 20000.0 - 8000.0);
        assert_eq!(overview.forecast.len(), 4);
        // Net 20000/4 - 2000/4 = 4500 per week on a positive seed
        assert_eq!(overview.predicted_shortfall, 0.0);
        assert_eq!(overview.health_score, 100);
        assert!((overview.risk_ratio - 8000.0 / 20000.0).abs() < 1e-9);
        assert_eq!(overview.confidence_level, 73);
        assert_eq!(overview.estimated_monthly_savings, 12000.0);

        let plan = overview.split_plan.as_ref().unwrap();
        assert_eq!(plan.needs.actual, 8000.0);

        assert_eq!(overview.goal_projections.len(), 1);
        match overview.goal_projections[0].status {
            GoalStatus::Projected { achievable, .. } => assert!(achievable),
            ref other => panic!("unexpected status: {:?}", other),
        }

        let food_line = overview
            .budget
            .lines
            .iter()
            .find(|l| l.category_id == "food")
            .unwrap();
        assert_eq!(food_line.budget_amount, 6000.0);
        assert_eq!(food_line.spent, 6000.0);
    }

    #[test]
    fn test_compute_empty_snapshot() {
        let empty = LedgerSnapshot::default();
        let overview = Overview::compute(&empty, &default_allocation(), now(), 4);

        assert_eq!(overview.current_balance, 0.0);
        assert!(overview.forecast.iter().all(|p| p.balance == 0.0));
        assert_eq!(overview.risk_ratio, 0.0);
        // Zero balance is defined as zero health
        assert_eq!(overview.health_score, 0);
        assert!(overview.split_plan.is_none());
        assert!(overview.goal_projections.is_empty());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let snapshot = snapshot();
        let a = Overview::compute(&snapshot, &default_allocation(), now(), 4);
        let b = Overview::compute(&snapshot, &default_allocation(), now(), 4);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
