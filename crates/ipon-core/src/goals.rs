//! Goal Projector
//!
//! Projects savings-goal completion dates from the estimated monthly savings
//! rate and flags goals that will not be reached by their target date.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::SavingsGoal;

/// Average month length used to turn fractional months into days
const DAYS_PER_MONTH: f64 = 30.0;

/// Projection outcome for one savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum GoalStatus {
    /// Target already reached
    Completed,
    /// No positive savings rate, so no completion date exists
    Unreachable,
    /// Projected completion at the current savings rate
    Projected {
        date: NaiveDate,
        achievable: bool,
    },
}

/// A goal paired with its projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProjection {
    pub goal: SavingsGoal,
    pub status: GoalStatus,
}

impl GoalProjection {
    /// True when the goal still needs money and will miss its target date
    pub fn at_risk(&self) -> bool {
        matches!(
            self.status,
            GoalStatus::Unreachable | GoalStatus::Projected { achievable: false, .. }
        )
    }
}

/// Project every goal at the current estimated monthly savings rate
pub fn project_goals(
    goals: &[SavingsGoal],
    estimated_monthly_savings: f64,
    today: NaiveDate,
) -> Vec<GoalProjection> {
    goals
        .iter()
        .map(|goal| {
            let status = if goal.remaining() <= 0.0 {
                GoalStatus::Completed
            } else if estimated_monthly_savings <= 0.0 {
                GoalStatus::Unreachable
            } else {
                let months = goal.remaining() / estimated_monthly_savings;
                let date = today + Duration::days((months * DAYS_PER_MONTH).ceil() as i64);
                GoalStatus::Projected {
                    date,
                    achievable: date <= goal.target_date,
                }
            };

            GoalProjection {
                goal: goal.clone(),
                status,
            }
        })
        .collect()
}

/// Spare money available per week out of the monthly savings estimate
pub fn weekly_spare(estimated_monthly_savings: f64) -> f64 {
    estimated_monthly_savings.max(0.0) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: &str, target: f64, saved: f64, target_date: (i32, u32, u32)) -> SavingsGoal {
        SavingsGoal {
            id: id.to_string(),
            name: format!("Goal {}", id),
            target_amount: target,
            saved_amount: saved,
            target_date: NaiveDate::from_ymd_opt(target_date.0, target_date.1, target_date.2)
                .unwrap(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_completed_goal() {
        let projections = project_goals(&[goal("g1", 1000.0, 1000.0, (2026, 6, 1))], 500.0, today());
        assert_eq!(projections[0].status, GoalStatus::Completed);
        assert!(!projections[0].at_risk());
    }

    #[test]
    fn test_unreachable_without_savings() {
        let projections = project_goals(&[goal("g1", 1000.0, 0.0, (2026, 6, 1))], 0.0, today());
        assert_eq!(projections[0].status, GoalStatus::Unreachable);
        assert!(projections[0].at_risk());

        let projections = project_goals(&[goal("g1", 1000.0, 0.0, (2026, 6, 1))], -200.0, today());
        assert_eq!(projections[0].status, GoalStatus::Unreachable);
    }

    #[test]
    fn test_projected_achievable() {
        // 2000 remaining at 1000/month: two months out
        let projections =
            project_goals(&[goal("g1", 2000.0, 0.0, (2026, 12, 31))], 1000.0, today());
        match projections[0].status {
            GoalStatus::Projected { date, achievable } => {
                assert_eq!(date, today() + Duration::days(60));
                assert!(achievable);
            }
            ref other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_projected_at_risk() {
        // 6000 remaining at 500/month: a year out, target in two months
        let projections = project_goals(&[goal("g1", 6000.0, 0.0, (2026, 5, 1))], 500.0, today());
        match projections[0].status {
            GoalStatus::Projected { achievable, .. } => assert!(!achievable),
            ref other => panic!("unexpected status: {:?}", other),
        }
        assert!(projections[0].at_risk());
    }

    #[test]
    fn test_weekly_spare() {
        assert_eq!(weekly_spare(4000.0), 1000.0);
        assert_eq!(weekly_spare(-500.0), 0.0);
    }
}
