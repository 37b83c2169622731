//! Budget Allocator
//!
//! Percentage-based budgets against monthly income. The default nine-category
//! allocation is a 50/30/20-style split refined for Filipino households; user
//! overrides are accepted as-is and a total that drifts from 100% is only
//! flagged, never rejected.

use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryTotal;
use crate::models::Transaction;

/// Usage above this share of the budget counts as "near limit"
pub const NEAR_LIMIT_THRESHOLD: f64 = 80.0;

/// Category ids that count as needs in the 50/30/20 rollup
const NEEDS_CATEGORIES: [&str; 4] = ["bills", "food", "transport", "health"];

/// Category ids that count as wants in the 50/30/20 rollup
const WANTS_CATEGORIES: [&str; 4] = ["shopping", "entertainment", "education", "other"];

/// One category's share of monthly income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub category_id: String,
    pub percentage: f64,
}

impl Allocation {
    pub fn new(category_id: impl Into<String>, percentage: f64) -> Self {
        Self {
            category_id: category_id.into(),
            percentage,
        }
    }
}

/// Baseline allocation used as the reset default; sums to 100
pub fn default_allocation() -> Vec<Allocation> {
    vec![
        Allocation::new("food", 30.0),
        Allocation::new("transport", 10.0),
        Allocation::new("bills", 15.0),
        Allocation::new("health", 5.0),
        Allocation::new("education", 5.0),
        Allocation::new("entertainment", 5.0),
        Allocation::new("shopping", 10.0),
        Allocation::new("savings", 15.0),
        Allocation::new("other", 5.0),
    ]
}

/// How a category is tracking against its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::NearLimit => "near_limit",
            Self::OverBudget => "over_budget",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a usage percentage
pub fn classify_usage(usage_percentage: f64) -> BudgetStatus {
    if usage_percentage > 100.0 {
        BudgetStatus::OverBudget
    } else if usage_percentage >= NEAR_LIMIT_THRESHOLD {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::OnTrack
    }
}

/// One allocated category with its derived budget state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category_id: String,
    pub allocated_percentage: f64,
    /// `monthly_income * allocated_percentage / 100`
    pub budget_amount: f64,
    pub spent: f64,
    /// `spent / budget_amount * 100`; 0 when the budget amount is 0
    pub usage_percentage: f64,
    pub status: BudgetStatus,
}

/// Full allocation report for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub monthly_income: f64,
    pub lines: Vec<BudgetLine>,
    pub total_percentage: f64,
    /// Whether the allocation percentages sum to 100 (advisory only)
    pub balanced: bool,
}

impl BudgetReport {
    /// Lines currently over their budget
    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetLine> {
        self.lines
            .iter()
            .filter(|l| l.status == BudgetStatus::OverBudget)
    }
}

/// Apply an allocation set to the month's per-category spend
pub fn allocate(
    monthly_income: f64,
    allocations: &[Allocation],
    spent_by_category: &[CategoryTotal],
) -> BudgetReport {
    let lines: Vec<BudgetLine> = allocations
        .iter()
        .map(|a| {
            let budget_amount = monthly_income * a.percentage / 100.0;
            let spent = spent_by_category
                .iter()
                .find(|c| c.category == a.category_id)
                .map(|c| c.total)
                .unwrap_or(0.0);
            let usage_percentage = if budget_amount > 0.0 {
                spent / budget_amount * 100.0
            } else {
                0.0
            };

            BudgetLine {
                category_id: a.category_id.clone(),
                allocated_percentage: a.percentage,
                budget_amount,
                spent,
                usage_percentage,
                status: classify_usage(usage_percentage),
            }
        })
        .collect();

    let total_percentage: f64 = allocations.iter().map(|a| a.percentage).sum();

    BudgetReport {
        monthly_income,
        lines,
        total_percentage,
        balanced: (total_percentage - 100.0).abs() < 0.01,
    }
}

/// One bucket of the 50/30/20 plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBucket {
    pub allocated: f64,
    /// Spent for needs/wants; achieved savings for the savings bucket
    pub actual: f64,
    pub usage_percentage: f64,
}

impl PlanBucket {
    fn new(allocated: f64, actual: f64) -> Self {
        let usage_percentage = if allocated > 0.0 {
            actual / allocated * 100.0
        } else {
            0.0
        };
        Self {
            allocated,
            actual,
            usage_percentage,
        }
    }
}

/// Needs/wants/savings rollup of a month's spending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPlan {
    pub monthly_income: f64,
    pub needs: PlanBucket,
    pub wants: PlanBucket,
    pub savings: PlanBucket,
}

/// Roll the month's expenses into the classic 50/30/20 buckets
///
/// Achieved savings is whatever income the needs and wants buckets did not
/// consume, which can go negative.
pub fn fifty_thirty_twenty(monthly_income: f64, recent_expenses: &[Transaction]) -> SplitPlan {
    let spent_in = |categories: &[&str]| -> f64 {
        recent_expenses
            .iter()
            .filter(|t| categories.contains(&t.category.as_str()))
            .map(|t| t.amount)
            .sum()
    };

    let needs_spent = spent_in(&NEEDS_CATEGORIES);
    let wants_spent = spent_in(&WANTS_CATEGORIES);
    let achieved_savings = monthly_income - needs_spent - wants_spent;

    SplitPlan {
        monthly_income,
        needs: PlanBucket::new(monthly_income * 0.5, needs_spent),
        wants: PlanBucket::new(monthly_income * 0.3, wants_spent),
        savings: PlanBucket::new(monthly_income * 0.2, achieved_savings),
    }
}
