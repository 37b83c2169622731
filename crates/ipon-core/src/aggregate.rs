//! Aggregator
//!
//! Windowed numeric summaries over the raw ledger: totals, category ranking,
//! per-day averages, and period-over-period trends. All functions take the
//! reference instant as a parameter so identical inputs always produce
//! identical output.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Number of categories surfaced as "top spending"
const TOP_CATEGORIES: usize = 3;

/// Number of largest single expenses retained in a snapshot
const LARGEST_EXPENSES: usize = 5;

/// Total spent or earned in one category over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Windowed summary of the ledger, consumed by the scorer, allocator, and
/// insight orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub window_days: u32,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_cashflow: f64,
    /// Percentage of income kept; 0 when there is no income
    pub savings_rate: f64,
    pub avg_daily_income: f64,
    pub avg_daily_expenses: f64,
    /// Income change vs the preceding window of equal length, in percent
    pub income_trend: f64,
    /// Expense change vs the preceding window of equal length, in percent
    pub expense_trend: f64,
    /// Expense totals per category, ranked descending
    pub by_category: Vec<CategoryTotal>,
    /// The heaviest spending categories (up to three)
    pub top_categories: Vec<CategoryTotal>,
    /// The five largest single expenses in the window
    pub largest_expenses: Vec<Transaction>,
}

/// Percentage change between two window totals
///
/// A zero previous total would divide to infinity, so the first-ever value in
/// a window is reported as a flat +100% (or 0% when still zero).
pub fn trend(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

fn in_window(t: &Transaction, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    t.timestamp > start && t.timestamp <= end
}

fn sum_window(transactions: &[Transaction], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    transactions
        .iter()
        .filter(|t| in_window(t, start, end))
        .map(|t| t.amount)
        .sum()
}

/// Bucket expenses by category and rank descending by total
///
/// Ties break on the category name so the ranking is deterministic.
fn rank_categories(expenses: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for t in expenses {
        *totals.entry(t.category.as_str()).or_insert(0.0) += t.amount;
    }

    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked
}

/// Summarize the window ending at `reference_end` and compare it against the
/// window of equal length immediately preceding it
pub fn aggregate(
    income: &[Transaction],
    expenses: &[Transaction],
    reference_end: DateTime<Utc>,
    window_days: u32,
) -> AggregateSnapshot {
    let window = Duration::days(window_days as i64);
    let start = reference_end - window;
    let prev_start = start - window;

    let recent_expenses: Vec<Transaction> = expenses
        .iter()
        .filter(|t| in_window(t, start, reference_end))
        .cloned()
        .collect();

    let total_income = sum_window(income, start, reference_end);
    let total_expenses = recent_expenses.iter().map(|t| t.amount).sum::<f64>();
    let net_cashflow = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        net_cashflow / total_income * 100.0
    } else {
        0.0
    };

    let prev_income = sum_window(income, prev_start, start);
    let prev_expenses = sum_window(expenses, prev_start, start);

    let days = window_days.max(1) as f64;
    let by_category = rank_categories(&recent_expenses);
    let top_categories = by_category.iter().take(TOP_CATEGORIES).cloned().collect();

    let mut largest_expenses = recent_expenses;
    largest_expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    largest_expenses.truncate(LARGEST_EXPENSES);

    AggregateSnapshot {
        window_days,
        total_income,
        total_expenses,
        net_cashflow,
        savings_rate,
        avg_daily_income: total_income / days,
        avg_daily_expenses: total_expenses / days,
        income_trend: trend(total_income, prev_income),
        expense_trend: trend(total_expenses, prev_expenses),
        by_category,
        top_categories,
        largest_expenses,
    }
}

/// Total spent per day over the trailing `days` days, oldest day first
pub fn daily_expense_series(
    expenses: &[Transaction],
    reference_end: DateTime<Utc>,
    days: u32,
) -> Vec<f64> {
    (0..days)
        .rev()
        .map(|back| {
            let day_end = reference_end - Duration::days(back as i64);
            let day_start = day_end - Duration::days(1);
            sum_window(expenses, day_start, day_end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_trend_special_cases() {
        assert_eq!(trend(150.0, 0.0), 100.0);
        assert_eq!(trend(0.0, 0.0), 0.0);
        assert_eq!(trend(200.0, 100.0), 100.0);
        assert_eq!(trend(50.0, 100.0), -50.0);
    }

    #[test]
    fn test_aggregate_windows_and_trends() {
        let end = at(2026, 3, 31);
        let income = vec![
            // Current window
            Transaction::once(6000.0, "salary", at(2026, 3, 15)),
            // Previous window
            Transaction::once(3000.0, "salary", at(2026, 2, 10)),
            // Before both windows; ignored
            Transaction::once(9999.0, "salary", at(2025, 12, 1)),
        ];
        let expenses = vec![
            Transaction::once(1500.0, "food", at(2026, 3, 20)),
            Transaction::once(500.0, "transport", at(2026, 3, 25)),
            Transaction::once(1000.0, "food", at(2026, 2, 15)),
        ];

        let snap = aggregate(&income, &expenses, end, 30);
        assert_eq!(snap.total_income, 6000.0);
        assert_eq!(snap.total_expenses, 2000.0);
        assert_eq!(snap.net_cashflow, 4000.0);
        assert!((snap.savings_rate - 66.666).abs() < 0.01);
        assert_eq!(snap.income_trend, 100.0);
        assert_eq!(snap.expense_trend, 100.0);
        assert_eq!(snap.avg_daily_expenses, 2000.0 / 30.0);
    }

    #[test]
    fn test_aggregate_zero_income_savings_rate() {
        let end = at(2026, 3, 31);
        let expenses = vec![Transaction::once(100.0, "food", at(2026, 3, 20))];
        let snap = aggregate(&[], &expenses, end, 30);
        assert_eq!(snap.savings_rate, 0.0);
        assert_eq!(snap.income_trend, 0.0);
    }

    #[test]
    fn test_category_ranking_deterministic() {
        let end = at(2026, 3, 31);
        let expenses = vec![
            Transaction::once(300.0, "food", at(2026, 3, 5)),
            Transaction::once(200.0, "food", at(2026, 3, 6)),
            Transaction::once(500.0, "bills", at(2026, 3, 7)),
            Transaction::once(500.0, "transport", at(2026, 3, 8)),
            Transaction::once(100.0, "shopping", at(2026, 3, 9)),
        ];

        let snap = aggregate(&[], &expenses, end, 30);
        let names: Vec<&str> = snap.by_category.iter().map(|c| c.category.as_str()).collect();
        // food = 500 ties with bills and transport; ties rank alphabetically
        assert_eq!(names, vec!["bills", "food", "transport", "shopping"]);
        assert_eq!(snap.top_categories.len(), 3);
    }

    #[test]
    fn test_largest_expenses_capped() {
        let end = at(2026, 3, 31);
        let expenses: Vec<Transaction> = (1..=8)
            .map(|i| Transaction::once(i as f64 * 10.0, "misc", at(2026, 3, i)))
            .collect();

        let snap = aggregate(&[], &expenses, end, 30);
        assert_eq!(snap.largest_expenses.len(), 5);
        assert_eq!(snap.largest_expenses[0].amount, 80.0);
        assert_eq!(snap.largest_expenses[4].amount, 40.0);
    }

    #[test]
    fn test_daily_expense_series() {
        let end = at(2026, 3, 10);
        let expenses = vec![
            Transaction::once(100.0, "food", at(2026, 3, 10) - Duration::hours(1)),
            Transaction::once(40.0, "food", at(2026, 3, 9) - Duration::hours(1)),
            Transaction::once(25.0, "food", at(2026, 3, 4) - Duration::hours(1)),
        ];

        let series = daily_expense_series(&expenses, end, 7);
        assert_eq!(series.len(), 7);
        assert_eq!(series[6], 100.0);
        assert_eq!(series[5], 40.0);
        assert_eq!(series[0], 25.0);
        assert_eq!(series[1..5].iter().sum::<f64>(), 0.0);
    }
}
