//! Budget progress calculations.
//!
//! A budget's spent amount is never stored: it is the sum of the owner's
//! expenses in the budget's category during the budget month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use crate::transaction::TransactionRecord;

/// Earliest year a budget or budget report may refer to.
pub const MIN_BUDGET_YEAR: i32 = 2000;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a month (1-based). Out-of-range months yield an empty string.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
        .unwrap_or("")
}

/// First and last day of a calendar month.
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Validates a budget period against `today`.
///
/// # Errors
///
/// Returns `BudgetError::InvalidMonth` for months outside 1..=12 and
/// `BudgetError::InvalidYear` for years before 2000 or after next year.
pub fn validate_period(month: u32, year: i32, today: NaiveDate) -> Result<(), BudgetError> {
    if !(1..=12).contains(&month) {
        return Err(BudgetError::InvalidMonth(month));
    }
    let max = today.year() + 1;
    if year < MIN_BUDGET_YEAR || year > max {
        return Err(BudgetError::InvalidYear {
            year,
            min: MIN_BUDGET_YEAR,
            max,
        });
    }
    Ok(())
}

/// Sums expenses in `category` dated within the given month.
///
/// Categories compare case-insensitively.
#[must_use]
pub fn spent_in_month(
    records: &[TransactionRecord],
    category: &str,
    year: i32,
    month: u32,
) -> Decimal {
    records
        .iter()
        .filter(|r| r.is_expense())
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .filter(|r| r.category.eq_ignore_ascii_case(category))
        .map(|r| r.amount)
        .sum()
}

/// A budget together with its derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    /// Budget category.
    pub category: String,
    /// Month (1-12).
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Budgeted amount.
    pub budget_amount: Decimal,
    /// Amount spent in the month.
    pub spent_amount: Decimal,
    /// Budget minus spent; negative when over budget.
    pub remaining_amount: Decimal,
    /// Spent as a percentage of the budget, two decimal places.
    pub progress_percent: Decimal,
    /// Whether spending exceeded the budget.
    pub over_budget: bool,
}

impl BudgetProgress {
    /// Derives progress figures from the budget amount and spent amount.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        month: u32,
        year: i32,
        budget_amount: Decimal,
        spent_amount: Decimal,
    ) -> Self {
        let progress_percent = if budget_amount.is_zero() {
            Decimal::ZERO
        } else {
            (spent_amount / budget_amount * Decimal::ONE_HUNDRED).round_dp(2)
        };

        Self {
            category: category.into(),
            month,
            year,
            budget_amount,
            spent_amount,
            remaining_amount: budget_amount - spent_amount,
            progress_percent,
            over_budget: spent_amount > budget_amount,
        }
    }

    /// Status shown in reports.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.over_budget {
            "Over Budget"
        } else {
            "On Track"
        }
    }

    /// English name of the budget month.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Aggregate figures across several budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    /// Sum of budgeted amounts.
    pub total_budget: Decimal,
    /// Sum of spent amounts.
    pub total_spent: Decimal,
    /// Total budget minus total spent.
    pub remaining: Decimal,
    /// Number of budgets over their limit.
    pub over_budget_count: usize,
}

impl BudgetTotals {
    /// Sums a set of budgets.
    #[must_use]
    pub fn from_progress(budgets: &[BudgetProgress]) -> Self {
        let total_budget: Decimal = budgets.iter().map(|b| b.budget_amount).sum();
        let total_spent: Decimal = budgets.iter().map(|b| b.spent_amount).sum();
        Self {
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
            over_budget_count: budgets.iter().filter(|b| b.over_budget).count(),
        }
    }
}
