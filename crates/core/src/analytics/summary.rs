//! Totals, category breakdowns and count statistics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{TransactionKind, TransactionRecord};

/// Income, expense and balance over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// Sum of income.
    pub total_income: Decimal,
    /// Sum of expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
    /// Number of transactions considered.
    pub transaction_count: usize,
}

impl FinancialSummary {
    /// Builds a summary from records.
    #[must_use]
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let (income, expenses) =
            records
                .iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), r| match r.kind {
                    TransactionKind::Income => (inc + r.amount, exp),
                    TransactionKind::Expense => (inc, exp + r.amount),
                });

        Self {
            total_income: income,
            total_expenses: expenses,
            balance: income - expenses,
            transaction_count: records.len(),
        }
    }

    /// Share of income kept after expenses, as a percentage (2 dp).
    ///
    /// `None` when there is no income.
    #[must_use]
    pub fn savings_rate(&self) -> Option<Decimal> {
        if self.total_income.is_zero() {
            return None;
        }
        Some((self.balance / self.total_income * Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Expenses as a percentage of income (2 dp).
    ///
    /// `None` when there is no income.
    #[must_use]
    pub fn expense_ratio(&self) -> Option<Decimal> {
        if self.total_income.is_zero() {
            return None;
        }
        Some((self.total_expenses / self.total_income * Decimal::ONE_HUNDRED).round_dp(2))
    }
}

/// Total for a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Sum of amounts.
    pub amount: Decimal,
    /// Number of transactions.
    pub transaction_count: usize,
    /// Share of the total for the same kind, two decimal places.
    pub percentage: Decimal,
}

/// Groups records of one kind by category, largest total first.
#[must_use]
pub fn category_breakdown(records: &[TransactionRecord], kind: TransactionKind) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.kind == kind) {
        let entry = groups.entry(record.category.as_str()).or_default();
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let total: Decimal = groups.values().map(|(amount, _)| *amount).sum();

    let mut breakdown: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.to_string(),
            amount,
            transaction_count: count,
            percentage: if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount / total * Decimal::ONE_HUNDRED).round_dp(2)
            },
        })
        .collect();

    // BTreeMap order makes ties fall back to the category name.
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));
    breakdown
}

/// Transaction counts by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatistics {
    /// All transactions.
    pub total_transactions: usize,
    /// Income transactions.
    pub income_transactions: usize,
    /// Expense transactions.
    pub expense_transactions: usize,
    /// Income share of the count (2 dp).
    pub income_percentage: Decimal,
    /// Expense share of the count (2 dp).
    pub expense_percentage: Decimal,
}

impl TransactionStatistics {
    /// Counts records by kind.
    #[must_use]
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let total = records.len();
        let income = records.iter().filter(|r| r.is_income()).count();
        let expense = total - income;

        let share = |part: usize| {
            if total == 0 {
                Decimal::ZERO
            } else {
                (Decimal::from(part) / Decimal::from(total) * Decimal::ONE_HUNDRED).round_dp(2)
            }
        };

        Self {
            total_transactions: total,
            income_transactions: income,
            expense_transactions: expense,
            income_percentage: share(income),
            expense_percentage: share(expense),
        }
    }
}
