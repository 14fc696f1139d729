//! Month-by-month income and expense trends.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{TransactionKind, TransactionRecord};

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Income in the month.
    pub total_income: Decimal,
    /// Expenses in the month.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net: Decimal,
}

impl MonthlyTrend {
    /// Short label such as `3/2024`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

/// Totals for the `months` calendar months ending with the month of `today`,
/// oldest first. Months without activity are reported with zeros.
#[must_use]
pub fn monthly_trends(records: &[TransactionRecord], months: u32, today: NaiveDate) -> Vec<MonthlyTrend> {
    let current = month_index(today.year(), today.month());

    (0..i64::from(months))
        .rev()
        .map(|back| {
            let index = current - back;
            let (year, month) = from_month_index(index);

            let (income, expenses) = records
                .iter()
                .filter(|r| month_index(r.date.year(), r.date.month()) == index)
                .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), r| match r.kind {
                    TransactionKind::Income => (inc + r.amount, exp),
                    TransactionKind::Expense => (inc, exp + r.amount),
                });

            MonthlyTrend {
                year,
                month,
                total_income: income,
                total_expenses: expenses,
                net: income - expenses,
            }
        })
        .collect()
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

fn from_month_index(index: i64) -> (i32, u32) {
    let year = i32::try_from(index.div_euclid(12)).unwrap_or(i32::MAX);
    let month = u32::try_from(index.rem_euclid(12) + 1).unwrap_or(1);
    (year, month)
}
