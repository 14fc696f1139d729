//! Income and expense records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(TransactionError::InvalidKind(s.to_string())),
        }
    }
}

/// Validation failures for transaction input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// Unknown transaction type.
    #[error("Invalid transaction type: {0}. Expected INCOME or EXPENSE")]
    InvalidKind(String),

    /// Title is blank.
    #[error("Title is required")]
    MissingTitle,

    /// Category is blank.
    #[error("Category is required")]
    MissingCategory,

    /// Amount is below zero.
    #[error("Amount cannot be negative")]
    NegativeAmount,
}

/// A transaction as seen by analytics and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Date the transaction happened.
    pub date: NaiveDate,
    /// Short label.
    pub title: String,
    /// Spending or income category.
    pub category: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Free-form notes.
    pub description: Option<String>,
}

impl TransactionRecord {
    /// Whether this record is income.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Whether this record is an expense.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Checks the fields every create or update must satisfy.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_transaction(
    title: &str,
    category: &str,
    amount: Decimal,
) -> Result<(), TransactionError> {
    if title.trim().is_empty() {
        return Err(TransactionError::MissingTitle);
    }
    if category.trim().is_empty() {
        return Err(TransactionError::MissingCategory);
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TransactionError::NegativeAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_parsing_is_case_insensitive() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" EXPENSE ".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert_eq!(
            "transfer".parse::<TransactionKind>(),
            Err(TransactionError::InvalidKind("transfer".into()))
        );
    }

    #[test]
    fn test_kind_serializes_uppercase() {
        let json = serde_json::to_string(&TransactionKind::Expense).unwrap();
        assert_eq!(json, "\"EXPENSE\"");
    }

    #[test]
    fn test_validate_transaction() {
        assert!(validate_transaction("Rent", "Housing", dec!(15000)).is_ok());
        assert!(validate_transaction("Gift", "Other", dec!(0)).is_ok());
        assert_eq!(
            validate_transaction("  ", "Housing", dec!(1)),
            Err(TransactionError::MissingTitle)
        );
        assert_eq!(
            validate_transaction("Rent", "", dec!(1)),
            Err(TransactionError::MissingCategory)
        );
        assert_eq!(
            validate_transaction("Rent", "Housing", dec!(-0.01)),
            Err(TransactionError::NegativeAmount)
        );
    }
}
