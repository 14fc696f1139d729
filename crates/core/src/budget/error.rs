//! Budget error types.

use thiserror::Error;

/// Errors raised by budget rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Month outside 1..=12.
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    /// Year outside the supported window.
    #[error("Invalid year {year}: must be between {min} and {max}")]
    InvalidYear {
        /// Requested year.
        year: i32,
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },

    /// Category is blank.
    #[error("Category is required")]
    MissingCategory,

    /// Amount cannot be negative.
    #[error("Budget amount cannot be negative")]
    NegativeAmount,
}
