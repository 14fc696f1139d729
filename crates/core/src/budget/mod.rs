//! Monthly category budgets and their progress.

pub mod error;
pub mod progress;


pub use error::BudgetError;
pub use progress::{
    BudgetProgress, BudgetTotals, MIN_BUDGET_YEAR, month_bounds, month_name, spent_in_month,
    validate_period,
};
