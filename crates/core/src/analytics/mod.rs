//! Aggregations over transactions: summaries, breakdowns, trends and the
//! financial health assessment.

pub mod health;
pub mod summary;
pub mod trends;

#[cfg(test)]
mod tests;

pub use health::{FactorScores, FinancialHealth, HealthRating};
pub use summary::{CategoryTotal, FinancialSummary, TransactionStatistics, category_breakdown};
pub use trends::{MonthlyTrend, monthly_trends};
