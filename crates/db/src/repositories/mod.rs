//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod report;
pub mod savings_goal;
pub mod transaction;
pub mod user;
pub mod user_profile;

pub use budget::{BudgetError, BudgetInput, BudgetRepository, BudgetWithProgress};
pub use report::{ReportError, ReportRepository};
pub use savings_goal::{CreateGoalInput, SavingsGoalError, SavingsGoalRepository, UpdateGoalInput};
pub use transaction::{TransactionInput, TransactionRepository};
pub use user::{CreateUserInput, FinancialProfileUpdate, UserRepository};
pub use user_profile::{ProfileError, ProfileUpdate, UserProfileRepository};
