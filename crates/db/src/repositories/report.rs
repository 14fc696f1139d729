//! Loads everything a report needs for one user.

use chrono::NaiveDate;
use fintrack_core::budget::BudgetProgress;
use fintrack_core::export::{DateRange, ExportContext, ExportDataset};
use fintrack_core::goals::GoalRecord;
use sea_orm::{DatabaseConnection, DbErr};
use tracing::debug;
use uuid::Uuid;

use super::budget::{BudgetError, BudgetRepository};
use super::savings_goal::SavingsGoalRepository;
use super::transaction::{TransactionRepository, to_records};
use super::user::UserRepository;
use super::user_profile::UserProfileRepository;

/// Error types for report loading.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Budget lookup failed.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report data loader.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Username and currency of the report recipient.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::UserNotFound` for an unknown user.
    pub async fn load_context(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        default_currency: &str,
    ) -> Result<ExportContext, ReportError> {
        let user = UserRepository::new(self.db.clone())
            .find_by_id(user_id)
            .await?
            .ok_or(ReportError::UserNotFound(user_id))?;
        let currency = UserProfileRepository::new(self.db.clone())
            .preferred_currency(user_id, default_currency)
            .await?;

        Ok(ExportContext {
            username: user.username,
            currency,
            today,
        })
    }

    /// Loads transactions, budgets and goals for a range-based export.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::UserNotFound` for an unknown user.
    pub async fn load_dataset(
        &self,
        user_id: Uuid,
        range: DateRange,
        today: NaiveDate,
        default_currency: &str,
    ) -> Result<ExportDataset, ReportError> {
        let context = self.load_context(user_id, today, default_currency).await?;

        let all = TransactionRepository::new(self.db.clone())
            .list_for_user(user_id)
            .await?;
        let all_transactions = to_records(&all);
        let transactions = all_transactions
            .iter()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect::<Vec<_>>();

        let budgets = self.budgets(user_id, None, None).await?;
        let goals = self.goals(user_id).await?;

        debug!(
            user_id = %user_id,
            transactions = transactions.len(),
            budgets = budgets.len(),
            goals = goals.len(),
            "loaded export dataset"
        );

        Ok(ExportDataset {
            context,
            range,
            transactions,
            all_transactions,
            budgets,
            goals,
        })
    }

    /// Budgets with derived spending, optionally for one month.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn budgets(
        &self,
        user_id: Uuid,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<BudgetProgress>, ReportError> {
        Ok(BudgetRepository::new(self.db.clone())
            .list_with_spent(user_id, month, year)
            .await?
            .into_iter()
            .map(|b| b.progress)
            .collect())
    }

    /// All goals of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn goals(&self, user_id: Uuid) -> Result<Vec<GoalRecord>, ReportError> {
        Ok(SavingsGoalRepository::new(self.db.clone())
            .records(user_id)
            .await?)
    }
}
