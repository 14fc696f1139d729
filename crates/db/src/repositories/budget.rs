//! Budget repository for budget database operations.
//!
//! Spent amounts are never stored: they are derived from the user's expense
//! transactions each time budgets are read with progress.

use chrono::Utc;
use fintrack_core::budget::{BudgetProgress, spent_in_month};
use fintrack_core::transaction::{TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use super::transaction::to_records;
use crate::entities::{budgets, sea_orm_active_enums::TransactionType, transactions};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found for this user.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// A budget already exists for the category and month.
    #[error("A budget for {category} in {month}/{year} already exists")]
    Duplicate {
        /// Category.
        category: String,
        /// Month, 1..=12.
        month: u32,
        /// Year.
        year: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or replacing a budget.
#[derive(Debug, Clone)]
pub struct BudgetInput {
    /// Expense category the budget covers.
    pub category: String,
    /// Month, 1..=12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Budgeted amount.
    pub budget_amount: Decimal,
}

/// A stored budget together with its derived spending.
#[derive(Debug, Clone)]
pub struct BudgetWithProgress {
    /// Budget record.
    pub budget: budgets::Model,
    /// Derived figures.
    pub progress: BudgetProgress,
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_period(
        &self,
        user_id: Uuid,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<budgets::Model>, DbErr> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(budgets::Column::Category)))
                    .eq(category.to_ascii_lowercase()),
            )
            .filter(budgets::Column::Month.eq(month_column(month)))
            .filter(budgets::Column::Year.eq(year))
            .one(&self.db)
            .await
    }

    /// Creates a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Duplicate` if the user already has a budget for
    /// the category and month.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: BudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        if self
            .find_period(user_id, &input.category, input.month, input.year)
            .await?
            .is_some()
        {
            return Err(BudgetError::Duplicate {
                category: input.category,
                month: input.month,
                year: input.year,
            });
        }

        let now = Utc::now().into();
        let model = budgets::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            category: Set(input.category),
            month: Set(month_column(input.month)),
            year: Set(input.year),
            budget_amount: Set(input.budget_amount),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a budget owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist for this user.
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<budgets::Model, BudgetError> {
        budgets::Entity::find_by_id(id)
            .filter(budgets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id))
    }

    /// Lists a user's budgets, newest period first, optionally narrowed to a
    /// month and/or year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<budgets::Model>, BudgetError> {
        let mut query = budgets::Entity::find().filter(budgets::Column::UserId.eq(user_id));
        if let Some(month) = month {
            query = query.filter(budgets::Column::Month.eq(month_column(month)));
        }
        if let Some(year) = year {
            query = query.filter(budgets::Column::Year.eq(year));
        }

        Ok(query
            .order_by_desc(budgets::Column::Year)
            .order_by_desc(budgets::Column::Month)
            .order_by_asc(budgets::Column::Category)
            .all(&self.db)
            .await?)
    }

    /// Replaces a budget's fields.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` or, when the new period collides with
    /// another budget, `BudgetError::Duplicate`.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: BudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = self.find(user_id, id).await?;

        if let Some(other) = self
            .find_period(user_id, &input.category, input.month, input.year)
            .await?
        {
            if other.id != id {
                return Err(BudgetError::Duplicate {
                    category: input.category,
                    month: input.month,
                    year: input.year,
                });
            }
        }

        let mut active: budgets::ActiveModel = budget.into();
        active.category = Set(input.category);
        active.month = Set(month_column(input.month));
        active.year = Set(input.year);
        active.budget_amount = Set(input.budget_amount);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist for this user.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), BudgetError> {
        let budget = self.find(user_id, id).await?;
        budget.delete(&self.db).await?;
        Ok(())
    }

    /// Budgets with derived spending, filtered like [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn list_with_spent(
        &self,
        user_id: Uuid,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<BudgetWithProgress>, BudgetError> {
        let budgets = self.list(user_id, month, year).await?;
        if budgets.is_empty() {
            return Ok(Vec::new());
        }
        let expenses = self.expense_records(user_id).await?;

        Ok(budgets
            .into_iter()
            .map(|budget| {
                let progress = progress_of(&budget, &expenses);
                BudgetWithProgress { budget, progress }
            })
            .collect())
    }

    /// One budget with derived spending.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist for this user.
    pub async fn find_with_spent(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<BudgetWithProgress, BudgetError> {
        let budget = self.find(user_id, id).await?;
        let expenses = self.expense_records(user_id).await?;
        let progress = progress_of(&budget, &expenses);
        Ok(BudgetWithProgress { budget, progress })
    }

    async fn expense_records(&self, user_id: Uuid) -> Result<Vec<TransactionRecord>, DbErr> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(
                transactions::Column::TransactionType
                    .eq(TransactionType::from(TransactionKind::Expense)),
            )
            .all(&self.db)
            .await?;
        Ok(to_records(&models))
    }
}

fn progress_of(budget: &budgets::Model, expenses: &[TransactionRecord]) -> BudgetProgress {
    let month = budget.month_number();
    let spent = spent_in_month(expenses, &budget.category, budget.year, month);
    BudgetProgress::new(
        &budget.category,
        month,
        budget.year,
        budget.budget_amount,
        spent,
    )
}

fn month_column(month: u32) -> i32 {
    i32::try_from(month).unwrap_or_default()
}
