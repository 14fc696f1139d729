//! Savings goal repository.

use chrono::{NaiveDate, Utc};
use fintrack_core::goals::{
    GoalError, GoalRecord, GoalStatus as CoreGoalStatus, GoalSummary, apply_contribution,
    validate_goal,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{savings_goals, sea_orm_active_enums::GoalStatus};

/// Error types for savings goal operations.
#[derive(Debug, thiserror::Error)]
pub enum SavingsGoalError {
    /// Goal not found for this user.
    #[error("Savings goal not found: {0}")]
    NotFound(Uuid),

    /// The change breaks a goal rule.
    #[error(transparent)]
    Invalid(#[from] GoalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    /// Goal name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount already saved.
    pub current_amount: Decimal,
    /// Optional deadline.
    pub target_date: Option<NaiveDate>,
}

/// Partial update of a goal. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateGoalInput {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New target.
    pub target_amount: Option<Decimal>,
    /// New saved amount.
    pub current_amount: Option<Decimal>,
    /// New deadline; `Some(None)` clears it.
    pub target_date: Option<Option<NaiveDate>>,
    /// New status.
    pub status: Option<CoreGoalStatus>,
}

/// Savings goal repository.
#[derive(Debug, Clone)]
pub struct SavingsGoalRepository {
    db: DatabaseConnection,
}

impl SavingsGoalRepository {
    /// Creates a new savings goal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a goal in progress, or completed when the saved amount already
    /// meets the target.
    ///
    /// # Errors
    ///
    /// Returns `SavingsGoalError::Invalid` for a missing name, a non-positive
    /// target or a negative saved amount.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateGoalInput,
    ) -> Result<savings_goals::Model, SavingsGoalError> {
        validate_goal(&input.name, input.target_amount, input.current_amount)?;

        let status = if input.current_amount >= input.target_amount {
            GoalStatus::Completed
        } else {
            GoalStatus::InProgress
        };
        let now = Utc::now().into();
        let model = savings_goals::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            target_amount: Set(input.target_amount),
            current_amount: Set(input.current_amount),
            target_date: Set(input.target_date),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a goal owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `SavingsGoalError::NotFound` if it does not exist for this user.
    pub async fn find(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<savings_goals::Model, SavingsGoalError> {
        savings_goals::Entity::find_by_id(id)
            .filter(savings_goals::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(SavingsGoalError::NotFound(id))
    }

    /// Lists a user's goals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<savings_goals::Model>, DbErr> {
        savings_goals::Entity::find()
            .filter(savings_goals::Column::UserId.eq(user_id))
            .order_by_desc(savings_goals::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists a user's goals with one status, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_status(
        &self,
        user_id: Uuid,
        status: CoreGoalStatus,
    ) -> Result<Vec<savings_goals::Model>, DbErr> {
        savings_goals::Entity::find()
            .filter(savings_goals::Column::UserId.eq(user_id))
            .filter(savings_goals::Column::Status.eq(GoalStatus::from(status)))
            .order_by_desc(savings_goals::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `SavingsGoalError::NotFound`, or `SavingsGoalError::Invalid`
    /// when the merged goal breaks a rule.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateGoalInput,
    ) -> Result<savings_goals::Model, SavingsGoalError> {
        let goal = self.find(user_id, id).await?;

        let name = input.name.unwrap_or_else(|| goal.name.clone());
        let target = input.target_amount.unwrap_or(goal.target_amount);
        let current = input.current_amount.unwrap_or(goal.current_amount);
        validate_goal(&name, target, current)?;

        let mut active: savings_goals::ActiveModel = goal.into();
        active.name = Set(name.trim().to_string());
        active.target_amount = Set(target);
        active.current_amount = Set(current);
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(target_date) = input.target_date {
            active.target_date = Set(target_date);
        }
        if let Some(status) = input.status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Adds money to a goal, completing it when the target is reached.
    ///
    /// # Errors
    ///
    /// Returns `SavingsGoalError::NotFound`, or `SavingsGoalError::Invalid`
    /// for a non-positive amount or a closed goal.
    pub async fn contribute(
        &self,
        user_id: Uuid,
        id: Uuid,
        amount: Decimal,
    ) -> Result<savings_goals::Model, SavingsGoalError> {
        let goal = self.find(user_id, id).await?;
        let (current, status) = apply_contribution(
            goal.current_amount,
            goal.target_amount,
            amount,
            goal.status.into(),
        )?;

        let mut active: savings_goals::ActiveModel = goal.into();
        active.current_amount = Set(current);
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a goal.
    ///
    /// # Errors
    ///
    /// Returns `SavingsGoalError::NotFound` if it does not exist for this user.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), SavingsGoalError> {
        let goal = self.find(user_id, id).await?;
        goal.delete(&self.db).await?;
        Ok(())
    }

    /// Number of a user's goals with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_by_status(
        &self,
        user_id: Uuid,
        status: CoreGoalStatus,
    ) -> Result<u64, DbErr> {
        savings_goals::Entity::find()
            .filter(savings_goals::Column::UserId.eq(user_id))
            .filter(savings_goals::Column::Status.eq(GoalStatus::from(status)))
            .count(&self.db)
            .await
    }

    /// A user's goals as analytics records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn records(&self, user_id: Uuid) -> Result<Vec<GoalRecord>, DbErr> {
        Ok(self.list(user_id).await?.iter().map(GoalRecord::from).collect())
    }

    /// Counts and in-progress totals across a user's goals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(&self, user_id: Uuid) -> Result<GoalSummary, DbErr> {
        Ok(GoalSummary::from_goals(&self.records(user_id).await?))
    }
}
