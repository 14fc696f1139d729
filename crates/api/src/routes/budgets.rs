//! Monthly budget routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::budget::{BudgetError as BudgetRuleError, validate_period};
use fintrack_db::{
    BudgetRepository,
    repositories::{BudgetInput, BudgetWithProgress},
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route(
            "/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

/// Request body for creating or replacing a budget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    /// Expense category.
    pub category: String,
    /// Month, 1..=12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Amount budgeted for the month.
    pub budget_amount: Decimal,
}

impl BudgetRequest {
    fn into_input(self, state: &AppState) -> Result<BudgetInput, ApiError> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(BudgetRuleError::MissingCategory.into());
        }
        if self.budget_amount < Decimal::ZERO {
            return Err(BudgetRuleError::NegativeAmount.into());
        }
        validate_period(self.month, self.year, state.today())?;

        Ok(BudgetInput {
            category: category.to_string(),
            month: self.month,
            year: self.year,
            budget_amount: self.budget_amount,
        })
    }
}

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    /// Only this month.
    pub month: Option<u32>,
    /// Only this year.
    pub year: Option<i32>,
}

/// A budget with its derived spending.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: Uuid,
    /// Category.
    pub category: String,
    /// Month.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Budgeted amount.
    pub budget_amount: Decimal,
    /// Expenses in the category during the month.
    pub spent_amount: Decimal,
    /// Budget minus spent.
    pub remaining_amount: Decimal,
    /// Spent as a percentage of the budget.
    pub progress_percent: Decimal,
    /// Whether spending exceeded the budget.
    pub over_budget: bool,
    /// `Over Budget` or `On Track`.
    pub status: &'static str,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<BudgetWithProgress> for BudgetResponse {
    fn from(item: BudgetWithProgress) -> Self {
        let BudgetWithProgress { budget, progress } = item;
        Self {
            id: budget.id,
            status: progress.status_label(),
            category: budget.category,
            month: progress.month,
            year: budget.year,
            budget_amount: budget.budget_amount,
            spent_amount: progress.spent_amount,
            remaining_amount: progress.remaining_amount,
            progress_percent: progress.progress_percent,
            over_budget: progress.over_budget,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

/// POST /budgets
async fn create_budget(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input(&state)?;
    let repo = BudgetRepository::new(state.conn());
    let created = repo.create(user.user_id(), input).await?;

    info!(
        user_id = %user.user_id(),
        budget_id = %created.id,
        category = %created.category,
        "Budget created"
    );

    let with_spent = repo.find_with_spent(user.user_id(), created.id).await?;
    Ok((StatusCode::CREATED, Json(BudgetResponse::from(with_spent))))
}

/// GET /budgets?month&year
async fn list_budgets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let budgets = BudgetRepository::new(state.conn())
        .list_with_spent(user.user_id(), query.month, query.year)
        .await?;
    Ok(Json(
        budgets
            .into_iter()
            .map(BudgetResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /budgets/{id}
async fn get_budget(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let budget = BudgetRepository::new(state.conn())
        .find_with_spent(user.user_id(), id)
        .await?;
    Ok(Json(BudgetResponse::from(budget)))
}

/// PUT /budgets/{id}
async fn update_budget(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input(&state)?;
    let repo = BudgetRepository::new(state.conn());
    repo.update(user.user_id(), id, input).await?;

    info!(user_id = %user.user_id(), budget_id = %id, "Budget updated");

    let with_spent = repo.find_with_spent(user.user_id(), id).await?;
    Ok(Json(BudgetResponse::from(with_spent)))
}

/// DELETE /budgets/{id}
async fn delete_budget(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    BudgetRepository::new(state.conn())
        .delete(user.user_id(), id)
        .await?;

    info!(user_id = %user.user_id(), budget_id = %id, "Budget deleted");
    Ok(StatusCode::NO_CONTENT)
}
