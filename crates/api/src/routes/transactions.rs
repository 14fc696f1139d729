//! Transaction routes: CRUD, filtered lists and analytics.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::analytics::{
    CategoryTotal, FinancialSummary, TransactionStatistics, category_breakdown, monthly_trends,
};
use fintrack_core::budget::month_bounds;
use fintrack_core::export::DateRange;
use fintrack_core::transaction::{TransactionKind, validate_transaction};
use fintrack_db::{
    ReportRepository, TransactionRepository,
    entities::transactions,
    repositories::{TransactionInput, transaction::to_records},
};
use fintrack_shared::types::{PageRequest, PageResponse};

const DEFAULT_RECENT: u64 = 10;
const MAX_RECENT: u64 = 100;
const DEFAULT_TREND_MONTHS: u32 = 6;
const MAX_TREND_MONTHS: u32 = 60;

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/paged", get(list_paged))
        .route("/type/{kind}", get(list_by_type))
        .route("/category/{category}", get(list_by_category))
        .route("/date-range", get(list_by_date_range))
        .route("/summary", get(summary))
        .route("/summary/{year}/{month}", get(monthly_summary))
        .route("/breakdown/expenses", get(expense_breakdown))
        .route("/breakdown/income", get(income_breakdown))
        .route("/recent", get(recent))
        .route("/statistics", get(statistics))
        .route("/trends", get(trends))
        .route("/health", get(health))
        .route(
            "/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or replacing a transaction.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Short label.
    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Category.
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: String,
    /// `INCOME` or `EXPENSE`, any case.
    #[serde(rename = "type")]
    pub kind: String,
    /// Calendar date of the transaction.
    pub transaction_date: NaiveDate,
    /// Optional notes.
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl TransactionRequest {
    fn into_input(self) -> Result<TransactionInput, ApiError> {
        self.validate()?;
        let kind = self.kind.parse::<TransactionKind>()?;
        validate_transaction(&self.title, &self.category, self.amount)?;

        Ok(TransactionInput {
            title: self.title.trim().to_string(),
            amount: self.amount,
            category: self.category.trim().to_string(),
            kind,
            transaction_date: self.transaction_date,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// A stored transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Short label.
    pub title: String,
    /// Amount.
    pub amount: Decimal,
    /// Category.
    pub category: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Calendar date.
    pub transaction_date: NaiveDate,
    /// Notes.
    pub description: Option<String>,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            amount: model.amount,
            category: model.category,
            kind: model.transaction_type.into(),
            transaction_date: model.transaction_date,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn to_responses(models: Vec<transactions::Model>) -> Vec<TransactionResponse> {
    models.into_iter().map(TransactionResponse::from).collect()
}

/// Query parameters for date-range listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// First day included.
    pub start_date: NaiveDate,
    /// Last day included.
    pub end_date: NaiveDate,
}

/// Query parameters for recent transactions.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// Number of transactions to return.
    pub limit: Option<u64>,
}

/// Query parameters for monthly trends.
#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    /// Number of months ending with the current one.
    pub months: Option<u32>,
}

fn not_found() -> ApiError {
    ApiError::not_found("Transaction not found")
}

// ============================================================================
// CRUD
// ============================================================================

/// POST /transactions - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input()?;
    let created = TransactionRepository::new(state.conn())
        .create(user.user_id(), input)
        .await?;

    info!(
        user_id = %user.user_id(),
        transaction_id = %created.id,
        amount = %created.amount,
        "Transaction created"
    );

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(created))))
}

/// GET /transactions - All of the caller's transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let items = TransactionRepository::new(state.conn())
        .list_for_user(user.user_id())
        .await?;
    Ok(Json(to_responses(items)))
}

/// GET /transactions/paged - One page of transactions.
async fn list_paged(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let (items, total) = TransactionRepository::new(state.conn())
        .list_paginated(user.user_id(), &page)
        .await?;

    Ok(Json(PageResponse::new(
        to_responses(items),
        page.page,
        page.per_page,
        total,
    )))
}

/// GET /transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let found = TransactionRepository::new(state.conn())
        .find_by_id_for_user(user.user_id(), id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(TransactionResponse::from(found)))
}

/// PUT /transactions/{id} - Replace a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input()?;
    let updated = TransactionRepository::new(state.conn())
        .update(user.user_id(), id, input)
        .await?
        .ok_or_else(not_found)?;

    info!(user_id = %user.user_id(), transaction_id = %id, "Transaction updated");
    Ok(Json(TransactionResponse::from(updated)))
}

/// DELETE /transactions/{id}
async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !TransactionRepository::new(state.conn())
        .delete(user.user_id(), id)
        .await?
    {
        return Err(not_found());
    }

    info!(user_id = %user.user_id(), transaction_id = %id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Filtered lists
// ============================================================================

/// GET /transactions/type/{kind}
async fn list_by_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = kind.parse::<TransactionKind>()?;
    let items = TransactionRepository::new(state.conn())
        .list_by_type(user.user_id(), kind)
        .await?;
    Ok(Json(to_responses(items)))
}

/// GET /transactions/category/{category}
async fn list_by_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let items = TransactionRepository::new(state.conn())
        .list_by_category(user.user_id(), &category)
        .await?;
    Ok(Json(to_responses(items)))
}

/// GET /transactions/date-range?startDate&endDate
async fn list_by_date_range(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(Some(query.start_date), Some(query.end_date));
    range.validate()?;

    let items = TransactionRepository::new(state.conn())
        .list_in_range(user.user_id(), &range)
        .await?;
    Ok(Json(to_responses(items)))
}

/// GET /transactions/recent?limit
async fn recent(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT).clamp(1, MAX_RECENT);
    let items = TransactionRepository::new(state.conn())
        .recent(user.user_id(), limit)
        .await?;
    Ok(Json(to_responses(items)))
}

// ============================================================================
// Analytics
// ============================================================================

/// GET /transactions/summary - Totals over all transactions.
async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let records = TransactionRepository::new(state.conn())
        .records_for_user(user.user_id())
        .await?;
    Ok(Json(FinancialSummary::from_records(&records)))
}

/// GET /transactions/summary/{year}/{month} - Totals for one month.
async fn monthly_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, ApiError> {
    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| ApiError::validation(format!("Invalid month {month}/{year}")))?;

    let items = TransactionRepository::new(state.conn())
        .list_in_range(user.user_id(), &DateRange::new(Some(start), Some(end)))
        .await?;
    Ok(Json(FinancialSummary::from_records(&to_records(&items))))
}

/// GET /transactions/breakdown/expenses
async fn expense_breakdown(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    breakdown(&state, &user, TransactionKind::Expense).await
}

/// GET /transactions/breakdown/income
async fn income_breakdown(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    breakdown(&state, &user, TransactionKind::Income).await
}

async fn breakdown(
    state: &AppState,
    user: &AuthUser,
    kind: TransactionKind,
) -> Result<Json<Vec<CategoryTotal>>, ApiError> {
    let records = TransactionRepository::new(state.conn())
        .records_for_user(user.user_id())
        .await?;
    Ok(Json(category_breakdown(&records, kind)))
}

/// GET /transactions/statistics - Transaction counts by type.
async fn statistics(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let records = TransactionRepository::new(state.conn())
        .records_for_user(user.user_id())
        .await?;
    Ok(Json(TransactionStatistics::from_records(&records)))
}

/// GET /transactions/trends?months - Income and expenses per month.
async fn trends(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TrendsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let months = query
        .months
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .clamp(1, MAX_TREND_MONTHS);
    let records = TransactionRepository::new(state.conn())
        .records_for_user(user.user_id())
        .await?;
    Ok(Json(monthly_trends(&records, months, state.today())))
}

/// GET /transactions/health - Financial health assessment.
async fn health(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let data = ReportRepository::new(state.conn())
        .load_dataset(
            user.user_id(),
            DateRange::all_time(),
            state.today(),
            &state.default_currency,
        )
        .await?;
    Ok(Json(data.health()))
}
