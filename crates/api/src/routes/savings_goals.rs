//! Savings goal routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::goals::{GoalProgress, GoalStatus};
use fintrack_db::{
    SavingsGoalRepository,
    entities::savings_goals,
    repositories::{CreateGoalInput, UpdateGoalInput},
};

/// Creates the savings goal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/summary", get(summary))
        .route(
            "/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/{id}/contribute", post(contribute))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a goal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    /// Goal name.
    #[validate(length(min = 1, max = 100, message = "Goal name must be between 1 and 100 characters"))]
    pub name: String,
    /// Optional description.
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount already saved.
    #[serde(default)]
    pub current_amount: Decimal,
    /// Optional deadline.
    pub target_date: Option<NaiveDate>,
}

/// Request body for a partial goal update. An empty description clears it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    /// New name.
    #[validate(length(min = 1, max = 100, message = "Goal name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New target.
    pub target_amount: Option<Decimal>,
    /// New saved amount.
    pub current_amount: Option<Decimal>,
    /// New deadline.
    pub target_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<String>,
}

/// Request body for a contribution.
#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    /// Amount to add.
    pub amount: Decimal,
}

/// Query parameters for listing goals.
#[derive(Debug, Deserialize)]
pub struct ListGoalsQuery {
    /// Only goals with this status.
    pub status: Option<String>,
}

/// A goal with its derived progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    /// Goal ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount saved.
    pub current_amount: Decimal,
    /// Deadline.
    pub target_date: Option<NaiveDate>,
    /// Status.
    pub status: GoalStatus,
    /// Saved amount as a percentage of the target.
    pub progress_percent: Decimal,
    /// Amount still to save.
    pub remaining_amount: Decimal,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<savings_goals::Model> for GoalResponse {
    fn from(model: savings_goals::Model) -> Self {
        let progress = GoalProgress::new(model.target_amount, model.current_amount);
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            target_amount: model.target_amount,
            current_amount: model.current_amount,
            target_date: model.target_date,
            status: model.status.into(),
            progress_percent: progress.progress_percent,
            remaining_amount: progress.remaining_amount,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn to_responses(models: Vec<savings_goals::Model>) -> Vec<GoalResponse> {
    models.into_iter().map(GoalResponse::from).collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /savings-goals
async fn create_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let goal = SavingsGoalRepository::new(state.conn())
        .create(
            user.user_id(),
            CreateGoalInput {
                name: payload.name,
                description: payload.description.filter(|d| !d.trim().is_empty()),
                target_amount: payload.target_amount,
                current_amount: payload.current_amount,
                target_date: payload.target_date,
            },
        )
        .await?;

    info!(user_id = %user.user_id(), goal_id = %goal.id, "Savings goal created");
    Ok((StatusCode::CREATED, Json(GoalResponse::from(goal))))
}

/// GET /savings-goals?status
async fn list_goals(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListGoalsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SavingsGoalRepository::new(state.conn());
    let goals = match query.status.as_deref() {
        Some(status) => {
            let status = status.parse::<GoalStatus>()?;
            repo.list_by_status(user.user_id(), status).await?
        }
        None => repo.list(user.user_id()).await?,
    };
    Ok(Json(to_responses(goals)))
}

/// GET /savings-goals/{id}
async fn get_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let goal = SavingsGoalRepository::new(state.conn())
        .find(user.user_id(), id)
        .await?;
    Ok(Json(GoalResponse::from(goal)))
}

/// PUT /savings-goals/{id}
async fn update_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let status = payload
        .status
        .as_deref()
        .map(str::parse::<GoalStatus>)
        .transpose()?;

    let goal = SavingsGoalRepository::new(state.conn())
        .update(
            user.user_id(),
            id,
            UpdateGoalInput {
                name: payload.name,
                description: payload
                    .description
                    .map(|d| Some(d).filter(|d| !d.trim().is_empty())),
                target_amount: payload.target_amount,
                current_amount: payload.current_amount,
                target_date: payload.target_date.map(Some),
                status,
            },
        )
        .await?;

    info!(user_id = %user.user_id(), goal_id = %id, "Savings goal updated");
    Ok(Json(GoalResponse::from(goal)))
}

/// POST /savings-goals/{id}/contribute
async fn contribute(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContributeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let goal = SavingsGoalRepository::new(state.conn())
        .contribute(user.user_id(), id, payload.amount)
        .await?;

    info!(
        user_id = %user.user_id(),
        goal_id = %id,
        amount = %payload.amount,
        status = %GoalStatus::from(goal.status),
        "Contribution recorded"
    );
    Ok(Json(GoalResponse::from(goal)))
}

/// DELETE /savings-goals/{id}
async fn delete_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    SavingsGoalRepository::new(state.conn())
        .delete(user.user_id(), id)
        .await?;

    info!(user_id = %user.user_id(), goal_id = %id, "Savings goal deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /savings-goals/summary - Totals of active goals and counts.
async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let summary = SavingsGoalRepository::new(state.conn())
        .summary(user.user_id())
        .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use crate::test_support::{TestApp, signup_token};

    fn decimal(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_contribute_until_completed() {
        let app = TestApp::new().await;
        let token = signup_token(&app, "asha").await;

        let (status, goal) = app
            .post_json(
                "/api/savings-goals",
                Some(&token),
                json!({ "name": "Laptop", "targetAmount": "80000", "currentAmount": "20000" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(goal["status"], "IN_PROGRESS");
        assert_eq!(decimal(&goal["progressPercent"]), dec!(25));

        let uri = format!("/api/savings-goals/{}/contribute", goal["id"].as_str().unwrap());
        let (status, body) = app
            .post_json(&uri, Some(&token), json!({ "amount": "60000" }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "COMPLETED");
        assert_eq!(decimal(&body["remainingAmount"]), Decimal::ZERO);

        let (status, body) = app
            .post_json(&uri, Some(&token), json!({ "amount": "1" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_status_filter_update_and_summary() {
        let app = TestApp::new().await;
        let token = signup_token(&app, "asha").await;

        let (_, fund) = app
            .post_json(
                "/api/savings-goals",
                Some(&token),
                json!({ "name": "Emergency fund", "targetAmount": "100000", "currentAmount": "25000" }),
            )
            .await;
        app.post_json(
            "/api/savings-goals",
            Some(&token),
            json!({ "name": "Phone", "targetAmount": "30000", "currentAmount": "30000" }),
        )
        .await;

        let (_, body) = app.get("/api/savings-goals?status=completed", Some(&token)).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Phone");

        let (status, _) = app.get("/api/savings-goals?status=unknown", Some(&token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = app.get("/api/savings-goals/summary", Some(&token)).await;
        assert_eq!(body["totalGoals"], 2);
        assert_eq!(body["activeGoals"], 1);
        assert_eq!(body["completedGoals"], 1);

        let uri = format!("/api/savings-goals/{}", fund["id"].as_str().unwrap());
        let (status, body) = app
            .put_json(&uri, Some(&token), json!({ "status": "PAUSED" }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PAUSED");
        assert_eq!(body["name"], "Emergency fund");

        let (status, _) = app
            .put_json(&uri, Some(&token), json!({ "targetAmount": "0" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.delete(&uri, Some(&token)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.get(&uri, Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
