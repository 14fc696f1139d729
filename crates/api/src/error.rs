//! Mapping of domain errors onto JSON error responses.
//!
//! Every failure leaves a handler as `{"error": <code>, "message": <text>}`
//! with the status from [`AppError::status_code`]. Server-side failures are
//! logged and replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use fintrack_core::auth::PasswordError;
use fintrack_core::budget::BudgetError as BudgetRuleError;
use fintrack_core::export::ExportError;
use fintrack_core::goals::GoalError;
use fintrack_core::transaction::TransactionError;
use fintrack_db::repositories::{BudgetError, ProfileError, ReportError, SavingsGoalError};
use fintrack_shared::{AppError, JwtError, auth::validation_message};

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 403 with the given message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 500 with the given message, which is logged but never sent.
    pub fn internal(message: impl Into<String>) -> Self {
        Self(AppError::Internal(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.message().to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(validation_message(&errors))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingError(_) => Self::internal(err.to_string()),
            JwtError::Expired => Self::unauthorized("Token has expired"),
            JwtError::DecodingError(_) | JwtError::Invalid | JwtError::WrongType { .. } => {
                Self::unauthorized("Invalid or malformed token")
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => Self::validation(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<BudgetRuleError> for ApiError {
    fn from(err: BudgetRuleError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<GoalError> for ApiError {
    fn from(err: GoalError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::not_found("Budget not found"),
            BudgetError::Duplicate { .. } => Self(AppError::Conflict(err.to_string())),
            BudgetError::Database(e) => e.into(),
        }
    }
}

impl From<SavingsGoalError> for ApiError {
    fn from(err: SavingsGoalError) -> Self {
        match err {
            SavingsGoalError::NotFound(_) => Self::not_found("Savings goal not found"),
            SavingsGoalError::Invalid(e) => e.into(),
            SavingsGoalError::Database(e) => e.into(),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::InvalidCurrency(_) | ProfileError::InvalidTimezone(_) => {
                Self::validation(err.to_string())
            }
            ProfileError::Database(e) => e.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::UserNotFound(_) => Self::not_found("User not found"),
            ReportError::Budget(e) => e.into(),
            ReportError::Database(e) => e.into(),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::TooLarge { .. } => Self(AppError::PayloadTooLarge(err.to_string())),
            e if e.is_client_error() => Self::validation(e.to_string()),
            e => Self::internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::export::ExportKind;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let response = ApiError::from(BudgetError::NotFound(Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Budget not found");
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let response = ApiError::from(DbErr::Custom("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_export_errors_map_to_status() {
        let too_large = ExportError::TooLarge {
            kind: ExportKind::Excel,
            size: 200,
            limit: 100,
        };
        assert_eq!(ApiError::from(too_large).0.status_code(), 413);
        assert_eq!(ApiError::from(ExportError::InvalidDateRange).0.status_code(), 400);
        assert_eq!(
            ApiError::from(ExportError::Pdf("font".into())).0.status_code(),
            500
        );
    }

    #[test]
    fn test_duplicate_budget_is_conflict() {
        let err = BudgetError::Duplicate {
            category: "Food".into(),
            month: 3,
            year: 2024,
        };
        assert_eq!(ApiError::from(err).0.status_code(), 409);
    }
}
