//! Report export routes: PDF, CSV and Excel downloads plus request checks.
//!
//! Rendering is CPU-bound and runs on the blocking pool. Size limits are
//! enforced on the rendered bytes and answer 413.

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{error, info};

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::budget::validate_period;
use fintrack_core::export::{
    DateRange, ExportDataset, ExportError, ExportKind, ExportPreview, check_range, generate,
    validate_request,
};
use fintrack_db::ReportRepository;

/// Creates the export routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/pdf", get(transactions_pdf))
        .route("/transactions/csv", get(transactions_csv))
        .route("/analytics/pdf", get(analytics_pdf))
        .route("/comprehensive", get(comprehensive))
        .route("/excel", get(excel))
        .route("/budget", get(budget_pdf))
        .route("/savings-goals", get(savings_goals_pdf))
        .route("/preview", get(preview))
        .route("/validate", post(validate))
}

/// Optional date bounds shared by range-based exports.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    /// First day included.
    pub start_date: Option<NaiveDate>,
    /// Last day included.
    pub end_date: Option<NaiveDate>,
}

impl RangeQuery {
    const fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Query parameters for the monthly budget report.
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Month, the current one when absent.
    pub month: Option<u32>,
    /// Year, the current one when absent.
    pub year: Option<i32>,
}

/// Query parameters for export validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuery {
    /// First day included.
    pub start_date: Option<NaiveDate>,
    /// Last day included.
    pub end_date: Option<NaiveDate>,
    /// Requested format.
    pub format: Option<String>,
}

/// Builds a download response.
fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> Result<Response, ApiError> {
    let length = bytes.len();
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CONTENT_LENGTH, length)
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("failed to build download response: {e}")))
}

/// Renders on the blocking pool.
async fn render<F>(kind: ExportKind, job: F) -> Result<Vec<u8>, ApiError>
where
    F: FnOnce() -> Result<Vec<u8>, ExportError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => {
            if !e.is_client_error() {
                error!(error = %e, export = %kind, "Export generation failed");
            }
            Err(e.into())
        }
        Err(e) => Err(ApiError::internal(format!("{kind} task failed: {e}"))),
    }
}

async fn load(
    state: &AppState,
    user: &AuthUser,
    range: DateRange,
) -> Result<ExportDataset, ApiError> {
    Ok(ReportRepository::new(state.conn())
        .load_dataset(user.user_id(), range, state.today(), &state.default_currency)
        .await?)
}

/// Loads, renders and packages a range-based export.
async fn export_range(
    state: &AppState,
    user: &AuthUser,
    kind: ExportKind,
    range: DateRange,
) -> Result<Response, ApiError> {
    let data = load(state, user, range).await?;
    let filename = kind.filename(&range, data.context.today);
    let bytes = render(kind, move || generate(kind, &data)).await?;

    info!(
        user_id = %user.user_id(),
        export = %kind,
        bytes = bytes.len(),
        filename = %filename,
        "Export generated"
    );
    attachment(kind.content_type(), &filename, bytes)
}

/// GET /export/transactions/pdf?startDate&endDate
async fn transactions_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Response, ApiError> {
    let range = query.range();
    range.validate()?;
    export_range(&state, &user, ExportKind::TransactionsPdf, range).await
}

/// GET /export/transactions/csv?startDate&endDate
async fn transactions_csv(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Response, ApiError> {
    let range = query.range();
    range.validate()?;
    export_range(&state, &user, ExportKind::TransactionsCsv, range).await
}

/// GET /export/analytics/pdf - Always covers the full history.
async fn analytics_pdf(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, ApiError> {
    export_range(&state, &user, ExportKind::AnalyticsPdf, DateRange::all_time()).await
}

/// GET /export/comprehensive?startDate&endDate
async fn comprehensive(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Response, ApiError> {
    let range = query.range();
    check_range(&range)?;
    export_range(&state, &user, ExportKind::ComprehensivePdf, range).await
}

/// GET /export/excel?startDate&endDate
async fn excel(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Response, ApiError> {
    let range = query.range();
    range.validate()?;
    export_range(&state, &user, ExportKind::Excel, range).await
}

/// GET /export/savings-goals
async fn savings_goals_pdf(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, ApiError> {
    export_range(&state, &user, ExportKind::SavingsGoalsPdf, DateRange::all_time()).await
}

/// GET /export/budget?month&year - Budget report for one month.
async fn budget_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BudgetQuery>,
) -> Result<Response, ApiError> {
    let today = state.today();
    let month = query.month.unwrap_or_else(|| today.month());
    let year = query.year.unwrap_or_else(|| today.year());
    validate_period(month, year, today)?;

    let range = DateRange::month(year, month)
        .ok_or_else(|| ApiError::validation(format!("Invalid budget period {month}/{year}")))?;
    export_range(&state, &user, ExportKind::BudgetPdf, range).await
}

/// GET /export/preview?startDate&endDate - What an export would contain.
async fn preview(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = query.range();
    range.validate()?;

    let context = ReportRepository::new(state.conn())
        .load_context(user.user_id(), state.today(), &state.default_currency)
        .await?;
    Ok(Json(ExportPreview::new(
        &range,
        &context.username,
        context.today,
    )?))
}

/// POST /export/validate?startDate&endDate&format - Checks a request
/// without producing anything.
async fn validate(_user: AuthUser, Query(query): Query<ValidateQuery>) -> impl IntoResponse {
    let range = DateRange::new(query.start_date, query.end_date);
    Json(validate_request(&range, query.format.as_deref()))
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use http_body_util::BodyExt;
    use rstest::rstest;

    use crate::test_support::{TestApp, add_transaction, signup_token};

    async fn seeded() -> (TestApp, String) {
        let app = TestApp::new().await;
        let token = signup_token(&app, "asha").await;
        add_transaction(&app, &token, "Salary", "INCOME", "Salary", "50000", "2024-01-01").await;
        add_transaction(&app, &token, "Rent", "EXPENSE", "Housing", "15000", "2024-01-03").await;
        add_transaction(&app, &token, "Groceries, weekly", "EXPENSE", "Food", "2500", "2024-01-10").await;
        add_transaction(&app, &token, "Cinema", "EXPENSE", "Leisure", "600", "2024-02-14").await;
        (app, token)
    }

    #[tokio::test]
    async fn test_csv_export_headers_and_rows() {
        let (app, token) = seeded().await;

        let response = app
            .download(
                "/api/export/transactions/csv?startDate=2024-01-01&endDate=2024-01-31",
                &token,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"transactions-2024-01-01-to-2024-01-31.csv\""
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(headers[header::CONTENT_LENGTH], bytes.len().to_string().as_str());

        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("Date,Title,Category,Type,Amount,Description"));
        assert!(text.contains("\"Groceries, weekly\""));
    }

    #[rstest]
    #[case("/api/export/transactions/pdf", "application/pdf", b"%PDF")]
    #[case("/api/export/analytics/pdf", "application/pdf", b"%PDF")]
    #[case("/api/export/comprehensive", "application/pdf", b"%PDF")]
    #[case("/api/export/savings-goals", "application/pdf", b"%PDF")]
    #[case("/api/export/budget?month=1&year=2024", "application/pdf", b"%PDF")]
    #[case(
        "/api/export/excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        b"PK"
    )]
    #[tokio::test]
    async fn test_file_exports(
        #[case] uri: &str,
        #[case] content_type: &str,
        #[case] magic: &[u8],
    ) {
        let (app, token) = seeded().await;

        let response = app.download(uri, &token).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .starts_with("attachment; filename=\"")
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(magic));
    }

    #[tokio::test]
    async fn test_budget_filename() {
        let (app, token) = seeded().await;
        let response = app
            .download("/api/export/budget?month=3&year=2024", &token)
            .await;
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"budget-report-march-2024.pdf\""
        );
    }

    #[rstest]
    #[case("/api/export/transactions/pdf?startDate=2024-02-01&endDate=2024-01-01")]
    #[case("/api/export/transactions/csv?startDate=2024-02-01&endDate=2024-01-01")]
    #[case("/api/export/excel?startDate=2024-02-01&endDate=2024-01-01")]
    #[case("/api/export/comprehensive?startDate=2024-02-01&endDate=2024-01-01")]
    #[case("/api/export/comprehensive?startDate=2015-01-01&endDate=2024-01-01")]
    #[case("/api/export/budget?month=13&year=2024")]
    #[case("/api/export/budget?month=1&year=1999")]
    #[case("/api/export/preview?startDate=2024-02-01&endDate=2024-01-01")]
    #[tokio::test]
    async fn test_bad_requests(#[case] uri: &str) {
        let (app, token) = seeded().await;
        let (status, body) = app.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_exports_require_token() {
        let app = TestApp::new().await;
        let (status, _) = app.get("/api/export/transactions/csv", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_preview_and_validate() {
        let (app, token) = seeded().await;

        let (status, body) = app
            .get(
                "/api/export/preview?startDate=2024-01-01&endDate=2024-01-31",
                Some(&token),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "asha");
        assert_eq!(body["startDate"], "2024-01-01");
        assert_eq!(body["estimatedDays"], 30);

        let (status, body) = app
            .post_json(
                "/api/export/validate?startDate=2020-01-01&endDate=2024-06-01&format=pdf",
                Some(&token),
                serde_json::json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);

        let (_, body) = app
            .post_json(
                "/api/export/validate?startDate=2024-02-01&endDate=2024-01-01&format=docx",
                Some(&token),
                serde_json::json!({}),
            )
            .await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }
}
