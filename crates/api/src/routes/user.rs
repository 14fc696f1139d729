//! Financial profile and preference routes for the signed-in user.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_db::{
    UserProfileRepository, UserRepository,
    entities::{user_profiles, users},
    repositories::{FinancialProfileUpdate, ProfileUpdate},
};
use fintrack_shared::Role;

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route(
            "/profile/{user_id}",
            get(get_user_profile).put(update_user_profile),
        )
        .route(
            "/preferences",
            get(get_preferences)
                .put(update_preferences)
                .delete(reset_preferences),
        )
        .route("/preferences/currency", put(update_currency))
}

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Expected monthly income.
    pub monthly_income: Option<Decimal>,
    /// Current savings.
    pub current_savings: Option<Decimal>,
    /// Monthly expense target.
    pub target_expenses: Option<Decimal>,
    /// Signup time.
    pub created_at: DateTime<FixedOffset>,
}

impl From<&users::Model> for UserResponse {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: Role::from(user.role),
            monthly_income: user.monthly_income,
            current_savings: user.current_savings,
            target_expenses: user.target_expenses,
            created_at: user.created_at,
        }
    }
}

/// Financial fields of a profile update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfileRequest {
    /// Expected monthly income.
    pub monthly_income: Option<Decimal>,
    /// Current savings.
    pub current_savings: Option<Decimal>,
    /// Monthly expense target.
    pub target_expenses: Option<Decimal>,
}

impl FinancialProfileRequest {
    fn into_update(self) -> Result<FinancialProfileUpdate, ApiError> {
        let fields = [
            ("Monthly income", self.monthly_income),
            ("Current savings", self.current_savings),
            ("Target expenses", self.target_expenses),
        ];
        for (label, value) in fields {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(ApiError::validation(format!("{label} cannot be negative")));
            }
        }

        Ok(FinancialProfileUpdate {
            monthly_income: self.monthly_income,
            current_savings: self.current_savings,
            target_expenses: self.target_expenses,
        })
    }
}

/// Preference fields. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    /// Currency code.
    pub preferred_currency: Option<String>,
    /// IANA timezone.
    pub timezone: Option<String>,
    /// Date format pattern.
    pub date_format: Option<String>,
    /// Number grouping.
    pub number_format: Option<String>,
    /// UI language.
    pub language: Option<String>,
    /// UI theme.
    pub theme: Option<String>,
    /// Email notifications.
    pub email_notifications: Option<bool>,
    /// SMS notifications.
    pub sms_notifications: Option<bool>,
    /// Push notifications.
    pub push_notifications: Option<bool>,
    /// WhatsApp notifications.
    pub whatsapp_notifications: Option<bool>,
    /// Budget alerts.
    pub budget_alerts: Option<bool>,
    /// Bill reminders.
    pub bill_reminders: Option<bool>,
    /// Investment alerts.
    pub investment_alerts: Option<bool>,
    /// Weekly summary email.
    pub weekly_summary: Option<bool>,
    /// Monthly report email.
    pub monthly_report: Option<bool>,
}

impl From<PreferencesRequest> for ProfileUpdate {
    fn from(req: PreferencesRequest) -> Self {
        Self {
            preferred_currency: req.preferred_currency,
            timezone: req.timezone,
            date_format: req.date_format,
            number_format: req.number_format,
            language: req.language,
            theme: req.theme,
            email_notifications: req.email_notifications,
            sms_notifications: req.sms_notifications,
            push_notifications: req.push_notifications,
            whatsapp_notifications: req.whatsapp_notifications,
            budget_alerts: req.budget_alerts,
            bill_reminders: req.bill_reminders,
            investment_alerts: req.investment_alerts,
            weekly_summary: req.weekly_summary,
            monthly_report: req.monthly_report,
        }
    }
}

/// Body of `PUT /preferences/currency`.
#[derive(Debug, Deserialize)]
pub struct CurrencyRequest {
    /// Three-letter currency code.
    pub currency: String,
}

/// Stored preferences.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    /// Owner.
    pub user_id: Uuid,
    /// Currency code.
    pub preferred_currency: String,
    /// IANA timezone.
    pub timezone: String,
    /// Date format pattern.
    pub date_format: String,
    /// Number grouping.
    pub number_format: String,
    /// UI language.
    pub language: String,
    /// UI theme.
    pub theme: String,
    /// Email notifications.
    pub email_notifications: bool,
    /// SMS notifications.
    pub sms_notifications: bool,
    /// Push notifications.
    pub push_notifications: bool,
    /// WhatsApp notifications.
    pub whatsapp_notifications: bool,
    /// Budget alerts.
    pub budget_alerts: bool,
    /// Bill reminders.
    pub bill_reminders: bool,
    /// Investment alerts.
    pub investment_alerts: bool,
    /// Weekly summary email.
    pub weekly_summary: bool,
    /// Monthly report email.
    pub monthly_report: bool,
    /// Last change.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<user_profiles::Model> for PreferencesResponse {
    fn from(p: user_profiles::Model) -> Self {
        Self {
            user_id: p.user_id,
            preferred_currency: p.preferred_currency,
            timezone: p.timezone,
            date_format: p.date_format,
            number_format: p.number_format,
            language: p.language,
            theme: p.theme,
            email_notifications: p.email_notifications,
            sms_notifications: p.sms_notifications,
            push_notifications: p.push_notifications,
            whatsapp_notifications: p.whatsapp_notifications,
            budget_alerts: p.budget_alerts,
            bill_reminders: p.bill_reminders,
            investment_alerts: p.investment_alerts,
            weekly_summary: p.weekly_summary,
            monthly_report: p.monthly_report,
            updated_at: p.updated_at,
        }
    }
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<UserResponse, ApiError> {
    let user = UserRepository::new(state.conn())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(UserResponse::from(&user))
}

async fn store_financials(
    state: &AppState,
    user_id: Uuid,
    req: FinancialProfileRequest,
) -> Result<UserResponse, ApiError> {
    let update = req.into_update()?;
    let user = UserRepository::new(state.conn())
        .update_financial_profile(user_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id = %user_id, "Financial profile updated");
    Ok(UserResponse::from(&user))
}

/// GET /user/profile
async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(load_user(&state, user.user_id()).await?))
}

/// PUT /user/profile
async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<FinancialProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(store_financials(&state, user.user_id(), req).await?))
}

/// GET /user/profile/{userId} - Admin only.
async fn get_user_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    Ok(Json(load_user(&state, user_id).await?))
}

/// PUT /user/profile/{userId} - Admin only.
async fn update_user_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<FinancialProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    Ok(Json(store_financials(&state, user_id, req).await?))
}

/// GET /user/preferences - Creates defaults on first read.
async fn get_preferences(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = UserProfileRepository::new(state.conn())
        .ensure(user.user_id())
        .await?;
    Ok(Json(PreferencesResponse::from(profile)))
}

/// PUT /user/preferences
async fn update_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PreferencesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = UserProfileRepository::new(state.conn())
        .update(user.user_id(), req.into())
        .await?;

    info!(user_id = %user.user_id(), "Preferences updated");
    Ok(Json(PreferencesResponse::from(profile)))
}

/// PUT /user/preferences/currency
async fn update_currency(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CurrencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = UserProfileRepository::new(state.conn())
        .update_currency(user.user_id(), &req.currency)
        .await?;

    info!(
        user_id = %user.user_id(),
        currency = %profile.preferred_currency,
        "Preferred currency updated"
    );
    Ok(Json(PreferencesResponse::from(profile)))
}

/// DELETE /user/preferences
async fn reset_preferences(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    UserProfileRepository::new(state.conn())
        .delete(user.user_id())
        .await?;

    info!(user_id = %user.user_id(), "Preferences reset");
    Ok(StatusCode::NO_CONTENT)
}
