//! Authentication routes for signup, login, token refresh and logout.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser, routes::user::UserResponse};
use fintrack_core::auth::{hash_password, resolve_signup_role, verify_password};
use fintrack_db::{UserRepository, entities::users, repositories::CreateUserInput};
use fintrack_shared::{
    Role,
    auth::{AuthResponse, LoginRequest, RefreshRequest, SignupRequest},
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/register", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/users", get(list_users))
}

/// Issues both tokens for `user`.
fn issue_tokens(state: &AppState, user: users::Model) -> Result<AuthResponse, ApiError> {
    let role = Role::from(user.role);
    let token = state
        .jwt_service
        .generate_access_token(user.id, &user.username, role)?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user.id, &user.username, role)?;

    Ok(AuthResponse {
        token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expires_in(),
        id: user.id,
        username: user.username,
        email: user.email,
        role,
        monthly_income: user.monthly_income,
        current_savings: user.current_savings,
        target_expenses: user.target_expenses,
    })
}

/// POST /auth/signup and /auth/register - Create an account and sign in.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let user_repo = UserRepository::new(state.conn());

    if user_repo.username_exists(&payload.username).await? {
        return Err(ApiError::validation("Error: Username is already taken!"));
    }
    if user_repo.email_exists(&payload.email).await? {
        return Err(ApiError::validation("Error: Email is already in use!"));
    }

    let password_hash = hash_password(&payload.password)?;
    let role = resolve_signup_role(payload.role.as_deref(), state.allow_admin_signup);

    let user = user_repo
        .create(CreateUserInput {
            username: payload.username,
            email: payload.email,
            password_hash,
            role: role.into(),
            monthly_income: payload.monthly_income,
            current_savings: payload.current_savings,
            target_expenses: payload.target_expenses,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, role = %role, "New user registered");

    Ok(Json(issue_tokens(&state, user)?))
}

/// POST /auth/login - Authenticate with username and password.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let invalid = || ApiError::unauthorized("Invalid username or password");

    let Some(user) = UserRepository::new(state.conn())
        .find_by_username(&payload.username)
        .await?
    else {
        info!(username = %payload.username, "Login attempt for non-existent user");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "User logged in successfully");
    Ok(Json(issue_tokens(&state, user)?))
}

/// POST /auth/refresh - Exchange a refresh token for a new access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state.jwt_service.validate_refresh_token(&payload.refresh_token)?;

    // Pick up role changes and reject tokens of deleted accounts.
    let user = UserRepository::new(state.conn())
        .find_by_id(claims.user_id())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    let token = state.jwt_service.generate_access_token(
        user.id,
        &user.username,
        Role::from(user.role),
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "expiresIn": state.jwt_service.access_token_expires_in()
    })))
}

/// POST /auth/logout - Tokens are stateless, so this only acknowledges.
async fn logout() -> impl IntoResponse {
    Json(json!({ "message": "Logged out successfully" }))
}

/// GET /auth/users - All accounts (ADMIN only).
async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let users = UserRepository::new(state.conn()).list_all().await?;
    Ok(Json(
        users.iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}
