//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication middleware and the `AuthUser` extractor
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::Router;
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use fintrack_shared::JwtService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Whether signup may grant the ADMIN role.
    pub allow_admin_signup: bool,
    /// Currency used for users without a stored preference.
    pub default_currency: Arc<str>,
}

impl AppState {
    /// Database handle for building repositories.
    #[must_use]
    pub fn conn(&self) -> DatabaseConnection {
        (*self.db).clone()
    }

    /// The current calendar date in UTC.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
