//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod budgets;
pub mod export;
pub mod health;
pub mod savings_goals;
pub mod transactions;
pub mod user;

/// Creates the API router; everything except health and the public auth
/// endpoints sits behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .nest("/transactions", transactions::routes())
        .nest("/budgets", budgets::routes())
        .nest("/savings-goals", savings_goals::routes())
        .nest("/export", export::routes())
        .nest("/user", user::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
