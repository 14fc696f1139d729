//! In-process test harness: the real router over an in-memory SQLite
//! database with migrations applied.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};
use fintrack_db::migration::{Migrator, MigratorTrait};
use fintrack_shared::{JwtConfig, JwtService};

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    pub async fn with_admin_signup() -> Self {
        Self::build(true).await
    }

    async fn build(allow_admin_signup: bool) -> Self {
        let db = fintrack_db::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret-key-for-testing".to_string(),
                ..JwtConfig::default()
            })),
            allow_admin_signup,
            default_currency: Arc::from("INR"),
        };

        Self {
            router: create_router(state),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.send(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call("GET", uri, token, None).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call("DELETE", uri, token, None).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, token, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call("PUT", uri, token, Some(body)).await
    }

    /// GET returning the raw response, for file downloads.
    pub async fn download(&self, uri: &str, token: &str) -> Response {
        self.send(
            Request::builder()
                .uri(uri)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Signs up an administrator. Requires [`TestApp::with_admin_signup`].
    pub async fn admin_token(&self, username: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/auth/signup",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "secret123",
                    "role": "ADMIN"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "ADMIN");
        body["token"].as_str().unwrap().to_string()
    }
}

/// Signs up a regular user and returns its access token.
pub async fn signup_token(app: &TestApp, username: &str) -> String {
    let (status, body) = app
        .post_json(
            "/api/auth/signup",
            None,
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "secret123"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Creates a transaction and returns its JSON.
pub async fn add_transaction(
    app: &TestApp,
    token: &str,
    title: &str,
    kind: &str,
    category: &str,
    amount: &str,
    date: &str,
) -> Value {
    let (status, body) = app
        .post_json(
            "/api/transactions",
            Some(token),
            json!({
                "title": title,
                "amount": amount,
                "category": category,
                "type": kind,
                "transactionDate": date
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}
