//! Authentication types for JWT, roles and auth payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account holder.
    User,
    /// Administrator with access to other users' data.
    Admin,
}

impl Role {
    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" | "ROLE_USER" => Ok(Self::User),
            "ADMIN" | "ROLE_ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Which of the two token kinds a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived bearer token for API calls.
    Access,
    /// Long-lived token accepted only by `/auth/refresh`.
    Refresh,
}

/// JWT claims for access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Username at the time the token was issued.
    pub username: String,
    /// Account role.
    pub role: Role,
    /// Access or refresh.
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: &str,
        role: Role,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            role,
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Whether the token belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Signup request payload. `/auth/signup` and `/auth/register` share it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Unique username.
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    /// Unique email address.
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Requested role, `USER` when absent.
    pub role: Option<String>,
    /// Expected monthly income.
    pub monthly_income: Option<Decimal>,
    /// Savings the user already holds.
    pub current_savings: Option<Decimal>,
    /// Monthly expense target.
    pub target_expenses: Option<Decimal>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Response returned after signup or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Access token.
    pub token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token scheme, always `Bearer`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
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
}

/// Flattens `validator` errors into a single human-readable message.
#[must_use]
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
