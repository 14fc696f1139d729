//! Shared types, errors, and configuration for Fintrack.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT issuing/validation and the claims carried by tokens
//! - User roles and authentication payloads
//! - Pagination types for list endpoints

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, Role, TokenType};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{PageRequest, PageResponse};
