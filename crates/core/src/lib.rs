//! Core business logic for Fintrack.
//!
//! Pure domain code with no web or database dependencies: validation rules,
//! budget and goal arithmetic, analytics and export rendering.
//!
//! # Modules
//!
//! - `auth` - Password hashing and access rules
//! - `transaction` - Transaction kinds and validation
//! - `budget` - Monthly budgets and spending progress
//! - `goals` - Savings goals, contributions and status
//! - `analytics` - Summaries, breakdowns, trends and health score
//! - `export` - PDF, CSV and Excel reports

pub mod analytics;
pub mod auth;
pub mod budget;
pub mod export;
pub mod goals;
pub mod transaction;
