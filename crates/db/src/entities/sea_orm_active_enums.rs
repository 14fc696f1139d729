//! String-backed enums shared by several tables.
//!
//! Stored as short strings so the schema works on PostgreSQL and SQLite.

use fintrack_core::goals::GoalStatus as CoreGoalStatus;
use fintrack_core::transaction::TransactionKind;
use fintrack_shared::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Regular user.
    #[sea_orm(string_value = "USER")]
    User,
    /// Administrator.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => Self::User,
            UserRole::Admin => Self::Admin,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Admin => Self::Admin,
        }
    }
}

/// Transaction type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money in.
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Money out.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

impl From<TransactionType> for TransactionKind {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => Self::Income,
            TransactionType::Expense => Self::Expense,
        }
    }
}

impl From<TransactionKind> for TransactionType {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

/// Savings goal status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    /// Saving towards the target.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Target reached.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Temporarily on hold.
    #[sea_orm(string_value = "PAUSED")]
    Paused,
    /// Abandoned.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<GoalStatus> for CoreGoalStatus {
    fn from(value: GoalStatus) -> Self {
        match value {
            GoalStatus::InProgress => Self::InProgress,
            GoalStatus::Completed => Self::Completed,
            GoalStatus::Paused => Self::Paused,
            GoalStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreGoalStatus> for GoalStatus {
    fn from(value: CoreGoalStatus) -> Self {
        match value {
            CoreGoalStatus::InProgress => Self::InProgress,
            CoreGoalStatus::Completed => Self::Completed,
            CoreGoalStatus::Paused => Self::Paused,
            CoreGoalStatus::Cancelled => Self::Cancelled,
        }
    }
}
