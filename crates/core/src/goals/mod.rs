//! Savings goals: progress, contributions and status rules.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Lifecycle of a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    /// Actively being saved for.
    InProgress,
    /// Target reached.
    Completed,
    /// Temporarily on hold.
    Paused,
    /// Abandoned.
    Cancelled,
}

impl GoalStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Paused => "PAUSED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Paused => "Paused",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the goal still accepts contributions.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::InProgress | Self::Paused)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "PAUSED" => Ok(Self::Paused),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(GoalError::InvalidStatus(s.to_string())),
        }
    }
}

/// Errors raised by savings goal rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    /// Unknown status string.
    #[error("Invalid goal status: {0}")]
    InvalidStatus(String),

    /// Name is blank.
    #[error("Goal name is required")]
    MissingName,

    /// Target must be positive.
    #[error("Target amount must be greater than zero")]
    NonPositiveTarget,

    /// Amounts cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Contribution must be positive.
    #[error("Contribution must be greater than zero")]
    NonPositiveContribution,

    /// Completed or cancelled goals are closed.
    #[error("Goal is {0} and no longer accepts contributions")]
    Closed(GoalStatus),
}

/// A savings goal as seen by analytics and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Goal name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount saved so far.
    pub current_amount: Decimal,
    /// Optional deadline.
    pub target_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: GoalStatus,
}

impl GoalRecord {
    /// Progress figures for this goal.
    #[must_use]
    pub fn progress(&self) -> GoalProgress {
        GoalProgress::new(self.target_amount, self.current_amount)
    }
}

/// Derived progress for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Saved amount as a percentage of the target, two decimal places.
    pub progress_percent: Decimal,
    /// Amount still to save, never negative.
    pub remaining_amount: Decimal,
}

impl GoalProgress {
    /// Computes progress from target and current amounts.
    #[must_use]
    pub fn new(target: Decimal, current: Decimal) -> Self {
        let progress_percent = if target.is_zero() {
            Decimal::ZERO
        } else {
            (current / target * Decimal::ONE_HUNDRED).round_dp(2)
        };
        Self {
            progress_percent,
            remaining_amount: (target - current).max(Decimal::ZERO),
        }
    }

    /// Progress clamped to 100.
    #[must_use]
    pub fn capped_percent(&self) -> Decimal {
        self.progress_percent.min(Decimal::ONE_HUNDRED)
    }
}

/// Checks the fields of a new or edited goal.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_goal(name: &str, target: Decimal, current: Decimal) -> Result<(), GoalError> {
    if name.trim().is_empty() {
        return Err(GoalError::MissingName);
    }
    if target <= Decimal::ZERO {
        return Err(GoalError::NonPositiveTarget);
    }
    if current < Decimal::ZERO {
        return Err(GoalError::NegativeAmount);
    }
    Ok(())
}

/// Adds a contribution and returns the new amount and status.
///
/// Reaching the target completes the goal; a paused goal resumes.
///
/// # Errors
///
/// Returns `GoalError::NonPositiveContribution` for zero or negative
/// amounts and `GoalError::Closed` for completed or cancelled goals.
pub fn apply_contribution(
    current: Decimal,
    target: Decimal,
    amount: Decimal,
    status: GoalStatus,
) -> Result<(Decimal, GoalStatus), GoalError> {
    if amount <= Decimal::ZERO {
        return Err(GoalError::NonPositiveContribution);
    }
    if !status.is_open() {
        return Err(GoalError::Closed(status));
    }

    let updated = current + amount;
    let status = if updated >= target {
        GoalStatus::Completed
    } else {
        GoalStatus::InProgress
    };
    Ok((updated, status))
}

/// Counts and totals across a user's goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    /// Number of goals.
    pub total_goals: usize,
    /// Goals in progress.
    pub active_goals: usize,
    /// Completed goals.
    pub completed_goals: usize,
    /// Sum of targets of in-progress goals.
    pub total_target_amount: Decimal,
    /// Sum of savings in in-progress goals.
    pub total_current_amount: Decimal,
}

impl GoalSummary {
    /// Summarizes a set of goals.
    #[must_use]
    pub fn from_goals(goals: &[GoalRecord]) -> Self {
        let active = || goals.iter().filter(|g| g.status == GoalStatus::InProgress);
        Self {
            total_goals: goals.len(),
            active_goals: active().count(),
            completed_goals: goals
                .iter()
                .filter(|g| g.status == GoalStatus::Completed)
                .count(),
            total_target_amount: active().map(|g| g.target_amount).sum(),
            total_current_amount: active().map(|g| g.current_amount).sum(),
        }
    }
}
