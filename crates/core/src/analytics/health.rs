//! Financial health scoring.
//!
//! Four factors are scored from 0 to 100 and averaged:
//!
//! - savings rate: 20 % of income saved earns full marks
//! - expense control: expenses at or below half of income earn full marks,
//!   expenses at or above income earn none
//! - budget adherence: share of budgets not exceeded
//! - goal progress: mean progress of live and completed goals
//!
//! Missing budgets or goals score a neutral 50.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::summary::FinancialSummary;
use crate::budget::BudgetProgress;
use crate::goals::{GoalRecord, GoalStatus};

const TARGET_SAVINGS_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const NEUTRAL_SCORE: u8 = 50;

/// Advice given when no specific issue is detected.
pub const DEFAULT_RECOMMENDATIONS: [&str; 4] = [
    "Review your spending patterns regularly",
    "Set realistic budgets for each category",
    "Track progress towards your savings goals",
    "Consider increasing your emergency fund",
];

/// Overall rating band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthRating {
    /// Score of 80 or more.
    Excellent,
    /// Score from 60 to 79.
    Good,
    /// Score below 60.
    NeedsAttention,
}

impl HealthRating {
    /// Band for a score.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            _ => Self::NeedsAttention,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsAttention => "Needs Attention",
        }
    }
}

/// Individual factor scores, each 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScores {
    /// How much of income is saved.
    pub savings_rate: u8,
    /// How expenses compare with income.
    pub expense_control: u8,
    /// How many budgets stayed within limits.
    pub budget_adherence: u8,
    /// How far savings goals have progressed.
    pub goal_progress: u8,
}

impl FactorScores {
    /// Factor names paired with scores, in report order.
    #[must_use]
    pub fn named(&self) -> [(&'static str, u8); 4] {
        [
            ("Savings Rate", self.savings_rate),
            ("Expense Control", self.expense_control),
            ("Budget Adherence", self.budget_adherence),
            ("Goal Progress", self.goal_progress),
        ]
    }

    fn average(&self) -> u8 {
        let sum = u16::from(self.savings_rate)
            + u16::from(self.expense_control)
            + u16::from(self.budget_adherence)
            + u16::from(self.goal_progress);
        // Round half up: (sum + 2) / 4 stays within 0..=100.
        u8::try_from((sum + 2) / 4).unwrap_or(100)
    }
}

/// Result of a health assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHealth {
    /// Overall score, 0..=100.
    pub health_score: u8,
    /// Rating band of the score.
    pub rating: HealthRating,
    /// Per-factor scores.
    pub factor_scores: FactorScores,
    /// Savings rate in percent, when there is income.
    pub savings_rate: Option<Decimal>,
    /// Suggested next steps.
    pub recommendations: Vec<String>,
}

impl FinancialHealth {
    /// Scores a user's finances.
    #[must_use]
    pub fn assess(
        summary: &FinancialSummary,
        budgets: &[BudgetProgress],
        goals: &[GoalRecord],
    ) -> Self {
        let factor_scores = FactorScores {
            savings_rate: savings_rate_score(summary),
            expense_control: expense_control_score(summary),
            budget_adherence: budget_adherence_score(budgets),
            goal_progress: goal_progress_score(goals),
        };
        let health_score = factor_scores.average();

        Self {
            health_score,
            rating: HealthRating::from_score(health_score),
            factor_scores,
            savings_rate: summary.savings_rate(),
            recommendations: recommendations(summary, budgets, goals),
        }
    }
}

fn to_score(value: Decimal) -> u8 {
    value
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(0)
}

fn savings_rate_score(summary: &FinancialSummary) -> u8 {
    summary.savings_rate().map_or(0, |rate| {
        to_score(rate * Decimal::ONE_HUNDRED / TARGET_SAVINGS_RATE)
    })
}

fn expense_control_score(summary: &FinancialSummary) -> u8 {
    match summary.expense_ratio() {
        None if summary.total_expenses.is_zero() => 100,
        None => 0,
        Some(ratio) => {
            // 50 % -> 100 points, 100 % -> 0 points.
            to_score((Decimal::ONE_HUNDRED - ratio) * Decimal::TWO)
        }
    }
}

fn budget_adherence_score(budgets: &[BudgetProgress]) -> u8 {
    if budgets.is_empty() {
        return NEUTRAL_SCORE;
    }
    let within = budgets.iter().filter(|b| !b.over_budget).count();
    to_score(Decimal::from(within) / Decimal::from(budgets.len()) * Decimal::ONE_HUNDRED)
}

fn scored_goals(goals: &[GoalRecord]) -> impl Iterator<Item = &GoalRecord> {
    goals
        .iter()
        .filter(|g| matches!(g.status, GoalStatus::InProgress | GoalStatus::Completed))
}

fn goal_progress_score(goals: &[GoalRecord]) -> u8 {
    let progress: Vec<Decimal> = scored_goals(goals)
        .map(|g| {
            if g.status == GoalStatus::Completed {
                Decimal::ONE_HUNDRED
            } else {
                g.progress().capped_percent()
            }
        })
        .collect();

    if progress.is_empty() {
        return NEUTRAL_SCORE;
    }
    let total: Decimal = progress.iter().sum();
    to_score(total / Decimal::from(progress.len()))
}

fn recommendations(
    summary: &FinancialSummary,
    budgets: &[BudgetProgress],
    goals: &[GoalRecord],
) -> Vec<String> {
    let mut advice = Vec::new();

    match summary.savings_rate() {
        None => advice.push(
            "Record your income sources to get an accurate picture of your finances".to_string(),
        ),
        Some(rate) if rate < TARGET_SAVINGS_RATE => advice.push(format!(
            "Aim to save at least 20% of your income; you are currently saving {rate:.1}%"
        )),
        Some(_) => {}
    }

    if let Some(ratio) = summary.expense_ratio() {
        if ratio > Decimal::from(80) {
            advice.push(format!(
                "Your expenses are {ratio:.1}% of your income; look for categories to cut back"
            ));
        }
    }

    let over: Vec<&str> = budgets
        .iter()
        .filter(|b| b.over_budget)
        .map(|b| b.category.as_str())
        .collect();
    if budgets.is_empty() {
        advice.push("Create monthly budgets for your main spending categories".to_string());
    } else if !over.is_empty() {
        advice.push(format!(
            "Reduce spending in {} which exceeded budget",
            over.join(", ")
        ));
    }

    let lagging: Vec<&str> = goals
        .iter()
        .filter(|g| g.status == GoalStatus::InProgress)
        .filter(|g| g.progress().progress_percent < Decimal::from(50))
        .map(|g| g.name.as_str())
        .collect();
    if scored_goals(goals).next().is_none() {
        advice.push("Set a savings goal, starting with an emergency fund".to_string());
    } else if !lagging.is_empty() {
        advice.push(format!(
            "Increase contributions to goals below 50% progress: {}",
            lagging.join(", ")
        ));
    }

    if advice.is_empty() {
        advice = DEFAULT_RECOMMENDATIONS.iter().map(ToString::to_string).collect();
    }
    advice
}
