//! Tests for analytics aggregations and the health score.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::health::DEFAULT_RECOMMENDATIONS;
use super::*;
use crate::budget::BudgetProgress;
use crate::goals::{GoalRecord, GoalStatus};
use crate::transaction::{TransactionKind, TransactionRecord};

fn tx(date: (i32, u32, u32), category: &str, kind: TransactionKind, amount: Decimal) -> TransactionRecord {
    TransactionRecord {
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        title: category.to_string(),
        category: category.to_string(),
        kind,
        amount,
        description: None,
    }
}

fn goal(name: &str, target: Decimal, current: Decimal, status: GoalStatus) -> GoalRecord {
    GoalRecord {
        name: name.to_string(),
        description: None,
        target_amount: target,
        current_amount: current,
        target_date: None,
        status,
    }
}

fn sample() -> Vec<TransactionRecord> {
    vec![
        tx((2024, 1, 1), "Salary", TransactionKind::Income, dec!(50000)),
        tx((2024, 1, 3), "Rent", TransactionKind::Expense, dec!(15000)),
        tx((2024, 1, 9), "Food", TransactionKind::Expense, dec!(4000)),
        tx((2024, 1, 20), "Food", TransactionKind::Expense, dec!(1000)),
        tx((2024, 2, 1), "Salary", TransactionKind::Income, dec!(50000)),
        tx((2024, 2, 5), "Travel", TransactionKind::Expense, dec!(5000)),
    ]
}

#[test]
fn test_summary_totals() {
    let summary = FinancialSummary::from_records(&sample());
    assert_eq!(summary.total_income, dec!(100000));
    assert_eq!(summary.total_expenses, dec!(25000));
    assert_eq!(summary.balance, dec!(75000));
    assert_eq!(summary.transaction_count, 6);
    assert_eq!(summary.savings_rate(), Some(dec!(75)));
    assert_eq!(summary.expense_ratio(), Some(dec!(25)));
}

#[test]
fn test_empty_summary() {
    let summary = FinancialSummary::from_records(&[]);
    assert_eq!(summary, FinancialSummary::default());
    assert_eq!(summary.savings_rate(), None);
}

#[test]
fn test_breakdown_sorted_by_amount() {
    let breakdown = category_breakdown(&sample(), TransactionKind::Expense);
    let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Food", "Travel"]);

    assert_eq!(breakdown[0].amount, dec!(15000));
    assert_eq!(breakdown[0].percentage, dec!(60));
    assert_eq!(breakdown[1].transaction_count, 2);
    assert_eq!(breakdown[1].percentage, dec!(20));
}

#[test]
fn test_breakdown_ties_fall_back_to_name() {
    let breakdown = category_breakdown(&sample(), TransactionKind::Expense);
    // Food and Travel both total 5000.
    assert_eq!(breakdown[1].category, "Food");
    assert_eq!(breakdown[2].category, "Travel");
}

#[test]
fn test_income_breakdown() {
    let breakdown = category_breakdown(&sample(), TransactionKind::Income);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].percentage, dec!(100));
}

#[test]
fn test_statistics() {
    let stats = TransactionStatistics::from_records(&sample());
    assert_eq!(stats.total_transactions, 6);
    assert_eq!(stats.income_transactions, 2);
    assert_eq!(stats.expense_transactions, 4);
    assert_eq!(stats.income_percentage, dec!(33.33));
    assert_eq!(stats.expense_percentage, dec!(66.67));

    let empty = TransactionStatistics::from_records(&[]);
    assert_eq!(empty.income_percentage, Decimal::ZERO);
    assert_eq!(empty.expense_percentage, Decimal::ZERO);
}

#[test]
fn test_monthly_trends_cover_window_oldest_first() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let trends = monthly_trends(&sample(), 6, today);

    assert_eq!(trends.len(), 6);
    assert_eq!((trends[0].year, trends[0].month), (2023, 10));
    assert_eq!((trends[5].year, trends[5].month), (2024, 3));

    let january = &trends[3];
    assert_eq!(january.label(), "1/2024");
    assert_eq!(january.total_income, dec!(50000));
    assert_eq!(january.total_expenses, dec!(20000));
    assert_eq!(january.net, dec!(30000));

    assert_eq!(trends[5].net, Decimal::ZERO);
}

#[test]
fn test_healthy_finances_score_high() {
    let summary = FinancialSummary::from_records(&sample());
    let budgets = vec![BudgetProgress::new("Food", 1, 2024, dec!(6000), dec!(5000))];
    let goals = vec![goal("Emergency", dec!(100000), dec!(100000), GoalStatus::Completed)];

    let health = FinancialHealth::assess(&summary, &budgets, &goals);

    assert_eq!(health.factor_scores.savings_rate, 100);
    assert_eq!(health.factor_scores.expense_control, 100);
    assert_eq!(health.factor_scores.budget_adherence, 100);
    assert_eq!(health.factor_scores.goal_progress, 100);
    assert_eq!(health.health_score, 100);
    assert_eq!(health.rating, HealthRating::Excellent);
    assert_eq!(
        health.recommendations,
        DEFAULT_RECOMMENDATIONS
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_overspending_scores_low_and_advises() {
    let records = vec![
        tx((2024, 1, 1), "Salary", TransactionKind::Income, dec!(10000)),
        tx((2024, 1, 2), "Shopping", TransactionKind::Expense, dec!(9500)),
    ];
    let summary = FinancialSummary::from_records(&records);
    let budgets = vec![BudgetProgress::new("Shopping", 1, 2024, dec!(5000), dec!(9500))];
    let goals = vec![goal("Car", dec!(400000), dec!(10000), GoalStatus::InProgress)];

    let health = FinancialHealth::assess(&summary, &budgets, &goals);

    // 5 % saved -> 25, 95 % spent -> 10, 0 budgets kept, 2.5 % goal -> 3.
    assert_eq!(health.factor_scores.savings_rate, 25);
    assert_eq!(health.factor_scores.expense_control, 10);
    assert_eq!(health.factor_scores.budget_adherence, 0);
    assert_eq!(health.factor_scores.goal_progress, 3);
    assert_eq!(health.health_score, 10);
    assert_eq!(health.rating, HealthRating::NeedsAttention);

    let advice = health.recommendations.join("\n");
    assert!(advice.contains("currently saving 5.0%"));
    assert!(advice.contains("Shopping"));
    assert!(advice.contains("Car"));
}

#[test]
fn test_no_data_is_neutral_where_possible() {
    let health = FinancialHealth::assess(&FinancialSummary::default(), &[], &[]);
    assert_eq!(health.factor_scores.savings_rate, 0);
    assert_eq!(health.factor_scores.expense_control, 100);
    assert_eq!(health.factor_scores.budget_adherence, 50);
    assert_eq!(health.factor_scores.goal_progress, 50);
    assert_eq!(health.health_score, 50);
    assert_eq!(health.rating.label(), "Needs Attention");
    assert!(health.recommendations.len() >= 3);
}

fn arb_record() -> impl Strategy<Value = TransactionRecord> {
    (any::<bool>(), 0i64..100_000_000, 0usize..4, 1u32..=28, 1u32..=12).prop_map(
        |(income, cents, cat, day, month)| TransactionRecord {
            date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
            title: "t".into(),
            category: ["Food", "Rent", "Salary", "Misc"][cat].into(),
            kind: if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            },
            amount: Decimal::new(cents, 2),
            description: None,
        },
    )
}

proptest! {
    /// Balance always equals income minus expenses.
    #[test]
    fn prop_balance_identity(records in prop::collection::vec(arb_record(), 0..50)) {
        let summary = FinancialSummary::from_records(&records);
        prop_assert_eq!(summary.balance, summary.total_income - summary.total_expenses);
        prop_assert_eq!(summary.transaction_count, records.len());
    }

    /// Category totals add back up to the kind total.
    #[test]
    fn prop_breakdown_sums_to_total(records in prop::collection::vec(arb_record(), 0..50)) {
        let summary = FinancialSummary::from_records(&records);
        let breakdown = category_breakdown(&records, TransactionKind::Expense);
        let sum: Decimal = breakdown.iter().map(|c| c.amount).sum();
        prop_assert_eq!(sum, summary.total_expenses);
        prop_assert!(breakdown.windows(2).all(|w| w[0].amount >= w[1].amount));
    }

    /// Scores stay within bounds for any input.
    #[test]
    fn prop_health_score_bounded(
        records in prop::collection::vec(arb_record(), 0..50),
        budget in 0i64..10_000_000,
        spent in 0i64..10_000_000,
        current in 0i64..10_000_000,
    ) {
        let summary = FinancialSummary::from_records(&records);
        let budgets = vec![BudgetProgress::new("Food", 1, 2024, Decimal::new(budget, 2), Decimal::new(spent, 2))];
        let goals = vec![goal("Fund", dec!(50000), Decimal::new(current, 2), GoalStatus::InProgress)];

        let health = FinancialHealth::assess(&summary, &budgets, &goals);
        prop_assert!(health.health_score <= 100);
        for (_, score) in health.factor_scores.named() {
            prop_assert!(score <= 100);
        }
        prop_assert!(!health.recommendations.is_empty());
    }
}
