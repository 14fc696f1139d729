//! Integration tests for Report repository.

mod common;

use common::{add_transaction, date, input};
use fintrack_core::export::{DateRange, ExportKind, generate};
use fintrack_core::transaction::TransactionKind;
use fintrack_db::repositories::{BudgetInput, CreateGoalInput, ReportError};
use fintrack_db::{BudgetRepository, ReportRepository, SavingsGoalRepository, UserProfileRepository};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn test_export_with_unknown_user_fails() {
    let db = common::setup().await;
    let repo = ReportRepository::new(db.clone());

    let missing = Uuid::new_v4();
    let result = repo
        .load_dataset(missing, DateRange::all_time(), date(2024, 3, 20), "INR")
        .await;

    assert!(matches!(result, Err(ReportError::UserNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_dataset_contents() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;

    add_transaction(&db, user.id, input("Salary", "Salary", TransactionKind::Income, dec!(50000), date(2024, 3, 1))).await;
    add_transaction(&db, user.id, input("Groceries", "Food", TransactionKind::Expense, dec!(2000), date(2024, 3, 12))).await;
    add_transaction(&db, user.id, input("Old", "Food", TransactionKind::Expense, dec!(700), date(2024, 1, 12))).await;

    BudgetRepository::new(db.clone())
        .create(
            user.id,
            BudgetInput {
                category: "Food".to_string(),
                month: 3,
                year: 2024,
                budget_amount: dec!(5000),
            },
        )
        .await
        .unwrap();
    SavingsGoalRepository::new(db.clone())
        .create(
            user.id,
            CreateGoalInput {
                name: "Fund".to_string(),
                description: None,
                target_amount: dec!(10000),
                current_amount: dec!(1000),
                target_date: None,
            },
        )
        .await
        .unwrap();
    UserProfileRepository::new(db.clone())
        .update_currency(user.id, "USD")
        .await
        .unwrap();

    let range = DateRange::new(Some(date(2024, 3, 1)), Some(date(2024, 3, 31)));
    let data = ReportRepository::new(db.clone())
        .load_dataset(user.id, range, date(2024, 3, 20), "INR")
        .await
        .unwrap();

    assert_eq!(data.context.username, "asha");
    assert_eq!(data.context.currency, "USD");
    assert_eq!(data.transactions.len(), 2);
    assert_eq!(data.transactions[0].title, "Groceries");
    assert_eq!(data.all_transactions.len(), 3);
    assert_eq!(data.budgets.len(), 1);
    assert_eq!(data.budgets[0].spent_amount, dec!(2000));
    assert_eq!(data.goals.len(), 1);

    let csv = generate(ExportKind::TransactionsCsv, &data).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 3);
}

#[tokio::test]
async fn test_context_uses_default_currency_without_profile() {
    let db = common::setup().await;
    let user = common::create_user(&db, "ravi").await;

    let context = ReportRepository::new(db.clone())
        .load_context(user.id, date(2024, 3, 20), "EUR")
        .await
        .unwrap();
    assert_eq!(context.currency, "EUR");

    let budgets = ReportRepository::new(db.clone())
        .budgets(user.id, Some(3), Some(2024))
        .await
        .unwrap();
    assert!(budgets.is_empty());
}
