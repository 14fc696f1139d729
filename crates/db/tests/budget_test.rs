//! Integration tests for Budget repository.

mod common;

use common::{add_transaction, date, input};
use fintrack_core::transaction::TransactionKind;
use fintrack_db::BudgetRepository;
use fintrack_db::repositories::{BudgetError, BudgetInput};
use rust_decimal_macros::dec;

fn food_budget(month: u32, amount: rust_decimal::Decimal) -> BudgetInput {
    BudgetInput {
        category: "Food".to_string(),
        month,
        year: 2024,
        budget_amount: amount,
    }
}

#[tokio::test]
async fn test_spent_is_derived_from_expenses() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = BudgetRepository::new(db.clone());

    repo.create(user.id, food_budget(3, dec!(3000))).await.unwrap();

    add_transaction(&db, user.id, input("Groceries", "Food", TransactionKind::Expense, dec!(2500), date(2024, 3, 2))).await;
    add_transaction(&db, user.id, input("Dinner", "food", TransactionKind::Expense, dec!(900), date(2024, 3, 28))).await;
    add_transaction(&db, user.id, input("Snacks", "Food", TransactionKind::Expense, dec!(100), date(2024, 4, 1))).await;
    add_transaction(&db, user.id, input("Refund", "Food", TransactionKind::Income, dec!(500), date(2024, 3, 10))).await;

    let budgets = repo.list_with_spent(user.id, Some(3), Some(2024)).await.unwrap();
    assert_eq!(budgets.len(), 1);

    let progress = &budgets[0].progress;
    assert_eq!(progress.spent_amount, dec!(3400));
    assert_eq!(progress.remaining_amount, dec!(-400));
    assert!(progress.over_budget);
}

#[tokio::test]
async fn test_duplicate_period_rejected() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = BudgetRepository::new(db.clone());

    repo.create(user.id, food_budget(3, dec!(3000))).await.unwrap();
    let result = repo.create(user.id, food_budget(3, dec!(4000))).await;
    assert!(matches!(result, Err(BudgetError::Duplicate { month: 3, .. })));

    // Another user may budget the same period.
    let other = common::create_user(&db, "ravi").await;
    assert!(repo.create(other.id, food_budget(3, dec!(1000))).await.is_ok());
}

#[tokio::test]
async fn test_category_case_does_not_open_a_second_budget() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = BudgetRepository::new(db.clone());

    repo.create(user.id, food_budget(3, dec!(3000))).await.unwrap();
    let lower = BudgetInput {
        category: "food".to_string(),
        ..food_budget(3, dec!(4000))
    };
    assert!(matches!(
        repo.create(user.id, lower.clone()).await,
        Err(BudgetError::Duplicate { .. })
    ));

    let april = repo.create(user.id, food_budget(4, dec!(3000))).await.unwrap();
    assert!(matches!(
        repo.update(user.id, april.id, lower).await,
        Err(BudgetError::Duplicate { .. })
    ));

    add_transaction(&db, user.id, input("Groceries", "Food", TransactionKind::Expense, dec!(2500), date(2024, 3, 2))).await;
    let budgets = repo.list_with_spent(user.id, Some(3), Some(2024)).await.unwrap();
    assert_eq!(budgets.len(), 1);
    let total: rust_decimal::Decimal = budgets.iter().map(|b| b.progress.spent_amount).sum();
    assert_eq!(total, dec!(2500));
}

#[tokio::test]
async fn test_update_into_taken_period_rejected() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = BudgetRepository::new(db.clone());

    repo.create(user.id, food_budget(3, dec!(3000))).await.unwrap();
    let april = repo.create(user.id, food_budget(4, dec!(3000))).await.unwrap();

    let clash = repo.update(user.id, april.id, food_budget(3, dec!(10))).await;
    assert!(matches!(clash, Err(BudgetError::Duplicate { .. })));

    let same = repo.update(user.id, april.id, food_budget(4, dec!(3500))).await.unwrap();
    assert_eq!(same.budget_amount, dec!(3500));
}

#[tokio::test]
async fn test_list_filters_and_delete() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let other = common::create_user(&db, "ravi").await;
    let repo = BudgetRepository::new(db.clone());

    let march = repo.create(user.id, food_budget(3, dec!(3000))).await.unwrap();
    repo.create(user.id, food_budget(4, dec!(3000))).await.unwrap();

    assert_eq!(repo.list(user.id, None, None).await.unwrap().len(), 2);
    assert_eq!(repo.list(user.id, Some(4), None).await.unwrap().len(), 1);
    assert_eq!(repo.list(user.id, None, Some(2023)).await.unwrap().len(), 0);

    assert!(matches!(
        repo.delete(other.id, march.id).await,
        Err(BudgetError::NotFound(_))
    ));
    repo.delete(user.id, march.id).await.unwrap();
    assert!(matches!(
        repo.find(user.id, march.id).await,
        Err(BudgetError::NotFound(_))
    ));
}
