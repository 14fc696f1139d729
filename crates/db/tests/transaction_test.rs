//! Integration tests for Transaction repository.

mod common;

use common::{add_transaction, date, input};
use fintrack_core::export::DateRange;
use fintrack_core::transaction::TransactionKind;
use fintrack_db::TransactionRepository;
use fintrack_shared::PageRequest;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_find_scoped_to_owner() {
    let db = common::setup().await;
    let owner = common::create_user(&db, "asha").await;
    let other = common::create_user(&db, "ravi").await;
    let repo = TransactionRepository::new(db.clone());

    let tx = add_transaction(
        &db,
        owner.id,
        input("Groceries", "Food", TransactionKind::Expense, dec!(1250.50), date(2024, 3, 5)),
    )
    .await;

    let found = repo.find_by_id_for_user(owner.id, tx.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Groceries");
    assert_eq!(found.amount, dec!(1250.50));
    assert_eq!(found.transaction_date, date(2024, 3, 5));

    assert!(repo.find_by_id_for_user(other.id, tx.id).await.unwrap().is_none());
    assert!(repo.find_by_id_for_user(owner.id, Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_is_newest_first_and_filters() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = TransactionRepository::new(db.clone());

    add_transaction(&db, user.id, input("Salary", "Salary", TransactionKind::Income, dec!(50000), date(2024, 3, 1))).await;
    add_transaction(&db, user.id, input("Rent", "Housing", TransactionKind::Expense, dec!(15000), date(2024, 3, 3))).await;
    add_transaction(&db, user.id, input("Lunch", "Food", TransactionKind::Expense, dec!(300), date(2024, 2, 20))).await;

    let all = repo.list_for_user(user.id).await.unwrap();
    let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Rent", "Salary", "Lunch"]);

    let expenses = repo.list_by_type(user.id, TransactionKind::Expense).await.unwrap();
    assert_eq!(expenses.len(), 2);

    let food = repo.list_by_category(user.id, "Food").await.unwrap();
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].title, "Lunch");

    let march = repo
        .list_in_range(user.id, &DateRange::new(Some(date(2024, 3, 1)), Some(date(2024, 3, 31))))
        .await
        .unwrap();
    assert_eq!(march.len(), 2);

    let until_feb = repo
        .list_in_range(user.id, &DateRange::new(None, Some(date(2024, 2, 29))))
        .await
        .unwrap();
    assert_eq!(until_feb.len(), 1);

    let recent = repo.recent(user.id, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].title, "Rent");

    assert_eq!(repo.count_for_user(user.id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_paginated_list() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = TransactionRepository::new(db.clone());

    for day in 1..=5 {
        add_transaction(&db, user.id, input("Coffee", "Food", TransactionKind::Expense, dec!(150), date(2024, 3, day))).await;
    }

    let (page, total) = repo
        .list_paginated(user.id, &PageRequest { page: 2, per_page: 2 })
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].transaction_date, date(2024, 3, 3));
}

#[tokio::test]
async fn test_update_and_delete() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let other = common::create_user(&db, "ravi").await;
    let repo = TransactionRepository::new(db.clone());

    let tx = add_transaction(&db, user.id, input("Taxi", "Transport", TransactionKind::Expense, dec!(400), date(2024, 3, 8))).await;

    let updated = repo
        .update(user.id, tx.id, input("Train", "Transport", TransactionKind::Expense, dec!(120), date(2024, 3, 9)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Train");
    assert_eq!(updated.amount, dec!(120));

    let foreign = repo
        .update(other.id, tx.id, input("Hijack", "X", TransactionKind::Income, dec!(1), date(2024, 3, 9)))
        .await
        .unwrap();
    assert!(foreign.is_none());

    assert!(!repo.delete(other.id, tx.id).await.unwrap());
    assert!(repo.delete(user.id, tx.id).await.unwrap());
    assert!(repo.find_by_id_for_user(user.id, tx.id).await.unwrap().is_none());
}
