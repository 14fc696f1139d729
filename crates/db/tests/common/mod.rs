//! Shared setup for repository tests: an in-memory SQLite database with the
//! real migrations applied.

#![allow(dead_code)]

use chrono::NaiveDate;
use fintrack_core::transaction::TransactionKind;
use fintrack_db::entities::{sea_orm_active_enums::UserRole, users};
use fintrack_db::migration::{Migrator, MigratorTrait};
use fintrack_db::repositories::{CreateUserInput, TransactionInput};
use fintrack_db::{TransactionRepository, UserRepository};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub async fn setup() -> DatabaseConnection {
    let db = fintrack_db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> users::Model {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$test_hash".to_string(),
            role: UserRole::User,
            monthly_income: None,
            current_savings: None,
            target_expenses: None,
        })
        .await
        .expect("Failed to create user")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn input(
    title: &str,
    category: &str,
    kind: TransactionKind,
    amount: Decimal,
    on: NaiveDate,
) -> TransactionInput {
    TransactionInput {
        title: title.to_string(),
        amount,
        category: category.to_string(),
        kind,
        transaction_date: on,
        description: None,
    }
}

pub async fn add_transaction(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: TransactionInput,
) -> fintrack_db::entities::transactions::Model {
    TransactionRepository::new(db.clone())
        .create(user_id, input)
        .await
        .expect("Failed to create transaction")
}
