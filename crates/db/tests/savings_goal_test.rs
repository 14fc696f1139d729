//! Integration tests for SavingsGoal repository.

mod common;

use common::date;
use fintrack_core::goals::{GoalError, GoalStatus};
use fintrack_db::SavingsGoalRepository;
use fintrack_db::entities::sea_orm_active_enums::GoalStatus as DbGoalStatus;
use fintrack_db::repositories::{CreateGoalInput, SavingsGoalError, UpdateGoalInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn goal(name: &str, target: Decimal, current: Decimal) -> CreateGoalInput {
    CreateGoalInput {
        name: name.to_string(),
        description: None,
        target_amount: target,
        current_amount: current,
        target_date: Some(date(2025, 12, 31)),
    }
}

#[tokio::test]
async fn test_create_and_contribute_until_complete() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = SavingsGoalRepository::new(db.clone());

    let created = repo.create(user.id, goal("Laptop", dec!(80000), dec!(20000))).await.unwrap();
    assert_eq!(created.status, DbGoalStatus::InProgress);

    let partial = repo.contribute(user.id, created.id, dec!(30000)).await.unwrap();
    assert_eq!(partial.current_amount, dec!(50000));
    assert_eq!(partial.status, DbGoalStatus::InProgress);

    let done = repo.contribute(user.id, created.id, dec!(30000)).await.unwrap();
    assert_eq!(done.current_amount, dec!(80000));
    assert_eq!(done.status, DbGoalStatus::Completed);

    let closed = repo.contribute(user.id, created.id, dec!(1)).await;
    assert!(matches!(
        closed,
        Err(SavingsGoalError::Invalid(GoalError::Closed(GoalStatus::Completed)))
    ));
}

#[tokio::test]
async fn test_invalid_goals_rejected() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = SavingsGoalRepository::new(db.clone());

    let zero_target = repo.create(user.id, goal("Trip", Decimal::ZERO, Decimal::ZERO)).await;
    assert!(matches!(
        zero_target,
        Err(SavingsGoalError::Invalid(GoalError::NonPositiveTarget))
    ));

    let created = repo.create(user.id, goal("Trip", dec!(1000), Decimal::ZERO)).await.unwrap();
    let negative = repo.contribute(user.id, created.id, dec!(-5)).await;
    assert!(matches!(
        negative,
        Err(SavingsGoalError::Invalid(GoalError::NonPositiveContribution))
    ));
}

#[tokio::test]
async fn test_update_is_partial() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = SavingsGoalRepository::new(db.clone());

    let created = repo.create(user.id, goal("Car", dec!(500000), dec!(1000))).await.unwrap();
    let updated = repo
        .update(
            user.id,
            created.id,
            UpdateGoalInput {
                status: Some(GoalStatus::Paused),
                target_date: Some(None),
                ..UpdateGoalInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Car");
    assert_eq!(updated.target_amount, dec!(500000));
    assert_eq!(updated.status, DbGoalStatus::Paused);
    assert!(updated.target_date.is_none());
}

#[tokio::test]
async fn test_summary_and_status_queries() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let other = common::create_user(&db, "ravi").await;
    let repo = SavingsGoalRepository::new(db.clone());

    repo.create(user.id, goal("Fund", dec!(100000), dec!(25000))).await.unwrap();
    repo.create(user.id, goal("Phone", dec!(30000), dec!(30000))).await.unwrap();
    repo.create(other.id, goal("Bike", dec!(90000), dec!(0))).await.unwrap();

    let summary = repo.summary(user.id).await.unwrap();
    assert_eq!(summary.total_goals, 2);
    assert_eq!(summary.active_goals, 1);
    assert_eq!(summary.completed_goals, 1);
    assert_eq!(summary.total_target_amount, dec!(100000));
    assert_eq!(summary.total_current_amount, dec!(25000));

    assert_eq!(repo.count_by_status(user.id, GoalStatus::Completed).await.unwrap(), 1);
    let in_progress = repo.list_by_status(user.id, GoalStatus::InProgress).await.unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].name, "Fund");

    let other_goal = repo.list(other.id).await.unwrap().remove(0);
    assert!(matches!(
        repo.delete(user.id, other_goal.id).await,
        Err(SavingsGoalError::NotFound(_))
    ));
}
