//! Integration tests for UserProfile repository.

mod common;

use fintrack_db::UserProfileRepository;
use fintrack_db::repositories::{ProfileError, ProfileUpdate};

#[tokio::test]
async fn test_profile_created_with_defaults() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = UserProfileRepository::new(db.clone());

    assert!(repo.find(user.id).await.unwrap().is_none());

    let profile = repo.ensure(user.id).await.unwrap();
    assert_eq!(profile.preferred_currency, "INR");
    assert_eq!(profile.timezone, "Asia/Kolkata");
    assert_eq!(profile.date_format, "DD/MM/YYYY");
    assert!(profile.email_notifications);
    assert!(profile.push_notifications);
    assert!(!profile.sms_notifications);
    assert!(!profile.whatsapp_notifications);
    assert!(!profile.investment_alerts);
    assert!(profile.monthly_report);

    let again = repo.ensure(user.id).await.unwrap();
    assert_eq!(again.id, profile.id);
}

#[tokio::test]
async fn test_partial_update_and_currency() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = UserProfileRepository::new(db.clone());

    let updated = repo
        .update(
            user.id,
            ProfileUpdate {
                theme: Some("dark".to_string()),
                sms_notifications: Some(true),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.theme, "dark");
    assert!(updated.sms_notifications);
    assert_eq!(updated.language, "en");

    let usd = repo.update_currency(user.id, "usd").await.unwrap();
    assert_eq!(usd.preferred_currency, "USD");
    assert_eq!(usd.theme, "dark");
    assert_eq!(repo.preferred_currency(user.id, "INR").await.unwrap(), "USD");

    assert!(matches!(
        repo.update_currency(user.id, "dollars").await,
        Err(ProfileError::InvalidCurrency(_))
    ));
    assert!(matches!(
        repo.update(
            user.id,
            ProfileUpdate {
                timezone: Some("Nowhere/City".to_string()),
                ..ProfileUpdate::default()
            }
        )
        .await,
        Err(ProfileError::InvalidTimezone(_))
    ));
}

#[tokio::test]
async fn test_delete_resets_to_defaults() {
    let db = common::setup().await;
    let user = common::create_user(&db, "asha").await;
    let repo = UserProfileRepository::new(db.clone());

    repo.update_currency(user.id, "EUR").await.unwrap();
    assert!(repo.delete(user.id).await.unwrap());
    assert!(!repo.delete(user.id).await.unwrap());

    assert_eq!(repo.preferred_currency(user.id, "INR").await.unwrap(), "INR");
    assert_eq!(repo.ensure(user.id).await.unwrap().preferred_currency, "INR");
}
