//! User preference repository.
//!
//! A profile row is created with defaults the first time it is read, so every
//! user effectively always has one.

use chrono::Utc;
use chrono_tz::Tz;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::user_profiles;

/// Currency used when a user has no profile.
pub const DEFAULT_CURRENCY: &str = "INR";
/// Default IANA timezone.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
/// Default date format.
pub const DEFAULT_DATE_FORMAT: &str = "DD/MM/YYYY";
/// Default number grouping.
pub const DEFAULT_NUMBER_FORMAT: &str = "IN";
/// Default UI language.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default UI theme.
pub const DEFAULT_THEME: &str = "light";

/// Error types for profile operations.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Currency is not a three-letter code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Timezone is not a known IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Partial update of preferences. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Currency code.
    pub preferred_currency: Option<String>,
    /// IANA timezone.
    pub timezone: Option<String>,
    /// Date format pattern.
    pub date_format: Option<String>,
    /// Number grouping.
    pub number_format: Option<String>,
    /// UI language.
    pub language: Option<String>,
    /// UI theme.
    pub theme: Option<String>,
    /// Email notifications.
    pub email_notifications: Option<bool>,
    /// SMS notifications.
    pub sms_notifications: Option<bool>,
    /// Push notifications.
    pub push_notifications: Option<bool>,
    /// WhatsApp notifications.
    pub whatsapp_notifications: Option<bool>,
    /// Budget alerts.
    pub budget_alerts: Option<bool>,
    /// Bill reminders.
    pub bill_reminders: Option<bool>,
    /// Investment alerts.
    pub investment_alerts: Option<bool>,
    /// Weekly summary email.
    pub weekly_summary: Option<bool>,
    /// Monthly report email.
    pub monthly_report: Option<bool>,
}

/// Normalizes a currency code to upper case.
///
/// # Errors
///
/// Returns `ProfileError::InvalidCurrency` unless the code is three ASCII
/// letters.
pub fn normalize_currency(code: &str) -> Result<String, ProfileError> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ProfileError::InvalidCurrency(code.to_string()))
    }
}

fn check_timezone(zone: &str) -> Result<(), ProfileError> {
    zone.parse::<Tz>()
        .map(|_| ())
        .map_err(|_| ProfileError::InvalidTimezone(zone.to_string()))
}

/// User profile repository.
#[derive(Debug, Clone)]
pub struct UserProfileRepository {
    db: DatabaseConnection,
}

impl UserProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user's profile without creating one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, user_id: Uuid) -> Result<Option<user_profiles::Model>, DbErr> {
        user_profiles::Entity::find()
            .filter(user_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Returns the user's profile, creating a default one if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub async fn ensure(&self, user_id: Uuid) -> Result<user_profiles::Model, DbErr> {
        if let Some(profile) = self.find(user_id).await? {
            return Ok(profile);
        }

        debug!(user_id = %user_id, "creating default user profile");
        let now = Utc::now().into();
        let profile = user_profiles::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            preferred_currency: Set(DEFAULT_CURRENCY.to_string()),
            timezone: Set(DEFAULT_TIMEZONE.to_string()),
            date_format: Set(DEFAULT_DATE_FORMAT.to_string()),
            number_format: Set(DEFAULT_NUMBER_FORMAT.to_string()),
            language: Set(DEFAULT_LANGUAGE.to_string()),
            theme: Set(DEFAULT_THEME.to_string()),
            email_notifications: Set(true),
            sms_notifications: Set(false),
            push_notifications: Set(true),
            whatsapp_notifications: Set(false),
            budget_alerts: Set(true),
            bill_reminders: Set(true),
            investment_alerts: Set(false),
            weekly_summary: Set(true),
            monthly_report: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        profile.insert(&self.db).await
    }

    /// Applies a partial update, creating the profile first if needed.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidCurrency` or
    /// `ProfileError::InvalidTimezone` for bad values.
    pub async fn update(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<user_profiles::Model, ProfileError> {
        let currency = update
            .preferred_currency
            .as_deref()
            .map(normalize_currency)
            .transpose()?;
        if let Some(zone) = update.timezone.as_deref() {
            check_timezone(zone)?;
        }

        let mut active: user_profiles::ActiveModel = self.ensure(user_id).await?.into();
        if let Some(currency) = currency {
            active.preferred_currency = Set(currency);
        }
        if let Some(timezone) = update.timezone {
            active.timezone = Set(timezone);
        }
        if let Some(date_format) = update.date_format {
            active.date_format = Set(date_format);
        }
        if let Some(number_format) = update.number_format {
            active.number_format = Set(number_format);
        }
        if let Some(language) = update.language {
            active.language = Set(language);
        }
        if let Some(theme) = update.theme {
            active.theme = Set(theme);
        }

        let flags = [
            (&mut active.email_notifications, update.email_notifications),
            (&mut active.sms_notifications, update.sms_notifications),
            (&mut active.push_notifications, update.push_notifications),
            (&mut active.whatsapp_notifications, update.whatsapp_notifications),
            (&mut active.budget_alerts, update.budget_alerts),
            (&mut active.bill_reminders, update.bill_reminders),
            (&mut active.investment_alerts, update.investment_alerts),
            (&mut active.weekly_summary, update.weekly_summary),
            (&mut active.monthly_report, update.monthly_report),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                *field = Set(value);
            }
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Sets only the preferred currency.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidCurrency` for a bad code.
    pub async fn update_currency(
        &self,
        user_id: Uuid,
        currency: &str,
    ) -> Result<user_profiles::Model, ProfileError> {
        self.update(
            user_id,
            ProfileUpdate {
                preferred_currency: Some(currency.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
    }

    /// The user's currency, or `fallback` when no profile exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn preferred_currency(&self, user_id: Uuid, fallback: &str) -> Result<String, DbErr> {
        Ok(self
            .find(user_id)
            .await?
            .map_or_else(|| fallback.to_string(), |p| p.preferred_currency))
    }

    /// Deletes the profile so the next read starts from defaults. Returns
    /// whether a profile existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, user_id: Uuid) -> Result<bool, DbErr> {
        let result = user_profiles::Entity::delete_many()
            .filter(user_profiles::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
