//! User repository for database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Unique username.
    pub username: String,
    /// Unique email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Granted role.
    pub role: UserRole,
    /// Expected monthly income.
    pub monthly_income: Option<Decimal>,
    /// Savings already held.
    pub current_savings: Option<Decimal>,
    /// Monthly expense target.
    pub target_expenses: Option<Decimal>,
}

/// Partial update of the financial fields on a user. `None` leaves a field
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct FinancialProfileUpdate {
    /// New monthly income.
    pub monthly_income: Option<Decimal>,
    /// New current savings.
    pub current_savings: Option<Decimal>,
    /// New expense target.
    pub target_expenses: Option<Decimal>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if a username is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including unique
    /// violations on username or email.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(input.role),
            monthly_income: Set(input.monthly_income),
            current_savings: Set(input.current_savings),
            target_expenses: Set(input.target_expenses),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Updates the financial fields of a user. Returns `None` when the user
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_financial_profile(
        &self,
        id: Uuid,
        update: FinancialProfileUpdate,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(income) = update.monthly_income {
            active.monthly_income = Set(Some(income));
        }
        if let Some(savings) = update.current_savings {
            active.current_savings = Set(Some(savings));
        }
        if let Some(target) = update.target_expenses {
            active.target_expenses = Set(Some(target));
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Lists every user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
    }
}
