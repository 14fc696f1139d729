//! Transaction repository for database operations.
//!
//! Every query is scoped to the owning user; a transaction that belongs to
//! someone else behaves exactly like one that does not exist.

use chrono::{NaiveDate, Utc};
use fintrack_core::export::DateRange;
use fintrack_core::transaction::{TransactionKind, TransactionRecord};
use fintrack_shared::PageRequest;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TransactionType, transactions};

/// Fields of a transaction as submitted by a client.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Short label.
    pub title: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Free-form category.
    pub category: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Calendar date of the transaction.
    pub transaction_date: NaiveDate,
    /// Optional notes.
    pub description: Option<String>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Base query: a user's transactions, newest first.
    fn for_user(user_id: Uuid) -> Select<transactions::Entity> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
    }

    /// Creates a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: TransactionInput,
    ) -> Result<transactions::Model, DbErr> {
        let now = Utc::now().into();
        let model = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            title: Set(input.title),
            amount: Set(input.amount),
            category: Set(input.category),
            transaction_type: Set(input.kind.into()),
            transaction_date: Set(input.transaction_date),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await
    }

    /// Finds a transaction owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Lists all of a user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<transactions::Model>, DbErr> {
        Self::for_user(user_id).all(&self.db).await
    }

    /// Lists a user's transactions of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_type(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        Self::for_user(user_id)
            .filter(transactions::Column::TransactionType.eq(TransactionType::from(kind)))
            .all(&self.db)
            .await
    }

    /// Lists a user's transactions in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_category(
        &self,
        user_id: Uuid,
        category: &str,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        Self::for_user(user_id)
            .filter(transactions::Column::Category.eq(category))
            .all(&self.db)
            .await
    }

    /// Lists a user's transactions whose date falls in `range`. Missing
    /// bounds are open.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_in_range(
        &self,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = Self::for_user(user_id);
        if let Some(start) = range.start {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = range.end {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }
        query.all(&self.db).await
    }

    /// One page of a user's transactions and the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_paginated(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), DbErr> {
        let page = page.normalized();
        let total = self.count_for_user(user_id).await?;
        let items = Self::for_user(user_id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// The `limit` most recent transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        Self::for_user(user_id).limit(limit).all(&self.db).await
    }

    /// Replaces the fields of a transaction. Returns `None` when it does not
    /// exist for this user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: TransactionInput,
    ) -> Result<Option<transactions::Model>, DbErr> {
        let Some(existing) = self.find_by_id_for_user(user_id, id).await? else {
            return Ok(None);
        };

        let mut active: transactions::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.amount = Set(input.amount);
        active.category = Set(input.category);
        active.transaction_type = Set(input.kind.into());
        active.transaction_date = Set(input.transaction_date);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a transaction. Returns `false` when it does not exist for this
    /// user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        match self.find_by_id_for_user(user_id, id).await? {
            Some(model) => {
                model.delete(&self.db).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of transactions a user has.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
    }

    /// All of a user's transactions as analytics records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn records_for_user(&self, user_id: Uuid) -> Result<Vec<TransactionRecord>, DbErr> {
        Ok(to_records(&self.list_for_user(user_id).await?))
    }
}

/// Converts models to analytics records, keeping order.
#[must_use]
pub fn to_records(models: &[transactions::Model]) -> Vec<TransactionRecord> {
    models.iter().map(TransactionRecord::from).collect()
}
