//! Transaction repository - append-only audit ledger.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::transaction::{self, Entity as TransactionEntity};
use crate::domain::{NewTransaction, Transaction};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transaction repository trait for dependency injection.
///
/// Rows are append-only; there are no update or delete operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Append a ledger entry
    async fn create(&self, record: NewTransaction) -> AppResult<Transaction>;

    /// Page through the ledger, newest first, returning rows plus total count
    async fn list_paginated(&self, offset: u64, limit: u64) -> AppResult<(Vec<Transaction>, u64)>;

    /// Page through one user's ledger entries, newest first
    async fn list_for_user_paginated(
        &self,
        user_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Transaction>, u64)>;
}

/// SeaORM-backed transaction repository
pub struct TransactionStore {
    db: DatabaseConnection,
}

impl TransactionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn create(&self, record: NewTransaction) -> AppResult<Transaction> {
        let active_model = transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            reservation_id: Set(record.reservation_id),
            user_id: Set(record.user_id),
            username: Set(record.username),
            concert_name: Set(record.concert_name),
            action: Set(record.action.as_str().to_string()),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Transaction::from(model))
    }

    async fn list_paginated(&self, offset: u64, limit: u64) -> AppResult<(Vec<Transaction>, u64)> {
        let total = TransactionEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = TransactionEntity::find()
            .order_by_desc(transaction::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Transaction::from).collect(), total))
    }

    async fn list_for_user_paginated(
        &self,
        user_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Transaction>, u64)> {
        let total = TransactionEntity::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = TransactionEntity::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .order_by_desc(transaction::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Transaction::from).collect(), total))
    }
}
