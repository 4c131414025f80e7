//! Concert repository - catalog storage and status transitions.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::concert::{self, Entity as ConcertEntity};
use crate::domain::{Concert, ConcertStatus, UpdateConcert};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Concert repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ConcertRepository: Send + Sync {
    /// Insert a fully-constructed concert record
    async fn create(&self, concert: Concert) -> AppResult<Concert>;

    /// Find concert by ID (including soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Concert>>;

    /// Find several concerts at once (detail joins)
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Concert>>;

    /// Page through non-deleted concerts, returning rows plus total count
    async fn list_active_paginated(&self, offset: u64, limit: u64)
        -> AppResult<(Vec<Concert>, u64)>;

    /// Sum of max_seats over concerts whose status is not CANCELED
    async fn sum_seats_not_cancelled(&self) -> AppResult<i64>;

    /// Update mutable concert fields
    async fn update(&self, id: Uuid, dto: UpdateConcert) -> AppResult<Concert>;

    /// Set the concert's terminal status and soft-delete it
    async fn mark_cancelled(&self, id: Uuid, status: ConcertStatus) -> AppResult<Concert>;

    /// Administrative hard delete, bypasses the cascade
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed concert repository
pub struct ConcertStore {
    db: DatabaseConnection,
}

impl ConcertStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConcertRepository for ConcertStore {
    async fn create(&self, concert: Concert) -> AppResult<Concert> {
        let active_model = concert::ActiveModel {
            id: Set(concert.id),
            name: Set(concert.name),
            description: Set(concert.description),
            max_seats: Set(concert.max_seats),
            status: Set(concert.status.as_str().to_string()),
            deleted: Set(concert.deleted),
            created_at: Set(concert.created_at),
            updated_at: Set(concert.updated_at),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Concert::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Concert>> {
        let result = ConcertEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Concert::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Concert>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ConcertEntity::find()
            .filter(concert::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Concert::from).collect())
    }

    async fn list_active_paginated(
        &self,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Concert>, u64)> {
        let query = ConcertEntity::find().filter(concert::Column::Deleted.eq(false));

        let total = query.clone().count(&self.db).await.map_err(AppError::from)?;

        let models = query
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Concert::from).collect(), total))
    }

    async fn sum_seats_not_cancelled(&self) -> AppResult<i64> {
        let models = ConcertEntity::find()
            .filter(concert::Column::Status.ne(ConcertStatus::Canceled.as_str()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.iter().map(|c| i64::from(c.max_seats)).sum())
    }

    async fn update(&self, id: Uuid, dto: UpdateConcert) -> AppResult<Concert> {
        let model = ConcertEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        let mut active: concert::ActiveModel = model.into();

        if let Some(name) = dto.name {
            active.name = Set(name);
        }
        if let Some(description) = dto.description {
            active.description = Set(Some(description));
        }
        if let Some(max_seats) = dto.max_seats {
            active.max_seats = Set(max_seats);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Concert::from(model))
    }

    async fn mark_cancelled(&self, id: Uuid, status: ConcertStatus) -> AppResult<Concert> {
        let model = ConcertEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        let mut active: concert::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.deleted = Set(true);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Concert::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ConcertEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Concert not found"));
        }

        Ok(())
    }
}
