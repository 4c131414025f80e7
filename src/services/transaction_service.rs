//! Transaction service - read access to the append-only audit ledger.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Transaction;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Transaction service trait for dependency injection.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Global ledger page, newest first (admin)
    async fn get_all_transactions(
        &self,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>>;

    /// One user's ledger page, newest first
    async fn get_user_transactions(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>>;
}

/// Concrete implementation of TransactionService using Unit of Work.
pub struct TransactionLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TransactionLedger<U> {
    /// Create new transaction service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TransactionService for TransactionLedger<U> {
    async fn get_all_transactions(
        &self,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>> {
        let (rows, total) = self
            .uow
            .transactions()
            .list_paginated(params.offset(), params.limit())
            .await?;

        Ok(Paginated::from_params(rows, &params, total))
    }

    async fn get_user_transactions(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>> {
        let (rows, total) = self
            .uow
            .transactions()
            .list_for_user_paginated(user_id, params.offset(), params.limit())
            .await?;

        if total == 0 {
            return Err(AppError::not_found("No transactions found for this user"));
        }

        Ok(Paginated::from_params(rows, &params, total))
    }
}
