//! SQLite-backed store
//!
//! Implements the order engine's store capabilities on top of the
//! repository functions. The checkout transaction is a `sqlx::Transaction`,
//! which rolls back when dropped without commit.

use async_trait::async_trait;
use shared::models::{
    DashboardStats, MenuItem, MenuItemStatus, Order, OrderDetail, OrderLine, OrderSummary,
};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::repository::{self, RepoError};
use crate::orders::{
    MenuCatalog, OrderFilter, OrderLedger, OrderTransaction, StatusChange, StockDecrement,
    StoreError, StoreResult, UserDirectory,
};

impl From<RepoError> for StoreError {
    fn from(err: RepoError) -> Self {
        StoreError::new(err.to_string())
    }
}

/// Production store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MenuCatalog for SqliteStore {
    async fn get_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(repository::menu_item::find_by_id(&self.pool, id).await?)
    }
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn exists(&self, customer_id: &str) -> StoreResult<bool> {
        Ok(repository::user::exists(&self.pool, customer_id).await?)
    }
}

#[async_trait]
impl OrderLedger for SqliteStore {
    async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::new(format!("Failed to begin transaction: {e}")))?;
        Ok(Box::new(SqliteOrderTransaction { tx }))
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(repository::order::find_by_id(&self.pool, id).await?)
    }

    async fn find_order_detail(&self, id: &str) -> StoreResult<Option<OrderDetail>> {
        Ok(repository::order::find_detail(&self.pool, id).await?)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<OrderSummary>> {
        Ok(repository::order::find_all(
            &self.pool,
            filter.customer_id.as_deref(),
            filter.status,
        )
        .await?)
    }

    async fn update_status(&self, id: &str, change: StatusChange) -> StoreResult<bool> {
        Ok(repository::order::update_status(
            &self.pool,
            id,
            change.expected,
            change.status,
            change.payment_status,
            change.updated_at,
        )
        .await?)
    }

    async fn dashboard_stats(&self, today_start: i64) -> StoreResult<DashboardStats> {
        Ok(repository::stats::dashboard(&self.pool, today_start).await?)
    }
}

/// Checkout transaction on one pooled connection
///
/// The first statement is the order insert, so the connection takes the
/// write lock before reading anything. A concurrent checkout waits on
/// `busy_timeout` instead of failing on a stale read snapshot.
struct SqliteOrderTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl OrderTransaction for SqliteOrderTransaction {
    async fn insert_order(&mut self, order: &Order) -> StoreResult<()> {
        Ok(repository::order::insert(&mut self.tx, order).await?)
    }

    async fn insert_order_line(&mut self, line: &OrderLine) -> StoreResult<()> {
        Ok(repository::order::insert_line(&mut self.tx, line).await?)
    }

    async fn decrement_stock(
        &mut self,
        menu_item_id: &str,
        quantity: i64,
    ) -> StoreResult<StockDecrement> {
        if repository::menu_item::decrement_stock(&mut self.tx, menu_item_id, quantity).await? {
            return Ok(StockDecrement::Applied);
        }
        // Nothing matched: find out why, inside the same transaction
        let outcome = match repository::menu_item::stock_state(&mut self.tx, menu_item_id).await? {
            None => StockDecrement::Missing,
            Some((_, MenuItemStatus::Unavailable)) => StockDecrement::Unavailable,
            Some((available, MenuItemStatus::Available)) => {
                StockDecrement::Insufficient { available }
            }
        };
        Ok(outcome)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| StoreError::new(format!("Failed to commit order: {e}")))
    }
}
