//! Store capabilities consumed by the order engine
//!
//! The engine never builds query text itself. It talks to three narrow
//! collaborators that are injected at construction time:
//!
//! - [`MenuCatalog`]: point reads of menu items (price, stock, availability)
//! - [`UserDirectory`]: customer existence checks
//! - [`OrderLedger`]: order persistence and the scoped write transaction
//!
//! `SqliteStore` (db layer) is the production implementation, `MemoryStore`
//! backs the engine unit tests.

use async_trait::async_trait;
use shared::models::{
    DashboardStats, MenuItem, Order, OrderDetail, OrderLine, OrderStatus, OrderSummary,
    PaymentStatus,
};
use thiserror::Error;

/// Failure inside a store implementation (I/O, constraint, lost connection)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a conditional stock decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was reduced by the requested quantity
    Applied,
    /// Not enough stock left; nothing was changed
    Insufficient { available: i64 },
    /// The item is no longer `available`; nothing was changed
    Unavailable,
    /// The item no longer exists
    Missing,
}

/// List filter for orders, already parsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Status/payment change applied by [`OrderLedger::update_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status the order must still be in for the change to apply
    pub expected: OrderStatus,
    pub status: OrderStatus,
    pub payment_status: Option<PaymentStatus>,
    pub updated_at: i64,
}

/// Read access to the menu catalog
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Current catalog row, read fresh on every call
    async fn get_item(&self, id: &str) -> StoreResult<Option<MenuItem>>;
}

/// Read access to registered users
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, customer_id: &str) -> StoreResult<bool>;
}

/// Order persistence
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Open a write transaction. Dropping it without `commit` rolls back.
    async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>>;

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>>;

    /// Order with customer info and lines in insertion order
    async fn find_order_detail(&self, id: &str) -> StoreResult<Option<OrderDetail>>;

    /// Newest first
    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<OrderSummary>>;

    /// Apply `change` if the order is still in `change.expected`.
    /// Returns `false` when the order is missing or its status moved.
    async fn update_status(&self, id: &str, change: StatusChange) -> StoreResult<bool>;

    /// Read-only rollups for the admin dashboard
    async fn dashboard_stats(&self, today_start: i64) -> StoreResult<DashboardStats>;
}

/// Scoped write transaction for order creation
///
/// All writes issued through one transaction become visible together on
/// [`commit`](OrderTransaction::commit) or not at all.
#[async_trait]
pub trait OrderTransaction: Send {
    async fn insert_order(&mut self, order: &Order) -> StoreResult<()>;

    async fn insert_order_line(&mut self, line: &OrderLine) -> StoreResult<()>;

    /// Decrement stock only if `stock >= quantity` and the item is `available`
    async fn decrement_stock(&mut self, menu_item_id: &str, quantity: i64)
    -> StoreResult<StockDecrement>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
