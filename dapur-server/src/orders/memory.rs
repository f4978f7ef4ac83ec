//! In-memory store
//!
//! Backs engine tests without a database. A write transaction holds the
//! store's lock for its whole life and works on a staged copy of the
//! tables, which replaces the live tables on commit. Dropping the
//! transaction discards the copy.

use async_trait::async_trait;
use shared::models::{
    DashboardStats, MenuItem, MenuItemStatus, Order, OrderDetail, OrderLine, OrderLineView,
    OrderStatus, OrderSummary, PaymentStatus, User, UserRole, UserStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::traits::{
    MenuCatalog, OrderFilter, OrderLedger, OrderTransaction, StatusChange, StockDecrement,
    StoreError, StoreResult, UserDirectory,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<String, User>,
    menu_items: HashMap<String, MenuItem>,
    /// Insertion order
    orders: Vec<Order>,
    /// Insertion order
    order_lines: Vec<OrderLine>,
}

impl Tables {
    fn line_views(&self, order_id: &str) -> Vec<OrderLineView> {
        self.order_lines
            .iter()
            .filter(|l| l.order_id == order_id)
            .map(|l| {
                let name = self
                    .menu_items
                    .get(&l.menu_item_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                OrderLineView::new(l.clone(), name)
            })
            .collect()
    }
}

/// In-memory implementation of every store capability
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.tables.lock().await.users.insert(user.id.clone(), user);
    }

    pub async fn insert_menu_item(&self, item: MenuItem) {
        self.tables
            .lock()
            .await
            .menu_items
            .insert(item.id.clone(), item);
    }

    /// Replace a catalog row (price or stock change made by another actor)
    pub async fn update_menu_item(&self, id: &str, f: impl FnOnce(&mut MenuItem)) {
        if let Some(item) = self.tables.lock().await.menu_items.get_mut(id) {
            f(item);
        }
    }

    pub async fn menu_item(&self, id: &str) -> Option<MenuItem> {
        self.tables.lock().await.menu_items.get(id).cloned()
    }

    pub async fn order_count(&self) -> usize {
        self.tables.lock().await.orders.len()
    }

    pub async fn order_line_count(&self) -> usize {
        self.tables.lock().await.order_lines.len()
    }
}

#[async_trait]
impl MenuCatalog for MemoryStore {
    async fn get_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.tables.lock().await.menu_items.get(id).cloned())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn exists(&self, customer_id: &str) -> StoreResult<bool> {
        Ok(self.tables.lock().await.users.contains_key(customer_id))
    }
}

#[async_trait]
impl OrderLedger for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, staged }))
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let tables = self.tables.lock().await;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_order_detail(&self, id: &str) -> StoreResult<Option<OrderDetail>> {
        let tables = self.tables.lock().await;
        let Some(order) = tables.orders.iter().find(|o| o.id == id).cloned() else {
            return Ok(None);
        };
        let customer = tables.users.get(&order.customer_id);
        Ok(Some(OrderDetail {
            customer_name: customer.map(|u| u.full_name.clone()),
            customer_email: customer.map(|u| u.email.clone()),
            order_items: tables.line_views(&order.id),
            order,
        }))
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<OrderSummary>> {
        let tables = self.tables.lock().await;
        let mut orders: Vec<_> = tables
            .orders
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                filter
                    .customer_id
                    .as_deref()
                    .is_none_or(|c| o.customer_id == c)
                    && filter.status.is_none_or(|s| o.status == s)
            })
            .collect();
        // Newest first; insertion position breaks timestamp ties
        orders.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        Ok(orders
            .into_iter()
            .map(|(_, o)| {
                let customer = tables.users.get(&o.customer_id);
                OrderSummary {
                    customer_name: customer.map(|u| u.full_name.clone()),
                    customer_email: customer.map(|u| u.email.clone()),
                    item_count: tables
                        .order_lines
                        .iter()
                        .filter(|l| l.order_id == o.id)
                        .count() as i64,
                    order: o.clone(),
                }
            })
            .collect())
    }

    async fn update_status(&self, id: &str, change: StatusChange) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(order) = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id && o.status == change.expected)
        else {
            return Ok(false);
        };
        order.status = change.status;
        if let Some(payment_status) = change.payment_status {
            order.payment_status = payment_status;
        }
        order.updated_at = change.updated_at;
        Ok(true)
    }

    async fn dashboard_stats(&self, today_start: i64) -> StoreResult<DashboardStats> {
        let tables = self.tables.lock().await;
        let paid: Vec<&Order> = tables
            .orders
            .iter()
            .filter(|o| o.payment_status == PaymentStatus::Paid)
            .collect();
        Ok(DashboardStats {
            total_orders: tables.orders.len() as i64,
            total_revenue: paid.iter().map(|o| o.total_amount).sum(),
            today_revenue: paid
                .iter()
                .filter(|o| o.created_at >= today_start)
                .map(|o| o.total_amount)
                .sum(),
            active_users: tables
                .users
                .values()
                .filter(|u| u.role == UserRole::Customer && u.status == UserStatus::Active)
                .count() as i64,
            menu_items: tables
                .menu_items
                .values()
                .filter(|m| m.status == MenuItemStatus::Available)
                .count() as i64,
            pending_orders: tables
                .orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count() as i64,
        })
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
    async fn insert_order(&mut self, order: &Order) -> StoreResult<()> {
        if self.staged.orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::new(format!("duplicate order id {}", order.id)));
        }
        if !self.staged.users.contains_key(&order.customer_id) {
            return Err(StoreError::new("FOREIGN KEY constraint failed: customer_id"));
        }
        self.staged.orders.push(order.clone());
        Ok(())
    }

    async fn insert_order_line(&mut self, line: &OrderLine) -> StoreResult<()> {
        if !self.staged.orders.iter().any(|o| o.id == line.order_id) {
            return Err(StoreError::new("FOREIGN KEY constraint failed: order_id"));
        }
        if !self.staged.menu_items.contains_key(&line.menu_item_id) {
            return Err(StoreError::new("FOREIGN KEY constraint failed: menu_item_id"));
        }
        self.staged.order_lines.push(line.clone());
        Ok(())
    }

    async fn decrement_stock(
        &mut self,
        menu_item_id: &str,
        quantity: i64,
    ) -> StoreResult<StockDecrement> {
        let Some(item) = self.staged.menu_items.get_mut(menu_item_id) else {
            return Ok(StockDecrement::Missing);
        };
        if item.status != MenuItemStatus::Available {
            return Ok(StockDecrement::Unavailable);
        }
        if item.stock < quantity {
            return Ok(StockDecrement::Insufficient {
                available: item.stock,
            });
        }
        item.stock -= quantity;
        item.updated_at = shared::util::now_millis();
        Ok(StockDecrement::Applied)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
