//! Order Engine
//!
//! Creates orders as one atomic unit (header, lines, stock decrements) and
//! serves the order read paths, status updates and dashboard rollups.
//!
//! # Creation flow
//!
//! ```text
//! CreateOrderRequest
//!     │
//!     ├─ 1. request shape (items, customer, type, table, payment)   fail fast
//!     ├─ 2. customer exists?                                         UserDirectory
//!     ├─ 3. per line in cart order: shape, item, availability, stock MenuCatalog
//!     │      subtotal = catalog price × quantity
//!     └─ 4. transaction: insert order, per line insert + conditional decrement,
//!            commit (drop = rollback)
//! ```

use rust_decimal::Decimal;
use shared::models::{
    CartLineInput, CreateOrderRequest, DashboardStats, Order, OrderDetail, OrderLine,
    OrderLineView, OrderListQuery, OrderReceipt, OrderStatus, OrderStatusUpdate, OrderSummary,
    OrderType, PaymentMethod, PaymentStatus,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::{OrderError, OrderResult, RefEntity};
use super::money;
use super::traits::{
    MenuCatalog, OrderFilter, OrderLedger, StatusChange, StockDecrement, UserDirectory,
};

/// Request after shape validation
#[derive(Debug)]
struct ValidatedRequest {
    customer_id: String,
    order_type: OrderType,
    table_number: Option<String>,
    payment_method: PaymentMethod,
    items: Vec<CartLineInput>,
}

/// Cart line after catalog validation, priced from the catalog read
#[derive(Debug)]
struct PricedLine {
    menu_item_id: String,
    name: String,
    quantity: i64,
    unit_price: Decimal,
    subtotal: Decimal,
}

/// Order engine
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct OrderEngine {
    catalog: Arc<dyn MenuCatalog>,
    users: Arc<dyn UserDirectory>,
    ledger: Arc<dyn OrderLedger>,
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine").finish_non_exhaustive()
    }
}

impl OrderEngine {
    pub fn new(
        catalog: Arc<dyn MenuCatalog>,
        users: Arc<dyn UserDirectory>,
        ledger: Arc<dyn OrderLedger>,
    ) -> Self {
        Self {
            catalog,
            users,
            ledger,
        }
    }

    /// Build an engine from a single store implementing every capability
    pub fn from_store<S>(store: S) -> Self
    where
        S: MenuCatalog + UserDirectory + OrderLedger + 'static,
    {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store)
    }

    // ========== Creation ==========

    /// Validate a cart against live catalog state and persist it atomically.
    ///
    /// The first failing check in cart order decides the error. A failed call
    /// leaves no order, no line and no stock change behind.
    pub async fn create_order(&self, request: CreateOrderRequest) -> OrderResult<OrderReceipt> {
        let request = validate_request(request)?;

        if !self.users.exists(&request.customer_id).await? {
            info!(customer_id = %request.customer_id, "Order rejected: unknown customer");
            return Err(OrderError::InvalidReference {
                entity: RefEntity::Customer,
                id: request.customer_id,
            });
        }

        let mut lines = Vec::with_capacity(request.items.len());
        let mut total = Decimal::ZERO;
        for (index, input) in request.items.iter().enumerate() {
            let line = self.price_line(index, input).await?;
            total += line.subtotal;
            lines.push(line);
        }

        let now = shared::util::now_millis();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: request.customer_id,
            order_type: request.order_type,
            table_number: request.table_number,
            status: OrderStatus::Pending,
            total_amount: total,
            payment_method: request.payment_method,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let order_items = self.persist(&order, lines, now).await?;

        info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            total = %order.total_amount,
            lines = order_items.len(),
            "Order created"
        );
        Ok(OrderReceipt { order, order_items })
    }

    /// Validate and price one cart line against the catalog
    async fn price_line(&self, index: usize, input: &CartLineInput) -> OrderResult<PricedLine> {
        let menu_item_id = match input.menu_item_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(OrderError::validation(
                    "menu_item_id",
                    format!("order_items[{index}]: menu_item_id is required"),
                ));
            }
        };
        let quantity = input.quantity.ok_or_else(|| {
            OrderError::validation(
                "quantity",
                format!("order_items[{index}]: quantity is required"),
            )
        })?;
        money::validate_quantity(quantity)
            .map_err(|e| OrderError::validation("quantity", format!("order_items[{index}]: {e}")))?;

        let Some(item) = self.catalog.get_item(&menu_item_id).await? else {
            info!(menu_item_id = %menu_item_id, "Order rejected: unknown menu item");
            return Err(OrderError::InvalidReference {
                entity: RefEntity::MenuItem,
                id: menu_item_id,
            });
        };

        if !item.is_available() {
            info!(menu_item_id = %item.id, "Order rejected: menu item unavailable");
            return Err(OrderError::UnavailableItem {
                menu_item_id: item.id,
                name: item.name,
            });
        }

        if quantity > item.stock {
            info!(
                menu_item_id = %item.id,
                requested = quantity,
                available = item.stock,
                "Order rejected: insufficient stock"
            );
            return Err(OrderError::InsufficientStock {
                menu_item_id: item.id,
                name: item.name,
                requested: quantity,
                available: item.stock,
            });
        }

        Ok(PricedLine {
            subtotal: money::line_subtotal(item.price, quantity),
            unit_price: item.price,
            menu_item_id: item.id,
            name: item.name,
            quantity,
        })
    }

    /// One transaction for the header, every line and every decrement
    async fn persist(
        &self,
        order: &Order,
        lines: Vec<PricedLine>,
        now: i64,
    ) -> OrderResult<Vec<OrderLineView>> {
        let mut tx = self.ledger.begin().await?;
        tx.insert_order(order).await?;

        let mut views = Vec::with_capacity(lines.len());
        for line in lines {
            let row = OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                menu_item_id: line.menu_item_id.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
                created_at: now,
            };
            // Stock is re-checked here; the validation read may be stale.
            match tx.decrement_stock(&line.menu_item_id, line.quantity).await? {
                StockDecrement::Applied => {}
                StockDecrement::Insufficient { available } => {
                    warn!(
                        menu_item_id = %line.menu_item_id,
                        requested = line.quantity,
                        available,
                        "Stock changed during checkout, rolling back"
                    );
                    return Err(OrderError::InsufficientStock {
                        menu_item_id: line.menu_item_id,
                        name: line.name,
                        requested: line.quantity,
                        available,
                    });
                }
                StockDecrement::Unavailable => {
                    warn!(menu_item_id = %line.menu_item_id, "Item disabled during checkout, rolling back");
                    return Err(OrderError::UnavailableItem {
                        menu_item_id: line.menu_item_id,
                        name: line.name,
                    });
                }
                StockDecrement::Missing => {
                    warn!(menu_item_id = %line.menu_item_id, "Item removed during checkout, rolling back");
                    return Err(OrderError::InvalidReference {
                        entity: RefEntity::MenuItem,
                        id: line.menu_item_id,
                    });
                }
            }
            tx.insert_order_line(&row).await?;
            views.push(OrderLineView::new(row, line.name));
        }

        tx.commit().await?;
        Ok(views)
    }

    // ========== Reads ==========

    pub async fn get_order(&self, id: &str) -> OrderResult<OrderDetail> {
        self.ledger
            .find_order_detail(id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(id.to_string()))
    }

    pub async fn list_orders(&self, query: OrderListQuery) -> OrderResult<Vec<OrderSummary>> {
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<OrderStatus>())
            .transpose()
            .map_err(|e| OrderError::validation("status", e.to_string()))?;
        let filter = OrderFilter {
            customer_id: query.customer_id.filter(|c| !c.trim().is_empty()),
            status,
        };
        Ok(self.ledger.list_orders(&filter).await?)
    }

    pub async fn dashboard_stats(&self) -> OrderResult<DashboardStats> {
        Ok(self
            .ledger
            .dashboard_stats(shared::util::start_of_today_millis())
            .await?)
    }

    // ========== Status updates ==========

    /// Move an order along its lifecycle and/or set its payment status.
    ///
    /// Only `status`, `payment_status` and `updated_at` change. Totals, lines
    /// and stock are left alone, including on cancellation.
    pub async fn update_order_status(
        &self,
        id: &str,
        update: OrderStatusUpdate,
    ) -> OrderResult<Order> {
        let next_status = non_empty(update.status)
            .map(|s| s.parse::<OrderStatus>())
            .transpose()
            .map_err(|e| OrderError::validation("status", e.to_string()))?;
        let payment_status = non_empty(update.payment_status)
            .map(|s| s.parse::<PaymentStatus>())
            .transpose()
            .map_err(|e| OrderError::validation("payment_status", e.to_string()))?;
        if next_status.is_none() && payment_status.is_none() {
            return Err(OrderError::validation(
                "status",
                "status or payment_status is required",
            ));
        }

        let current = self
            .ledger
            .find_order(id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(id.to_string()))?;

        let target = next_status.unwrap_or(current.status);
        if target != current.status && !current.status.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let change = StatusChange {
            expected: current.status,
            status: target,
            payment_status,
            updated_at: shared::util::now_millis(),
        };
        if !self.ledger.update_status(id, change).await? {
            // Lost a race with another update; report against the fresh state
            let fresh = self
                .ledger
                .find_order(id)
                .await?
                .ok_or_else(|| OrderError::OrderNotFound(id.to_string()))?;
            return Err(OrderError::InvalidTransition {
                from: fresh.status,
                to: target,
            });
        }

        info!(
            order_id = %id,
            from = %current.status,
            to = %target,
            payment_status = ?payment_status,
            "Order status updated"
        );
        self.ledger
            .find_order(id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(id.to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request shape, checked before any store is touched
fn validate_request(request: CreateOrderRequest) -> OrderResult<ValidatedRequest> {
    let items = request.order_items.unwrap_or_default();
    if items.is_empty() {
        return Err(OrderError::validation(
            "order_items",
            "order_items must contain at least one item",
        ));
    }

    let customer_id = non_empty(request.customer_id)
        .ok_or_else(|| OrderError::validation("customer_id", "customer_id is required"))?;

    let order_type = non_empty(request.order_type)
        .ok_or_else(|| OrderError::validation("order_type", "order_type is required"))?
        .parse::<OrderType>()
        .map_err(|e| {
            OrderError::validation(
                "order_type",
                format!("{e} (expected 'dine-in' or 'takeaway')"),
            )
        })?;

    let table_number = match order_type {
        OrderType::DineIn => Some(non_empty(request.table_number).ok_or_else(|| {
            OrderError::validation("table_number", "table_number is required for dine-in orders")
        })?),
        OrderType::Takeaway => None,
    };

    let payment_method = match non_empty(request.payment_method) {
        Some(m) => m.parse::<PaymentMethod>().map_err(|e| {
            OrderError::validation(
                "payment_method",
                format!("{e} (expected 'cash', 'debit' or 'credit')"),
            )
        })?,
        None => PaymentMethod::default(),
    };

    Ok(ValidatedRequest {
        customer_id,
        order_type,
        table_number,
        payment_method,
        items,
    })
}
