//! Order Repository
//!
//! Header and line inserts run on the checkout transaction's connection;
//! reads and status updates run on the pool.

use super::{RepoResult, minor_units};
use crate::orders::money;
use shared::models::{
    Order, OrderDetail, OrderLine, OrderLineView, OrderStatus, OrderSummary, OrderType,
    PaymentMethod, PaymentStatus,
};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_COLUMNS: &str = "o.id, o.customer_id, o.order_type, o.table_number, o.status, o.total_amount, o.payment_method, o.payment_status, o.created_at, o.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_id: String,
    order_type: OrderType,
    table_number: Option<String>,
    status: OrderStatus,
    total_amount: i64,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    created_at: i64,
    updated_at: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            order_type: row.order_type,
            table_number: row.table_number,
            status: row.status,
            total_amount: money::from_minor(row.total_amount),
            payment_method: row.payment_method,
            payment_status: row.payment_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderWithCustomerRow {
    #[sqlx(flatten)]
    order: OrderRow,
    customer_name: Option<String>,
    customer_email: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    #[sqlx(flatten)]
    order: OrderRow,
    customer_name: Option<String>,
    customer_email: Option<String>,
    item_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: String,
    order_id: String,
    menu_item_id: String,
    menu_name: String,
    quantity: i64,
    unit_price: i64,
    subtotal: i64,
    created_at: i64,
}

impl From<OrderLineRow> for OrderLineView {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            menu_name: row.menu_name,
            quantity: row.quantity,
            unit_price: money::from_minor(row.unit_price),
            subtotal: money::from_minor(row.subtotal),
            created_at: row.created_at,
        }
    }
}

// ========== Transactional (order checkout) ==========

pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_id, order_type, table_number, status, total_amount, payment_method, payment_status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.customer_id)
    .bind(order.order_type)
    .bind(&order.table_number)
    .bind(order.status)
    .bind(minor_units(order.total_amount, "total_amount")?)
    .bind(order.payment_method)
    .bind(order.payment_status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_line(conn: &mut SqliteConnection, line: &OrderLine) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_items (id, order_id, menu_item_id, quantity, unit_price, subtotal, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&line.id)
    .bind(&line.order_id)
    .bind(&line.menu_item_id)
    .bind(line.quantity)
    .bind(minor_units(line.unit_price, "unit_price")?)
    .bind(minor_units(line.subtotal, "subtotal")?)
    .bind(line.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

// ========== Reads ==========

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Order::from))
}

/// Lines of one order with menu names, in insertion order
pub async fn find_lines(pool: &SqlitePool, order_id: &str) -> RepoResult<Vec<OrderLineView>> {
    let rows = sqlx::query_as::<_, OrderLineRow>(
        "SELECT oi.id, oi.order_id, oi.menu_item_id, COALESCE(m.name, '') AS menu_name, oi.quantity, oi.unit_price, oi.subtotal, oi.created_at FROM order_items oi LEFT JOIN menu_items m ON m.id = oi.menu_item_id WHERE oi.order_id = ? ORDER BY oi.rowid",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(OrderLineView::from).collect())
}

pub async fn find_detail(pool: &SqlitePool, id: &str) -> RepoResult<Option<OrderDetail>> {
    let Some(row) = sqlx::query_as::<_, OrderWithCustomerRow>(&format!(
        "SELECT {ORDER_COLUMNS}, u.full_name AS customer_name, u.email AS customer_email FROM orders o LEFT JOIN users u ON u.id = o.customer_id WHERE o.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let order_items = find_lines(pool, id).await?;
    Ok(Some(OrderDetail {
        order: row.order.into(),
        customer_name: row.customer_name,
        customer_email: row.customer_email,
        order_items,
    }))
}

/// Newest first, optionally filtered by customer and/or status
pub async fn find_all(
    pool: &SqlitePool,
    customer_id: Option<&str>,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<OrderSummary>> {
    let rows = sqlx::query_as::<_, OrderSummaryRow>(&format!(
        "SELECT {ORDER_COLUMNS}, u.full_name AS customer_name, u.email AS customer_email, (SELECT COUNT(*) FROM order_items oi WHERE oi.order_id = o.id) AS item_count FROM orders o LEFT JOIN users u ON u.id = o.customer_id WHERE (?1 IS NULL OR o.customer_id = ?1) AND (?2 IS NULL OR o.status = ?2) ORDER BY o.created_at DESC, o.rowid DESC"
    ))
    .bind(customer_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| OrderSummary {
            order: row.order.into(),
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            item_count: row.item_count,
        })
        .collect())
}

// ========== Status ==========

/// Conditional on the order still being in `expected`.
/// Returns `false` when no row matched.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    expected: OrderStatus,
    status: OrderStatus,
    payment_status: Option<PaymentStatus>,
    updated_at: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, payment_status = COALESCE(?2, payment_status), updated_at = ?3 WHERE id = ?4 AND status = ?5",
    )
    .bind(status)
    .bind(payment_status)
    .bind(updated_at)
    .bind(id)
    .bind(expected)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() == 1)
}
