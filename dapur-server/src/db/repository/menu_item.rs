//! Menu Item Repository

use super::{RepoError, RepoResult, minor_units};
use crate::orders::money;
use shared::models::{MenuItem, MenuItemCreate, MenuItemStatus};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, name, description, price, stock, status, category_id, image_url, created_at, updated_at FROM menu_items";

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    description: Option<String>,
    price: i64,
    stock: i64,
    status: MenuItemStatus,
    category_id: Option<String>,
    image_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: money::from_minor(row.price),
            stock: row.stock,
            status: row.status,
            category_id: row.category_id,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_COLUMNS} WHERE name = ? LIMIT 1"))
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_COLUMNS} ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    money::validate_price(data.price).map_err(RepoError::Validation)?;
    if data.stock < 0 {
        return Err(RepoError::Validation(format!(
            "stock cannot be negative: {}",
            data.stock
        )));
    }
    let name = data.name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("name is required".into()));
    }

    let id = Uuid::new_v4().to_string();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO menu_items (id, name, description, price, stock, status, category_id, image_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(&id)
    .bind(name)
    .bind(&data.description)
    .bind(minor_units(data.price, "price")?)
    .bind(data.stock)
    .bind(data.status.unwrap_or_default())
    .bind(&data.category_id)
    .bind(&data.image_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn set_status(pool: &SqlitePool, id: &str, status: MenuItemStatus) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE menu_items SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    Ok(())
}

// ========== Transactional (order checkout) ==========

/// Decrement stock iff enough is left and the item is still available.
///
/// Returns `false` without changing anything otherwise.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: &str,
    quantity: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_items SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND stock >= ?1 AND status = 'available'",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Current `(stock, status)` as seen by this connection
pub async fn stock_state(
    conn: &mut SqliteConnection,
    id: &str,
) -> RepoResult<Option<(i64, MenuItemStatus)>> {
    let state = sqlx::query_as::<_, (i64, MenuItemStatus)>(
        "SELECT stock, status FROM menu_items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(state)
}
