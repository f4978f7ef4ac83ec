//! Dashboard Statistics Repository

use super::RepoResult;
use crate::orders::money;
use shared::models::DashboardStats;
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_orders: i64,
    total_revenue: i64,
    today_revenue: i64,
    active_users: i64,
    menu_items: i64,
    pending_orders: i64,
}

/// Rollups in a single statement so all counters see the same snapshot
pub async fn dashboard(pool: &SqlitePool, today_start: i64) -> RepoResult<DashboardStats> {
    let row = sqlx::query_as::<_, StatsRow>(
        "SELECT \
            (SELECT COUNT(*) FROM orders) AS total_orders, \
            (SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE payment_status = 'paid') AS total_revenue, \
            (SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE payment_status = 'paid' AND created_at >= ?1) AS today_revenue, \
            (SELECT COUNT(*) FROM users WHERE role = 'customer' AND status = 'active') AS active_users, \
            (SELECT COUNT(*) FROM menu_items WHERE status = 'available') AS menu_items, \
            (SELECT COUNT(*) FROM orders WHERE status = 'pending') AS pending_orders",
    )
    .bind(today_start)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_orders: row.total_orders,
        total_revenue: money::from_minor(row.total_revenue),
        today_revenue: money::from_minor(row.today_revenue),
        active_users: row.active_users,
        menu_items: row.menu_items,
        pending_orders: row.pending_orders,
    })
}
