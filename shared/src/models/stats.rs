//! Dashboard Statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Admin dashboard rollup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_orders: i64,
    /// Sum over orders with `payment_status = paid`
    pub total_revenue: Decimal,
    /// Paid revenue of orders created during the current UTC day
    pub today_revenue: Decimal,
    /// Customers with `status = active`
    pub active_users: i64,
    /// Menu items currently `available`
    pub menu_items: i64,
    pub pending_orders: i64,
}
