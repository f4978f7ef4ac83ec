//! Order API Handlers
//!
//! Handlers stay thin: decode, call [`OrderEngine`](crate::orders::OrderEngine),
//! wrap the result in [`ApiResponse`]. Engine errors convert into
//! [`AppError`] through `From`, so every failure leaves with a numeric code.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
};
use shared::models::{
    CreateOrderRequest, DashboardStats, Order, OrderDetail, OrderListQuery, OrderReceipt,
    OrderStatusUpdate, OrderSummary,
};

use crate::api::{ApiResponse, AppError, AppResult};
use crate::core::ServerState;

/// Malformed bodies get the same envelope as every other validation error
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

/// Create an order from a cart
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<ApiResponse<OrderReceipt>> {
    let request = json_body(payload)?;
    let receipt = state.orders.create_order(request).await?;
    Ok(ApiResponse::success_with_message(
        "Order created successfully",
        receipt,
    ))
}

/// List orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<OrderSummary>>> {
    let Query(query) = query.map_err(|rejection| AppError::validation(rejection.body_text()))?;
    let orders = state.orders.list_orders(query).await?;
    Ok(ApiResponse::success(orders))
}

/// Get one order with its lines
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let detail = state.orders.get_order(&id).await?;
    Ok(ApiResponse::success(detail))
}

/// Advance the order lifecycle and/or set payment status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<OrderStatusUpdate>, JsonRejection>,
) -> AppResult<ApiResponse<Order>> {
    let update = json_body(payload)?;
    let order = state.orders.update_order_status(&id, update).await?;
    Ok(ApiResponse::success_with_message(
        "Order status updated successfully",
        order,
    ))
}

pub async fn dashboard_stats(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.orders.dashboard_stats().await?;
    Ok(ApiResponse::success(stats))
}
