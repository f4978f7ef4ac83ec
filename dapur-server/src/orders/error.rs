use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use std::fmt;
use thiserror::Error;

use super::traits::StoreError;

/// Referenced entity kind for [`OrderError::InvalidReference`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefEntity {
    Customer,
    MenuItem,
}

impl RefEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::MenuItem => "menu_item",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::MenuItem => "Menu item",
        }
    }
}

impl fmt::Display for RefEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order engine errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{} {id} not found", .entity.label())]
    InvalidReference { entity: RefEntity, id: String },

    #[error("Menu item '{name}' is not available")]
    UnavailableItem { menu_item_id: String, name: String },

    #[error("Insufficient stock for '{name}': requested {requested}, available {available}")]
    InsufficientStock {
        menu_item_id: String,
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl OrderError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Machine-checkable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::InvalidReference { .. } => "invalid_reference",
            Self::UnavailableItem { .. } => "unavailable_item",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::OrderNotFound(_) => "not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether resending the identical request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        OrderError::Storage(err.0)
    }
}

fn validation_code(field: &str) -> ErrorCode {
    match field {
        "order_items" => ErrorCode::OrderEmpty,
        "table_number" => ErrorCode::TableNumberRequired,
        "order_type" => ErrorCode::OrderInvalidType,
        "payment_method" => ErrorCode::PaymentInvalidMethod,
        "payment_status" => ErrorCode::PaymentInvalidStatus,
        _ => ErrorCode::ValidationFailed,
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let app = match err {
            OrderError::Validation { field, .. } => {
                AppError::with_message(validation_code(field), message).with_detail("field", field)
            }
            OrderError::InvalidReference { entity, id } => {
                let code = match entity {
                    RefEntity::Customer => ErrorCode::CustomerNotFound,
                    RefEntity::MenuItem => ErrorCode::MenuItemNotFound,
                };
                let key = match entity {
                    RefEntity::Customer => "customer_id",
                    RefEntity::MenuItem => "menu_item_id",
                };
                AppError::with_message(code, message)
                    .with_detail("entity", entity.as_str())
                    .with_detail(key, id)
            }
            OrderError::UnavailableItem { menu_item_id, name } => {
                AppError::with_message(ErrorCode::MenuItemUnavailable, message)
                    .with_detail("menu_item_id", menu_item_id)
                    .with_detail("name", name)
            }
            OrderError::InsufficientStock {
                menu_item_id,
                name,
                requested,
                available,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("menu_item_id", menu_item_id)
                .with_detail("name", name)
                .with_detail("requested", requested)
                .with_detail("available_stock", available),
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("order_id", id)
            }
            OrderError::InvalidTransition { from, to } => {
                AppError::with_message(ErrorCode::OrderInvalidTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            OrderError::Storage(ref e) => {
                tracing::error!(error = %e, "Order storage error");
                AppError::with_message(ErrorCode::DatabaseError, message)
                    .with_detail("retryable", true)
            }
        };
        app.with_detail("kind", kind)
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_validation_codes_by_field() {
        let err: AppError = OrderError::validation("table_number", "table_number is required").into();
        assert_eq!(err.code, ErrorCode::TableNumberRequired);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail("kind").unwrap(), "validation");
        assert_eq!(err.detail("field").unwrap(), "table_number");

        let err: AppError = OrderError::validation("customer_id", "customer_id is required").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err: AppError = OrderError::validation("order_items", "empty").into();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_invalid_reference_names_the_id() {
        let err = OrderError::InvalidReference {
            entity: RefEntity::MenuItem,
            id: "m-404".into(),
        };
        assert_eq!(err.to_string(), "Menu item m-404 not found");

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::MenuItemNotFound);
        assert_eq!(app.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.detail("menu_item_id").unwrap(), "m-404");
        assert_eq!(app.detail("entity").unwrap(), "menu_item");
        assert_eq!(app.detail("kind").unwrap(), "invalid_reference");
    }

    #[test]
    fn test_insufficient_stock_carries_available() {
        let app: AppError = OrderError::InsufficientStock {
            menu_item_id: "m-1".into(),
            name: "Nasi Gudeg".into(),
            requested: 15,
            available: 10,
        }
        .into();
        assert_eq!(app.code, ErrorCode::InsufficientStock);
        assert_eq!(app.detail("available_stock").unwrap(), 10);
        assert_eq!(app.detail("name").unwrap(), "Nasi Gudeg");
        assert!(app.message.contains("available 10"));
    }

    #[test]
    fn test_status_codes() {
        let app: AppError = OrderError::OrderNotFound("o-1".into()).into();
        assert_eq!(app.http_status(), StatusCode::NOT_FOUND);

        let app: AppError = OrderError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Pending,
        }
        .into();
        assert_eq!(app.http_status(), StatusCode::CONFLICT);

        let err = OrderError::Storage("database is locked".into());
        assert!(err.is_retryable());
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.detail("kind").unwrap(), "storage");
    }
}
