//! Order Model
//!
//! Orders, their lines, and the request/response payloads of the order API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;
use super::serde_helpers::opt_string_or_number;

// =============================================================================
// Enums
// =============================================================================

/// Where the order is consumed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderType {
    #[serde(rename = "dine-in")]
    #[cfg_attr(feature = "db", sqlx(rename = "dine-in"))]
    DineIn,
    #[serde(rename = "takeaway")]
    #[cfg_attr(feature = "db", sqlx(rename = "takeaway"))]
    Takeaway,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeaway => "takeaway",
        }
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine-in" => Ok(Self::DineIn),
            "takeaway" => Ok(Self::Takeaway),
            other => Err(ParseEnumError::new("order type", other)),
        }
    }
}

/// Order lifecycle status
///
/// `Pending -> Processing -> Ready -> Completed`, and any non-terminal state
/// may move to `Cancelled`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    /// Re-applying the current status is not a transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Ready)
                | (Ready, Completed)
                | (Pending | Processing | Ready, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseEnumError::new("order status", other)),
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    #[default]
    Cash,
    Debit,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(ParseEnumError::new("payment method", other)),
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(ParseEnumError::new("payment status", other)),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub order_type: OrderType,
    /// Present only for dine-in orders
    pub table_number: Option<String>,
    pub status: OrderStatus,
    /// Sum of line subtotals, fixed at creation
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line with the unit price pinned at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// `quantity * unit_price`
    pub subtotal: Decimal,
    pub created_at: i64,
}

/// Order line annotated with the menu item's display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineView {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    pub menu_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub created_at: i64,
}

impl OrderLineView {
    pub fn new(line: OrderLine, menu_name: impl Into<String>) -> Self {
        Self {
            id: line.id,
            order_id: line.order_id,
            menu_item_id: line.menu_item_id,
            menu_name: menu_name.into(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
            created_at: line.created_at,
        }
    }
}

/// Result of a successful order creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderReceipt {
    pub order: Order,
    pub order_items: Vec<OrderLineView>,
}

/// Order with customer info and resolved lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub order_items: Vec<OrderLineView>,
}

/// Order list entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub item_count: i64,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Cart line as submitted by the client
///
/// Fields stay optional so that missing values are reported by the order
/// engine with the offending line rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartLineInput {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub menu_item_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl CartLineInput {
    pub fn new(menu_item_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            menu_item_id: Some(menu_item_id.into()),
            quantity: Some(quantity),
        }
    }
}

/// Create order payload (POST /api/orders)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub table_number: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub order_items: Option<Vec<CartLineInput>>,
}

/// Status update payload (PUT /api/orders/{id}/status)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

/// List filter (GET /api/orders)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub customer_id: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Ready));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_order_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderType::DineIn).unwrap(),
            "\"dine-in\""
        );
        assert_eq!("takeaway".parse::<OrderType>().unwrap(), OrderType::Takeaway);
        assert!("delivery".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_payment_parse() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!("credit".parse::<PaymentMethod>().unwrap(), PaymentMethod::Credit);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert_eq!("refunded".parse::<PaymentStatus>().unwrap(), PaymentStatus::Refunded);
    }

    #[test]
    fn test_create_request_lenient_fields() {
        let json = r#"{
            "customer_id": "c-1",
            "order_type": "dine-in",
            "table_number": 5,
            "order_items": [{"menu_item_id": "m-1", "quantity": 2}, {"quantity": 1}]
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.table_number.as_deref(), Some("5"));
        assert!(req.payment_method.is_none());

        let items = req.order_items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].menu_item_id.as_deref(), Some("m-1"));
        assert!(items[1].menu_item_id.is_none());
    }

    #[test]
    fn test_detail_flattens_order() {
        let detail = OrderDetail {
            order: Order {
                id: "o-1".into(),
                customer_id: "c-1".into(),
                order_type: OrderType::Takeaway,
                table_number: None,
                status: OrderStatus::Pending,
                total_amount: Decimal::new(50000, 0),
                payment_method: PaymentMethod::Cash,
                payment_status: PaymentStatus::Pending,
                created_at: 1,
                updated_at: 1,
            },
            customer_name: Some("Budi".into()),
            customer_email: None,
            order_items: vec![],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], "o-1");
        assert_eq!(value["total_amount"], 50000.0);
        assert_eq!(value["customer_name"], "Budi");
    }
}
