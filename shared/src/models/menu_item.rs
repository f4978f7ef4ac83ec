//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ParseEnumError;

/// Menu item availability
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum MenuItemStatus {
    #[default]
    Available,
    Unavailable,
}

impl MenuItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

impl FromStr for MenuItemStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(ParseEnumError::new("menu item status", other)),
        }
    }
}

/// Menu item entity (catalog row)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price, two decimal places
    pub price: Decimal,
    /// Remaining sellable quantity, never negative
    pub stock: i64,
    pub status: MenuItemStatus,
    /// Category reference
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    pub fn is_available(&self) -> bool {
        self.status == MenuItemStatus::Available
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub status: Option<MenuItemStatus>,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "available".parse::<MenuItemStatus>().unwrap(),
            MenuItemStatus::Available
        );
        assert_eq!(
            "unavailable".parse::<MenuItemStatus>().unwrap(),
            MenuItemStatus::Unavailable
        );
        assert!("sold-out".parse::<MenuItemStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&MenuItemStatus::Unavailable).unwrap();
        assert_eq!(json, "\"unavailable\"");
    }
}
