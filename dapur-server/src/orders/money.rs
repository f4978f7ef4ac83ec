//! Money calculation utilities using rust_decimal for precision
//!
//! Prices and totals are `Decimal` in the domain. The database stores them as
//! integer minor units (2 decimal places) so that sums are exact.

use rust_decimal::prelude::*;

/// Monetary scale (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per cart line
pub const MAX_QUANTITY: i64 = 9999;

/// Maximum allowed unit price (Rp 100,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Validate a unit price: non-negative, bounded, at most 2 decimal places
pub fn validate_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("price must be non-negative, got {price}"));
    }
    if price > MAX_PRICE {
        return Err(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        ));
    }
    if price.normalize().scale() > DECIMAL_PLACES {
        return Err(format!(
            "price must have at most {DECIMAL_PLACES} decimal places, got {price}"
        ));
    }
    Ok(())
}

/// Validate a cart line quantity
pub fn validate_quantity(quantity: i64) -> Result<(), String> {
    if quantity <= 0 {
        return Err(format!("quantity must be a positive integer, got {quantity}"));
    }
    if quantity > MAX_QUANTITY {
        return Err(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        ));
    }
    Ok(())
}

/// `unit_price * quantity`, rounded to 2 decimal places (half-up)
pub fn line_subtotal(unit_price: Decimal, quantity: i64) -> Decimal {
    (unit_price * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal -> integer minor units
///
/// Returns `None` when the value does not fit in an `i64`.
pub fn to_minor(amount: Decimal) -> Option<i64> {
    let scaled = amount
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::from(100);
    scaled.to_i64()
}

/// Integer minor units -> Decimal
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, DECIMAL_PLACES).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(Decimal::new(25000, 0), 2), Decimal::new(50000, 0));
        assert_eq!(line_subtotal(Decimal::new(1235, 2), 3), Decimal::new(3705, 2));
        assert_eq!(line_subtotal(Decimal::ZERO, 5), Decimal::ZERO);
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor(Decimal::new(25000, 0)), Some(2_500_000));
        assert_eq!(to_minor(Decimal::new(1235, 2)), Some(1235));
        assert_eq!(from_minor(2_500_000), Decimal::new(25000, 0));
        assert_eq!(from_minor(1235), Decimal::new(1235, 2));
    }

    #[test]
    fn test_sum_of_minor_units_is_exact() {
        let prices = [Decimal::new(10, 2), Decimal::new(20, 2), Decimal::new(30, 2)];
        let total: Decimal = prices.iter().copied().sum();
        let minor: i64 = prices.iter().filter_map(|p| to_minor(*p)).sum();
        assert_eq!(from_minor(minor), total);
        assert_eq!(total, Decimal::new(60, 2));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::new(25000, 0)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(999, 2)).is_ok());
        assert!(validate_price(Decimal::new(9999, 3)).is_err());
        assert!(validate_price(Decimal::new(-1, 0)).is_err());
        assert!(validate_price(Decimal::new(100_000_001, 0)).is_err());
    }
}
