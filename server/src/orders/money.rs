//! Money calculation utilities using rust_decimal for precision
//!
//! All line arithmetic is done in `Decimal`, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;

use super::error::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a unit price before pricing a line
pub fn validate_unit_price(price: f64) -> Result<(), OrderError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(OrderError::Validation(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::Validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Round a decimal to monetary precision and convert to f64
fn to_money(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line total = unit price * quantity, at monetary precision
pub fn line_total(unit_price: f64, qty: i32) -> f64 {
    let price = Decimal::from_f64(unit_price).unwrap_or_default();
    to_money(price * Decimal::from(qty))
}

/// Sum of line totals, at monetary precision
pub fn order_total(line_totals: &[f64]) -> f64 {
    let sum = line_totals
        .iter()
        .map(|t| Decimal::from_f64(*t).unwrap_or_default())
        .sum::<Decimal>();
    to_money(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_exact_for_cent_prices() {
        assert_eq!(line_total(100.0, 2), 200.0);
        assert_eq!(line_total(0.1, 3), 0.3);
        assert_eq!(line_total(19.99, 3), 59.97);
    }

    #[test]
    fn order_total_sums_lines() {
        assert_eq!(order_total(&[200.0, 50.0]), 250.0);
        assert_eq!(order_total(&[0.1, 0.2]), 0.3);
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn rejects_bad_prices() {
        assert!(validate_unit_price(f64::NAN).is_err());
        assert!(validate_unit_price(-1.0).is_err());
        assert!(validate_unit_price(2_000_000.0).is_err());
        assert!(validate_unit_price(9.5).is_ok());
    }
}
