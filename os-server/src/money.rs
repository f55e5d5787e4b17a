//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary values are stored and serialized as `f64`; every
//! computation and every rendered amount goes through `Decimal` with
//! 2-decimal half-up rounding.

use crate::db::models::OrderItem;
use crate::utils::AppError;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Line total: unit price × quantity, rounded
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    round(to_decimal(unit_price) * Decimal::from(quantity))
        .to_f64()
        .unwrap_or(0.0)
}

/// Order total: sum of line totals, rounded
pub fn order_total(items: &[OrderItem]) -> f64 {
    let sum = items
        .iter()
        .map(|i| to_decimal(i.unit_price) * Decimal::from(i.quantity))
        .sum::<Decimal>();
    round(sum).to_f64().unwrap_or(0.0)
}

/// Render an amount as a 2-decimal string, no currency symbol
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round(to_decimal(value)).to_f64().unwrap_or(0.0))
}

/// Validate one line item before persisting
pub fn validate_item(item: &OrderItem) -> Result<(), AppError> {
    validate_required_text(&item.service_name, "serviceName", MAX_NAME_LEN)?;
    validate_optional_text(&item.description, "description", MAX_NOTE_LEN)?;

    if !item.unit_price.is_finite() {
        return Err(AppError::validation(format!(
            "unitPrice must be a finite number, got {}",
            item.unit_price
        )));
    }
    if item.unit_price < 0.0 {
        return Err(AppError::validation(format!(
            "unitPrice must be non-negative, got {}",
            item.unit_price
        )));
    }
    if item.unit_price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "unitPrice exceeds maximum allowed ({MAX_PRICE}), got {}",
            item.unit_price
        )));
    }
    if item.quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            item.quantity
        )));
    }
    Ok(())
}

/// Validate a full item list (orders must have at least one line)
pub fn validate_items(items: &[OrderItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::validation("Order must have at least one item"));
    }
    for item in items {
        validate_item(item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64, qty: i32) -> OrderItem {
        OrderItem {
            service_name: name.to_string(),
            description: None,
            unit_price: price,
            quantity: qty,
        }
    }

    #[test]
    fn totals_sum_line_items() {
        let items = vec![item("Troca de tela", 100.0, 1), item("Película", 50.0, 2)];
        assert_eq!(order_total(&items), 200.0);
        assert_eq!(line_total(50.0, 2), 100.0);
    }

    #[test]
    fn amounts_format_with_two_decimals() {
        assert_eq!(format_amount(200.0), "200.00");
        assert_eq!(format_amount(0.1 + 0.2), "0.30");
        assert_eq!(format_amount(99.999), "100.00");
    }

    #[test]
    fn invalid_items_rejected() {
        assert!(validate_item(&item("", 10.0, 1)).is_err());
        assert!(validate_item(&item("Reparo", -1.0, 1)).is_err());
        assert!(validate_item(&item("Reparo", f64::NAN, 1)).is_err());
        assert!(validate_item(&item("Reparo", 10.0, 0)).is_err());
        assert!(validate_items(&[]).is_err());
        assert!(validate_item(&item("Reparo", 10.0, 1)).is_ok());
    }
}
