//! Validation utilities for the Inventory Management Platform

use rust_decimal::Decimal;

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate a movement quantity (entries and exits must move at least one unit)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a minimum stock threshold
pub fn validate_min_stock(min_stock: i32) -> Result<(), &'static str> {
    if min_stock < 0 {
        return Err("Minimum stock cannot be negative");
    }
    Ok(())
}

/// Validate a product price
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength (8+ characters)
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a username (1-150 characters, no surrounding whitespace)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() || username.len() > 150 {
        return Err("Username must be 1-150 characters");
    }
    if username.trim() != username {
        return Err("Username cannot start or end with whitespace");
    }
    Ok(())
}

/// Validate a product name (1-100 characters)
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() || name.len() > 100 {
        return Err("Product name must be 1-100 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_min_stock_non_negative() {
        assert!(validate_min_stock(0).is_ok());
        assert!(validate_min_stock(-1).is_err());
    }

    #[test]
    fn test_price_non_negative() {
        assert!(validate_price(Decimal::from_str("19.99").unwrap()).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_username_bounds() {
        assert!(validate_username("operator1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(" padded ").is_err());
    }

    #[test]
    fn test_product_name_bounds() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"x".repeat(101)).is_err());
    }
}
