//! Field-level validation for product and cart input.
//!
//! Validators collect every failing field instead of stopping at the first
//! one, so a client gets the full picture in a single 400 response.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{NewCartItem, ProductInput};
use crate::pricing::SaleWindow;

/// Upper bound on a product's list price.
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 100;

/// Field name → message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", render_fields(.fields))]
pub struct ValidationError {
    pub fields: FieldErrors,
}

impl ValidationError {
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.into());
        Self { fields }
    }

    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

fn render_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Unvalidated product fields as received from a client or the seed file.
///
/// `price` is kept as text so that non-numeric input can be reported as such
/// rather than failing deserialization.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

/// Validate a product draft into a [`ProductInput`].
///
/// # Errors
///
/// Returns [`ValidationError`] listing every invalid field.
pub fn validate_product(draft: ProductDraft) -> Result<ProductInput, ValidationError> {
    let mut fields = FieldErrors::new();

    let name = draft.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() || name.chars().count() > 200 {
        fields.insert("name".to_string(), "name must be 1–200 characters".to_string());
    }

    let description = draft.description.as_deref().map(str::trim).unwrap_or_default();
    let description_len = description.chars().count();
    if !(2..=200).contains(&description_len) {
        fields.insert(
            "description".to_string(),
            "description must be 2–200 characters".to_string(),
        );
    }

    let price = match parse_price(draft.price.as_deref()) {
        Ok(price) => Some(price),
        Err(message) => {
            fields.insert("price".to_string(), message);
            None
        }
    };

    let window = SaleWindow {
        start: draft.sale_start,
        end: draft.sale_end,
    };
    if window.is_inverted() {
        fields.insert(
            "sale_end".to_string(),
            "sale_end must not be before sale_start".to_string(),
        );
    }

    match price {
        Some(price) if fields.is_empty() => Ok(ProductInput {
            name: name.to_string(),
            description: description.to_string(),
            price,
            sale_start: draft.sale_start,
            sale_end: draft.sale_end,
            photo: draft.photo.filter(|p| !p.trim().is_empty()),
        }),
        _ => Err(ValidationError { fields }),
    }
}

/// Parse and range-check a textual price.
///
/// # Errors
///
/// Returns the client-facing message for the `price` field.
pub fn parse_price(raw: Option<&str>) -> Result<Decimal, String> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err("price is required".to_string());
    };
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| "price must be numeric".to_string())?;
    if price <= Decimal::ZERO {
        return Err("price must be > 0".to_string());
    }
    if price > MAX_PRICE {
        return Err(format!("price must be <= {MAX_PRICE}"));
    }
    if price.normalize().scale() > 2 {
        return Err("price must have at most 2 decimal places".to_string());
    }
    Ok(price)
}

/// # Errors
///
/// Returns the client-facing message for the `quantity` field.
pub fn validate_quantity(quantity: i32) -> Result<(), String> {
    if (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(format!(
            "quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {quantity}"
        ))
    }
}

/// Validate the owner fields and lines of a new cart.
///
/// Line errors are keyed `items[<index>].quantity`.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every invalid field.
pub fn validate_cart(
    name: Option<&str>,
    address: Option<&str>,
    items: &[NewCartItem],
) -> Result<(), ValidationError> {
    let mut fields = FieldErrors::new();

    if name.is_some_and(|n| n.chars().count() > 200) {
        fields.insert("name".to_string(), "name must be at most 200 characters".to_string());
    }
    if address.is_some_and(|a| a.chars().count() > 200) {
        fields.insert(
            "address".to_string(),
            "address must be at most 200 characters".to_string(),
        );
    }
    for (index, item) in items.iter().enumerate() {
        if let Err(message) = validate_quantity(item.quantity) {
            fields.insert(format!("items[{index}].quantity"), message);
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}
