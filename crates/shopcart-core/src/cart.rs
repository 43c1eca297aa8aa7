//! Cart totals and per-product sales statistics.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::catalog::{Product, ShoppingCartItem};
use crate::pricing::{current_price, round_money};

/// Sales tax applied to a cart subtotal (13%).
pub const TAX_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// A cart item joined with the product it references.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: ShoppingCartItem,
    pub product: Product,
}

impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ShoppingCartItem object ({}) {}x \"{}\">",
            self.item.id, self.item.quantity, self.product.name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

/// Subtotal, taxes and total for every line of a cart.
///
/// `subtotal = round(Σ quantity × current_price)`,
/// `taxes = round(subtotal × TAX_RATE)`, `total = round(subtotal + taxes)`.
#[must_use]
pub fn summarize(lines: &[CartLine], now: DateTime<Utc>) -> CartSummary {
    let raw: Decimal = lines
        .iter()
        .map(|line| Decimal::from(line.item.quantity) * current_price(&line.product, now))
        .sum();
    let subtotal = round_money(raw);
    let taxes = round_money(subtotal * TAX_RATE);
    let total = round_money(subtotal + taxes);

    CartSummary {
        subtotal,
        taxes,
        total,
    }
}

/// Line total rounded to whole currency units.
///
/// Deliberately coarser than the 2-dp cart totals.
#[must_use]
pub fn item_total(line: &CartLine, now: DateTime<Utc>) -> Decimal {
    (Decimal::from(line.item.quantity) * current_price(&line.product, now))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Average units of a product per cart, over all carts in existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoldAverage {
    Computed(Decimal),
    /// There are no carts, so the average is undefined.
    NoCarts,
}

impl SoldAverage {
    /// The reported figure: the computed average, or `0.00` with no carts.
    #[must_use]
    pub fn value(self) -> Decimal {
        match self {
            SoldAverage::Computed(v) => v,
            SoldAverage::NoCarts => round_money(Decimal::ZERO),
        }
    }

    #[must_use]
    pub fn is_computed(self) -> bool {
        matches!(self, SoldAverage::Computed(_))
    }
}

/// `total_quantity / cart_count`, rounded to 2 dp.
///
/// `total_quantity` must cover every cart item referencing the product;
/// `cart_count` counts all carts, including those without the product.
#[must_use]
pub fn average_product_sold(total_quantity: i64, cart_count: i64) -> SoldAverage {
    if cart_count <= 0 {
        return SoldAverage::NoCarts;
    }
    SoldAverage::Computed(round_money(
        Decimal::from(total_quantity) / Decimal::from(cart_count),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn line(item_id: i64, price: Decimal, quantity: i32, on_sale: bool) -> CartLine {
        let sale_start = on_sale.then(|| now() - Duration::days(1));
        CartLine {
            item: ShoppingCartItem {
                id: item_id,
                shopping_cart_id: 1,
                product_id: item_id * 10,
                quantity,
            },
            product: Product {
                id: item_id * 10,
                name: format!("Product {item_id}"),
                description: "A product".to_string(),
                price,
                sale_start,
                sale_end: None,
                photo: None,
                created_at: now(),
                updated_at: now(),
            },
        }
    }

    #[test]
    fn two_item_cart_totals() {
        let lines = vec![
            line(1, Decimal::new(1000, 2), 2, false),
            line(2, Decimal::new(2000, 2), 1, true),
        ];
        let summary = summarize(&lines, now());
        assert_eq!(summary.subtotal, Decimal::new(3800, 2));
        assert_eq!(summary.taxes, Decimal::new(494, 2));
        assert_eq!(summary.total, Decimal::new(4294, 2));
    }

    #[test]
    fn total_is_subtotal_plus_taxes() {
        let lines = vec![
            line(1, Decimal::new(333, 2), 3, false),
            line(2, Decimal::new(1999, 2), 7, true),
            line(3, Decimal::new(5, 1), 100, false),
        ];
        let summary = summarize(&lines, now());
        assert_eq!(summary.total, summary.subtotal + summary.taxes);
    }

    #[test]
    fn empty_cart_is_all_zero() {
        let summary = summarize(&[], now());
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.taxes, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.total.to_string(), "0.00");
    }

    #[test]
    fn item_total_rounds_to_whole_units() {
        // 3 × 3.33 = 9.99
        let l = line(1, Decimal::new(333, 2), 3, false);
        assert_eq!(item_total(&l, now()), Decimal::new(10, 0));
        // 2 × 18.00 = 36.00 while on sale
        let l = line(2, Decimal::new(2000, 2), 2, true);
        assert_eq!(item_total(&l, now()), Decimal::new(36, 0));
    }

    #[test]
    fn average_with_no_carts_is_zero() {
        let avg = average_product_sold(0, 0);
        assert_eq!(avg, SoldAverage::NoCarts);
        assert_eq!(avg.value(), Decimal::ZERO);
        assert_eq!(avg.value().to_string(), "0.00");
        assert!(!avg.is_computed());
    }

    #[test]
    fn average_divides_by_all_carts() {
        // 5 units spread over 2 of 4 carts.
        let avg = average_product_sold(5, 4);
        assert_eq!(avg, SoldAverage::Computed(Decimal::new(125, 2)));
        assert_eq!(average_product_sold(4, 2).value().to_string(), "2.00");
    }

    #[test]
    fn average_rounds_to_cents() {
        assert_eq!(average_product_sold(1, 3).value(), Decimal::new(33, 2));
    }

    #[test]
    fn line_display_shows_quantity_and_name() {
        let l = line(3, Decimal::new(100, 2), 2, false);
        assert_eq!(l.to_string(), "<ShoppingCartItem object (3) 2x \"Product 3\">");
    }
}
