//! Sale-window and discount pricing.
//!
//! All money values are rounded to cents with banker's rounding
//! (`MidpointNearestEven`) and carried at scale 2, so `100` renders as
//! `"100.00"`.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::Product;

/// Fraction taken off the list price while a product is on sale (10%).
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// The `[start, end]` interval during which the discount applies.
///
/// This is the only sale rule in the crate: per-product status and the
/// catalog's `on_sale` listing filter both go through [`SaleWindow::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaleWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SaleWindow {
    /// Whether `now` falls inside the window.
    ///
    /// - no start: never on sale, even when an end is set
    /// - start only: open-ended, on sale from `start` onwards
    /// - start and end: inclusive on both bounds
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (None, _) => false,
            (Some(start), None) => start <= now,
            (Some(start), Some(end)) => start <= now && now <= end,
        }
    }

    /// `true` when both bounds are set and the end precedes the start.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if end < start)
    }
}

#[must_use]
pub fn is_on_sale(product: &Product, now: DateTime<Utc>) -> bool {
    product.sale_window().contains(now)
}

/// Price a shopper pays at `now`: discounted by [`DISCOUNT_RATE`] during a
/// sale, the list price otherwise. Always rounded to cents.
#[must_use]
pub fn current_price(product: &Product, now: DateTime<Utc>) -> Decimal {
    if is_on_sale(product, now) {
        round_money(product.price * (Decimal::ONE - DISCOUNT_RATE))
    } else {
        round_money(product.price)
    }
}

/// Round to 2 decimal places (banker's rounding) and pin the scale at 2.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn product(price: Decimal, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Product {
        Product {
            id: 1,
            name: "Espresso Cup".to_string(),
            description: "Porcelain, 90ml".to_string(),
            price,
            sale_start: start,
            sale_end: end,
            photo: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn no_window_is_never_on_sale() {
        let p = product(Decimal::new(12_345, 3), None, None);
        assert!(!is_on_sale(&p, now()));
        assert_eq!(current_price(&p, now()), Decimal::new(1234, 2));
    }

    #[test]
    fn open_ended_sale_discounts_ten_percent() {
        let p = product(Decimal::new(100, 0), Some(now() - Duration::days(1)), None);
        assert!(is_on_sale(&p, now()));
        assert_eq!(current_price(&p, now()), Decimal::new(9000, 2));
        assert_eq!(current_price(&p, now()).to_string(), "90.00");
    }

    #[test]
    fn sale_not_started_yet_uses_list_price() {
        let p = product(Decimal::new(100, 0), Some(now() + Duration::hours(1)), None);
        assert!(!is_on_sale(&p, now()));
        assert_eq!(current_price(&p, now()).to_string(), "100.00");
    }

    #[test]
    fn bounded_window_is_inclusive_at_both_ends() {
        let start = now() - Duration::days(2);
        let end = now() + Duration::days(2);
        let window = SaleWindow {
            start: Some(start),
            end: Some(end),
        };
        assert!(window.contains(start));
        assert!(window.contains(now()));
        assert!(window.contains(end));
        assert!(!window.contains(end + Duration::seconds(1)));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn expired_sale_uses_list_price() {
        let p = product(
            Decimal::new(2000, 2),
            Some(now() - Duration::days(10)),
            Some(now() - Duration::days(1)),
        );
        assert!(!is_on_sale(&p, now()));
        assert_eq!(current_price(&p, now()), Decimal::new(2000, 2));
    }

    #[test]
    fn end_only_window_is_not_a_sale() {
        let p = product(Decimal::new(50, 0), None, Some(now() + Duration::days(3)));
        assert!(!is_on_sale(&p, now()));
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round_money(Decimal::new(1_125, 3)), Decimal::new(112, 2));
        assert_eq!(round_money(Decimal::new(1_135, 3)), Decimal::new(114, 2));
        assert_eq!(round_money(Decimal::new(7, 0)).to_string(), "7.00");
    }

    #[test]
    fn discounted_price_rounds_to_cents() {
        // 19.99 * 0.9 = 17.991
        let p = product(Decimal::new(1999, 2), Some(now()), None);
        assert_eq!(current_price(&p, now()), Decimal::new(1799, 2));
    }

    #[test]
    fn inverted_window_detection() {
        let inverted = SaleWindow {
            start: Some(now()),
            end: Some(now() - Duration::minutes(1)),
        };
        assert!(inverted.is_inverted());
        assert!(!SaleWindow::default().is_inverted());
    }
}
