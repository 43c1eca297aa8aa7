//! `cart` sub-command handlers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use shopcart_core::{current_price, item_total, summarize, CartLine, ShoppingCart};
use shopcart_db::{CartStore, PgStore};
use sqlx::PgPool;

pub(crate) async fn run_summary(pool: PgPool, id: i64) -> anyhow::Result<()> {
    let store = PgStore::new(pool);
    let cart = store
        .get_cart(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("cart {id} not found"))?;
    let lines = store.cart_lines(id).await?;

    print!("{}", render_summary(&cart, &lines, Utc::now()));
    Ok(())
}

/// Plain-text cart report: the cart, one row per line, then the totals.
pub(crate) fn render_summary(cart: &ShoppingCart, lines: &[CartLine], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{cart}");
    for line in lines {
        let _ = writeln!(
            out,
            "  {line}  @ {}  = {}",
            current_price(&line.product, now),
            item_total(line, now)
        );
    }

    let summary = summarize(lines, now);
    let _ = writeln!(out, "subtotal  {}", summary.subtotal);
    let _ = writeln!(out, "taxes     {}", summary.taxes);
    let _ = writeln!(out, "total     {}", summary.total);
    out
}
