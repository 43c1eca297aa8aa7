//! `db` sub-command handlers.

use std::path::Path;

use sqlx::PgPool;

pub(crate) async fn run_ping(pool: &PgPool) -> anyhow::Result<()> {
    shopcart_db::ping(pool).await?;
    println!("database reachable");
    Ok(())
}

pub(crate) async fn run_migrate(pool: &PgPool) -> anyhow::Result<()> {
    let applied = shopcart_db::run_migrations(pool).await?;
    tracing::info!(applied, "migrations complete");
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Validate the catalog file, then upsert every product in one transaction.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or if
/// any upsert fails. Nothing is written in either case.
pub(crate) async fn run_seed(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let products = shopcart_core::load_catalog(path)?;
    tracing::info!(path = %path.display(), products = products.len(), "loaded catalog");

    let count = shopcart_db::seed_products(pool, &products).await?;
    println!("seeded {count} product(s) from {}", path.display());
    Ok(())
}
