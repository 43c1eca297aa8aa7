use shopcart_core::ProductInput;
use sqlx::PgPool;

use crate::DbError;

/// Upsert seed products into the database, matching existing rows by
/// case-insensitive name.
///
/// Returns the number of products processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_products(pool: &PgPool, products: &[ProductInput]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for product in products {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM products WHERE lower(name) = lower($1) ORDER BY id LIMIT 1",
        )
        .bind(&product.name)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(id) = existing {
            sqlx::query(
                "UPDATE products SET \
                     description = $2, \
                     price = $3, \
                     sale_start = $4, \
                     sale_end = $5, \
                     photo = $6, \
                     updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.sale_start)
            .bind(product.sale_end)
            .bind(&product.photo)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                "INSERT INTO products (name, description, price, sale_start, sale_end, photo) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.sale_start)
            .bind(product.sale_end)
            .bind(&product.photo)
            .execute(&mut *tx)
            .await?;
        }

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
