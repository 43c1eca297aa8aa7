//! Live integration tests for the Postgres store using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/shopcart-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use shopcart_core::{NewCartItem, ProductInput};
use shopcart_db::{
    delete_and_invalidate, seed_products, update_and_refresh, CartStore, DbError, MemoryCache,
    PgStore, ProductCache, ProductFilters, ProductStore,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn product(name: &str, cents: i64) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: format!("{name}, hand made"),
        price: Decimal::new(cents, 2),
        sale_start: None,
        sale_end: None,
        photo: None,
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn product_crud_roundtrip(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);

    let created = store
        .create_product(&product("Walnut Board", 4500))
        .await
        .expect("create_product failed");
    assert_eq!(created.price, Decimal::new(4500, 2));

    let fetched = store
        .get_product(created.id)
        .await
        .expect("get_product failed")
        .expect("product should exist");
    assert_eq!(fetched.name, "Walnut Board");

    let updated = store
        .update_product(created.id, &product("Oak Board", 3900))
        .await
        .expect("update_product failed")
        .expect("product should exist");
    assert_eq!(updated.name, "Oak Board");
    assert!(updated.updated_at >= created.updated_at);

    assert!(store.delete_product(created.id).await.expect("delete failed"));
    assert!(!store.delete_product(created.id).await.expect("delete failed"));
    assert!(store.get_product(created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_unknown_product_returns_none(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    let result = store
        .update_product(9_999, &product("Nothing", 100))
        .await
        .expect("update_product failed");
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_products_filters_and_counts(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    let now = Utc::now();

    let mut open_ended = product("Linen Apron", 2800);
    open_ended.sale_start = Some(now - Duration::days(1));
    let mut bounded = product("Cotton Apron", 2200);
    bounded.sale_start = Some(now - Duration::days(1));
    bounded.sale_end = Some(now + Duration::days(1));
    let mut end_only = product("Wool Apron", 3000);
    end_only.sale_end = Some(now + Duration::days(1));

    let mut created = Vec::new();
    for p in [&open_ended, &bounded, &end_only, &product("Ceramic Mug", 1200)] {
        created.push(store.create_product(p).await.expect("create_product failed"));
    }

    let mut by_id = ProductFilters::page(10, now);
    by_id.id = Some(created[2].id);
    let page = store.list_products(&by_id).await.expect("list failed");
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].name, "Wool Apron");

    by_id.on_sale = true;
    let page = store.list_products(&by_id).await.expect("list failed");
    assert_eq!(page.count, 0, "id and on_sale combine with AND");

    let mut filters = ProductFilters::page(10, now);
    filters.search = Some("APRON".to_string());
    let page = store.list_products(&filters).await.expect("list failed");
    assert_eq!(page.count, 3);

    filters.on_sale = true;
    let page = store.list_products(&filters).await.expect("list failed");
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Linen Apron", "Cotton Apron"]);

    let mut paged = ProductFilters::page(1, now);
    paged.offset = 2;
    let page = store.list_products(&paged).await.expect("list failed");
    assert_eq!(page.count, 4);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Wool Apron");
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_treats_wildcards_literally(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    store
        .create_product(&product("Mug 50% off", 500))
        .await
        .unwrap();
    store.create_product(&product("Mug 500", 500)).await.unwrap();

    let mut filters = ProductFilters::page(10, Utc::now());
    filters.search = Some("50%".to_string());
    let page = store.list_products(&filters).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].name, "Mug 50% off");
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn cart_lines_and_cascades(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    let a = store.create_product(&product("Spoon", 300)).await.unwrap();
    let b = store.create_product(&product("Fork", 350)).await.unwrap();

    let cart = store
        .create_cart(
            Some("Ada"),
            Some("12 Analytical Way"),
            &[
                NewCartItem {
                    product_id: a.id,
                    quantity: 4,
                },
                NewCartItem {
                    product_id: b.id,
                    quantity: 2,
                },
            ],
        )
        .await
        .expect("create_cart failed");

    let lines = store.cart_lines(cart.id).await.expect("cart_lines failed");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product.name, "Spoon");
    assert_eq!(lines[0].item.quantity, 4);

    assert!(store.delete_product(a.id).await.unwrap());
    let lines = store.cart_lines(cart.id).await.unwrap();
    assert_eq!(lines.len(), 1, "deleting a product removes its cart items");

    assert!(store.delete_cart(cart.id).await.unwrap());
    assert_eq!(store.sold_quantity(b.id).await.unwrap(), 0);
    assert_eq!(store.count_carts().await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_cart_with_unknown_product_writes_nothing(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    let err = store
        .create_cart(
            None,
            None,
            &[NewCartItem {
                product_id: 424_242,
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UnknownProduct(424_242)));
    assert_eq!(store.count_carts().await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn sold_quantity_sums_all_items(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    let p = store.create_product(&product("Napkin", 150)).await.unwrap();
    for quantity in [1, 2, 3] {
        store
            .create_cart(
                None,
                None,
                &[NewCartItem {
                    product_id: p.id,
                    quantity,
                }],
            )
            .await
            .unwrap();
    }
    assert_eq!(store.sold_quantity(p.id).await.unwrap(), 6);
    assert_eq!(store.count_carts().await.unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Cache sync and seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn update_and_delete_keep_cache_in_step(pool: sqlx::PgPool) {
    let store = PgStore::new(pool);
    let cache = MemoryCache::new();
    let p = store.create_product(&product("Teapot", 3200)).await.unwrap();
    let key = format!("product_data_{}", p.id);

    update_and_refresh(&store, &cache, p.id, &product("Teapot XL", 3600))
        .await
        .unwrap();
    let cached = cache.get(&key).await.unwrap().expect("cache entry");
    assert_eq!(cached.name, "Teapot XL");
    assert_eq!(cached.price, Decimal::new(3600, 2));

    assert!(delete_and_invalidate(&store, &cache, p.id).await.unwrap());
    assert!(cache.get(&key).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn seed_products_is_idempotent(pool: sqlx::PgPool) {
    let catalog = vec![product("Kettle", 3990), product("Filters", 450)];
    assert_eq!(seed_products(&pool, &catalog).await.unwrap(), 2);

    let mut changed = catalog.clone();
    changed[0].price = Decimal::new(3490, 2);
    assert_eq!(seed_products(&pool, &changed).await.unwrap(), 2);

    let store = PgStore::new(pool);
    let page = store
        .list_products(&ProductFilters::page(10, Utc::now()))
        .await
        .unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.items[0].price, Decimal::new(3490, 2));
}
