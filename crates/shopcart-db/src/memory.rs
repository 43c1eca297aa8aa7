//! In-process store with the same semantics as [`crate::PgStore`].
//!
//! Used by router tests and for running the server without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use shopcart_core::{
    CartLine, NewCartItem, Product, ProductInput, ShoppingCart, ShoppingCartItem,
};
use tokio::sync::RwLock;

use crate::store::{CartStore, ProductFilters, ProductPage, ProductStore};
use crate::DbError;

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<i64, Product>,
    carts: BTreeMap<i64, ShoppingCart>,
    items: BTreeMap<i64, ShoppingCartItem>,
    next_product_id: i64,
    next_cart_id: i64,
    next_item_id: i64,
}

impl State {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn product_matches(
    product: &Product,
    filters: &ProductFilters,
    needle: Option<&str>,
) -> bool {
    if filters.id.is_some_and(|id| id != product.id) {
        return false;
    }
    if let Some(needle) = needle {
        let hit = product.name.to_lowercase().contains(needle)
            || product.description.to_lowercase().contains(needle);
        if !hit {
            return false;
        }
    }
    !filters.on_sale || product.sale_window().contains(filters.now)
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn list_products(&self, filters: &ProductFilters) -> Result<ProductPage, DbError> {
        let state = self.state.read().await;
        let needle = filters.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&Product> = state
            .products
            .values()
            .filter(|p| product_matches(p, filters, needle.as_deref()))
            .collect();

        let offset = usize::try_from(filters.offset).unwrap_or(0);
        let limit = usize::try_from(filters.limit).unwrap_or(0);
        let items = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|p| (*p).clone())
            .collect();

        Ok(ProductPage {
            count: i64::try_from(matching.len()).unwrap_or(i64::MAX),
            items,
        })
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, DbError> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, DbError> {
        let mut state = self.state.write().await;
        let id = State::next_id(&mut state.next_product_id);
        let now = Utc::now();
        let product = Product {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            sale_start: input.sale_start,
            sale_end: input.sale_end,
            photo: input.photo.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        input: &ProductInput,
    ) -> Result<Option<Product>, DbError> {
        let mut state = self.state.write().await;
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        product.name.clone_from(&input.name);
        product.description.clone_from(&input.description);
        product.price = input.price;
        product.sale_start = input.sale_start;
        product.sale_end = input.sale_end;
        product.photo.clone_from(&input.photo);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        if state.products.remove(&id).is_none() {
            return Ok(false);
        }
        state.items.retain(|_, item| item.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn create_cart(
        &self,
        name: Option<&str>,
        address: Option<&str>,
        items: &[NewCartItem],
    ) -> Result<ShoppingCart, DbError> {
        let mut state = self.state.write().await;
        if let Some(missing) = items
            .iter()
            .find(|i| !state.products.contains_key(&i.product_id))
        {
            return Err(DbError::UnknownProduct(missing.product_id));
        }

        let cart = ShoppingCart {
            id: State::next_id(&mut state.next_cart_id),
            name: name.map(str::to_string),
            address: address.map(str::to_string),
            created_at: Utc::now(),
        };
        state.carts.insert(cart.id, cart.clone());

        for new_item in items {
            let id = State::next_id(&mut state.next_item_id);
            state.items.insert(
                id,
                ShoppingCartItem {
                    id,
                    shopping_cart_id: cart.id,
                    product_id: new_item.product_id,
                    quantity: new_item.quantity,
                },
            );
        }

        Ok(cart)
    }

    async fn get_cart(&self, id: i64) -> Result<Option<ShoppingCart>, DbError> {
        Ok(self.state.read().await.carts.get(&id).cloned())
    }

    async fn cart_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, DbError> {
        let state = self.state.read().await;
        let lines = state
            .items
            .values()
            .filter(|item| item.shopping_cart_id == cart_id)
            .filter_map(|item| {
                state.products.get(&item.product_id).map(|product| CartLine {
                    item: item.clone(),
                    product: product.clone(),
                })
            })
            .collect();
        Ok(lines)
    }

    async fn delete_cart(&self, id: i64) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        if state.carts.remove(&id).is_none() {
            return Ok(false);
        }
        state.items.retain(|_, item| item.shopping_cart_id != id);
        Ok(true)
    }

    async fn count_carts(&self) -> Result<i64, DbError> {
        let count = self.state.read().await.carts.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn sold_quantity(&self, product_id: i64) -> Result<i64, DbError> {
        let total = self
            .state
            .read()
            .await
            .items
            .values()
            .filter(|item| item.product_id == product_id)
            .map(|item| i64::from(item.quantity))
            .sum();
        Ok(total)
    }
}
