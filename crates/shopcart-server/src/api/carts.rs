//! Shopping cart handlers.
//!
//! - `POST   /api/v1/carts`     : create a cart with its items
//! - `GET    /api/v1/carts/{id}`: cart with priced lines and totals
//! - `DELETE /api/v1/carts/{id}`: delete a cart and its items

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopcart_core::{
    current_price, item_total, summarize, validate_cart, NewCartItem, ShoppingCart,
    ValidationError,
};
use shopcart_db::DbError;

use crate::middleware::RequestId;

use super::extract::{ApiJson, ApiPath};
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateCartRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub items: Vec<NewCartItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct CartDetail {
    pub id: i64,
    pub name: Option<String>,
    pub address: Option<String>,
    pub display_name: String,
    pub display_address: String,
    pub items: Vec<CartItemDetail>,
    pub subtotal: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub(super) struct CartItemDetail {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub current_price: Decimal,
    /// Whole currency units; cart totals keep cents.
    pub total: Decimal,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Price every line of `cart` as of `now`.
async fn cart_detail(
    state: &AppState,
    cart: ShoppingCart,
    now: DateTime<Utc>,
    request_id: &str,
) -> Result<CartDetail, ApiError> {
    let lines = state
        .carts
        .cart_lines(cart.id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?;

    let summary = summarize(&lines, now);
    let items = lines
        .iter()
        .map(|line| CartItemDetail {
            id: line.item.id,
            product_id: line.product.id,
            product_name: line.product.name.clone(),
            quantity: line.item.quantity,
            current_price: current_price(&line.product, now),
            total: item_total(line, now),
        })
        .collect();

    Ok(CartDetail {
        id: cart.id,
        display_name: cart.display_name().to_owned(),
        display_address: cart.display_address().to_owned(),
        name: cart.name,
        address: cart.address,
        items,
        subtotal: summary.subtotal,
        taxes: summary.taxes,
        total: summary.total,
    })
}

/// POST /api/v1/carts
pub(super) async fn create_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<CreateCartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CartDetail>>), ApiError> {
    let rid = &req_id.0;
    let name = blank_to_none(body.name);
    let address = blank_to_none(body.address);

    validate_cart(name.as_deref(), address.as_deref(), &body.items)
        .map_err(|e| ApiError::validation(rid.as_str(), e))?;

    let cart = state
        .carts
        .create_cart(name.as_deref(), address.as_deref(), &body.items)
        .await
        .map_err(|e| match e {
            DbError::UnknownProduct(product_id) => {
                let index = body
                    .items
                    .iter()
                    .position(|item| item.product_id == product_id)
                    .unwrap_or_default();
                ApiError::validation(
                    rid.as_str(),
                    ValidationError::single(
                        &format!("items[{index}].product_id"),
                        format!("product {product_id} does not exist"),
                    ),
                )
            }
            other => map_db_error(rid.clone(), &other),
        })?;
    tracing::info!(cart_id = cart.id, items = body.items.len(), "cart created");

    let detail = cart_detail(&state, cart, Utc::now(), rid).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: detail,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/carts/{id}
pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<CartDetail>>, ApiError> {
    let rid = &req_id.0;
    let cart = state
        .carts
        .get_cart(id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::not_found(rid.as_str(), format!("cart {id} not found")))?;

    let detail = cart_detail(&state, cart, Utc::now(), rid).await?;
    Ok(Json(ApiResponse {
        data: detail,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/carts/{id}
pub(super) async fn delete_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let rid = &req_id.0;
    let deleted = state
        .carts
        .delete_cart(id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    if !deleted {
        return Err(ApiError::not_found(rid.as_str(), format!("cart {id} not found")));
    }
    tracing::info!(cart_id = id, "cart deleted");
    Ok(StatusCode::NO_CONTENT)
}
