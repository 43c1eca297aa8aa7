use axum::{
    extract::State,
    Extension, Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use shopcart_core::average_product_sold;

use crate::middleware::RequestId;

use super::super::extract::ApiPath;
use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::{resolve_product, ProductItem};

#[derive(Debug, Serialize)]
pub(in crate::api) struct ProductStats {
    pub product_id: i64,
    /// Units in every cart item that references the product.
    pub total_quantity: i64,
    /// Every cart in existence, whether or not it holds the product.
    pub cart_count: i64,
    pub average_product_sold: Decimal,
}

/// GET /api/v1/products/{id}
pub(in crate::api) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let product = resolve_product(&state, id, &req_id.0).await?;

    Ok(Json(ApiResponse {
        data: ProductItem::from_product(product, Utc::now()),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/products/{id}/stats
pub(in crate::api) async fn get_product_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<ProductStats>>, ApiError> {
    let rid = &req_id.0;
    let product = resolve_product(&state, id, rid).await?;

    let total_quantity = state
        .carts
        .sold_quantity(product.id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let cart_count = state
        .carts
        .count_carts()
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let average = average_product_sold(total_quantity, cart_count);
    if !average.is_computed() {
        tracing::debug!(
            product_id = product.id,
            total_quantity,
            cart_count,
            outcome = ?average,
            "average_product_sold undefined, reporting 0"
        );
    }

    Ok(Json(ApiResponse {
        data: ProductStats {
            product_id: product.id,
            total_quantity,
            cart_count,
            average_product_sold: average.value(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
