//! Product write handlers: create, full update, delete.
//!
//! Update and delete go through the cache-sync helpers in `shopcart_db` so
//! the `product_data_{id}` entry follows every successful write.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shopcart_core::{validate_product, ProductDraft, ProductInput};
use shopcart_db::{delete_and_invalidate, update_and_refresh};

use crate::middleware::RequestId;

use super::super::extract::{ApiJson, ApiPath};
use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::ProductItem;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body for both POST and PUT. Every field is optional at the wire level so
/// that missing values surface as field errors instead of a decode failure.
#[derive(Debug, Deserialize)]
pub(in crate::api) struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Accepts a JSON number or string; anything else fails as non-numeric.
    pub price: Option<serde_json::Value>,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

impl ProductRequest {
    fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            description: self.description,
            price: self.price.and_then(price_text),
            sale_start: self.sale_start,
            sale_end: self.sale_end,
            photo: self.photo,
        }
    }
}

fn price_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn validated_input(req_id: &str, body: ProductRequest) -> Result<ProductInput, ApiError> {
    validate_product(body.into_draft()).map_err(|e| ApiError::validation(req_id, e))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/products
pub(in crate::api) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductItem>>), ApiError> {
    let rid = &req_id.0;
    let input = validated_input(rid, body)?;

    let product = state
        .products
        .create_product(&input)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    tracing::info!(product_id = product.id, name = %product.name, "product created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ProductItem::from_product(product, Utc::now()),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/products/{id}
pub(in crate::api) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let rid = &req_id.0;
    let input = validated_input(rid, body)?;

    let product = update_and_refresh(state.products.as_ref(), state.cache.as_ref(), id, &input)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::not_found(rid.as_str(), format!("product {id} not found")))?;
    tracing::info!(product_id = id, "product updated");

    Ok(Json(ApiResponse {
        data: ProductItem::from_product(product, Utc::now()),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/products/{id}
pub(in crate::api) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let rid = &req_id.0;
    let deleted = delete_and_invalidate(state.products.as_ref(), state.cache.as_ref(), id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    if !deleted {
        return Err(ApiError::not_found(rid.as_str(), format!("product {id} not found")));
    }
    tracing::info!(product_id = id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_text_keeps_numbers_and_strings() {
        assert_eq!(price_text(json!(19.99)), Some("19.99".to_string()));
        assert_eq!(price_text(json!(12)), Some("12".to_string()));
        assert_eq!(price_text(json!("7.50")), Some("7.50".to_string()));
        assert_eq!(price_text(json!(null)), None);
    }

    #[test]
    fn non_scalar_price_is_reported_as_non_numeric() {
        let body = ProductRequest {
            name: Some("Tumbler".to_string()),
            description: Some("Double wall glass".to_string()),
            price: Some(json!([1, 2])),
            sale_start: None,
            sale_end: None,
            photo: None,
        };
        let err = validate_product(body.into_draft()).unwrap_err();
        assert_eq!(err.message_for("price"), Some("price must be numeric"));
    }
}
