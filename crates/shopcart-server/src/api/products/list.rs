use axum::{
    extract::State,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shopcart_db::ProductFilters;

use crate::middleware::RequestId;

use super::super::extract::ApiQuery;
use super::super::{
    map_db_error, normalize_limit, normalize_offset, ApiError, ApiResponse, AppState, ResponseMeta,
};
use super::ProductItem;

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ProductQuery {
    pub search: Option<String>,
    pub id: Option<i64>,
    /// Only the literal `true` (any case) turns the sale filter on.
    pub on_sale: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ProductPageData {
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
    pub results: Vec<ProductItem>,
}

fn on_sale_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

pub(in crate::api) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<ApiResponse<ProductPageData>>, ApiError> {
    let now = Utc::now();
    let limit = normalize_limit(query.limit, state.paging);
    let offset = normalize_offset(query.offset);

    let filters = ProductFilters {
        id: query.id,
        search: query
            .search
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty()),
        on_sale: on_sale_requested(query.on_sale.as_deref()),
        now,
        limit,
        offset,
    };

    let page = state
        .products
        .list_products(&filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let results = page
        .items
        .into_iter()
        .map(|product| ProductItem::from_product(product, now))
        .collect();

    Ok(Json(ApiResponse {
        data: ProductPageData {
            count: page.count,
            limit,
            offset,
            results,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::on_sale_requested;

    #[test]
    fn on_sale_flag_accepts_only_true() {
        assert!(on_sale_requested(Some("true")));
        assert!(on_sale_requested(Some("TRUE")));
        assert!(on_sale_requested(Some("True")));
        assert!(!on_sale_requested(Some("1")));
        assert!(!on_sale_requested(Some("yes")));
        assert!(!on_sale_requested(Some("")));
        assert!(!on_sale_requested(None));
    }
}
