//! Extractors whose rejections use the API error envelope.
//!
//! axum's own `Json`, `Query` and `Path` reject with plain-text 4xx bodies.
//! These wrappers turn every rejection into a `validation_error` whose
//! `fields` entry names the offending field when the decoder reports one.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, Extensions},
    Json,
};
use serde::de::DeserializeOwned;
use shopcart_core::ValidationError;

use crate::middleware::RequestId;

use super::ApiError;

/// JSON request body.
pub(super) struct ApiJson<T>(pub T);

/// Query string.
pub(super) struct ApiQuery<T>(pub T);

/// Path parameters.
pub(super) struct ApiPath<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = request_id_of(req.extensions());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(request_id, "body", &rejection.body_text())),
        }
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(
                request_id_of(&parts.extensions),
                "query",
                &rejection.body_text(),
            )),
        }
    }
}

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(
                request_id_of(&parts.extensions),
                "id",
                &rejection.body_text(),
            )),
        }
    }
}

fn request_id_of(extensions: &Extensions) -> String {
    extensions
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

// Decoder messages look like "<prefix>: <field path>: <reason>".
const REJECTION_PREFIXES: [&str; 2] = ["into the target type: ", "query string: "];

fn rejection_error(request_id: String, fallback_field: &str, text: &str) -> ApiError {
    let detail = REJECTION_PREFIXES
        .iter()
        .find_map(|prefix| text.split_once(prefix).map(|(_, rest)| rest))
        .unwrap_or(text);

    let err = match detail.split_once(": ") {
        Some((path, reason)) if is_field_path(path) => ValidationError::single(path, reason),
        _ => ValidationError::single(fallback_field, detail),
    };
    ApiError::validation(request_id, err)
}

fn is_field_path(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate != "."
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}
