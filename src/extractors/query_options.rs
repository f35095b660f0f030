//! Extract [`QueryOptions`] from the request URI's query string.

use crate::error::AppError;
use crate::options::QueryOptions;
use crate::request::parse_query_options;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// Extractor for list-request options. Decoding is lossy: a bad percent-escape stays
/// literal and invalid UTF-8 becomes U+FFFD, so any query string parses.
#[derive(Clone, Debug)]
pub struct ListQuery(pub QueryOptions);

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ListQuery(parse_query_options(&pairs)))
    }
}
