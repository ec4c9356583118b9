//! Token check for `/translate`
//!
//! A token may arrive as the `token` query parameter or in the
//! `Authorization` header, with or without a `Bearer ` / `DeepL-Auth-Key `
//! scheme. The request passes if either value is on the allow-list.

use crate::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Query, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    #[serde(default)]
    token: String,
}

/// Strip a `Bearer ` or `DeepL-Auth-Key ` scheme; anything else is used raw
pub fn strip_auth_scheme(header: &str) -> &str {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("DeepL-Auth-Key "))
        .unwrap_or(header)
}

fn is_authorized(state: &AppState, request: &Request) -> bool {
    let query_token = Query::<TokenQuery>::try_from_uri(request.uri())
        .map(|Query(query)| query.token)
        .unwrap_or_default();
    let header_token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(strip_auth_scheme)
        .unwrap_or("");

    state
        .tokens
        .authorizes([query_token.as_str(), header_token])
}

/// Middleware rejecting requests whose token is not on the allow-list
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_authorized(&state, &request) {
        warn!(path = %request.uri().path(), "rejected request with invalid token");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}
