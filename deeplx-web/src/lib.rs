//! HTTP surface for the deeplx translation gateway
//!
//! `GET /` answers with a short usage hint and `POST /translate` runs one
//! translation through the shared [`TranslationGateway`] after the token check.

pub mod auth;
pub mod error;
pub mod handlers;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use deeplx::{TokenAllowList, TranslationGateway};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub gateway: TranslationGateway,
    pub tokens: Arc<TokenAllowList>,
}

impl AppState {
    pub fn new(gateway: TranslationGateway, tokens: TokenAllowList) -> Self {
        Self {
            gateway,
            tokens: Arc::new(tokens),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/translate", post(handlers::translate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
