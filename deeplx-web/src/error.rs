use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use deeplx::GatewayError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failures the HTTP surface reports to clients
#[derive(Debug)]
pub enum ApiError {
    /// Token missing or not on the allow-list (401)
    Unauthorized,
    /// Invalid body or any pipeline failure (400), message passed through verbatim
    BadRequest(String),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid Token".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
