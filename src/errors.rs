use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::error;

/// Every error body has the same shape: `{"detail": "..."}`.
fn detail(status: StatusCode, message: impl fmt::Display) -> Response {
    (status, Json(json!({ "detail": message.to_string() }))).into_response()
}

pub fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "Note not found")
}

/// Something went wrong below the HTTP layer, almost always in storage.
/// The client learns nothing beyond the 500; the log gets the full chain.
#[derive(Debug)]
pub struct ServerError(Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("{:?}", self.0);
        detail(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
    }
}

// Lets handlers `?` straight through repository calls.
impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// A payload that parsed fine but breaks a field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        detail(StatusCode::UNPROCESSABLE_ENTITY, self)
    }
}
