//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relgrid_core::{ErrorKind, GridError};
use serde_json::json;

/// Error returned by a route
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Failure reported by the session
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Grid(err) => match err.kind() {
                ErrorKind::Schema => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Link => StatusCode::CONFLICT,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self::Grid(err) = &self;
        let status = self.status();
        tracing::debug!(target: "relgrid::server", %status, "{}", err);
        let body = json!({
            "error": err.kind().to_string(),
            "message": err.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
