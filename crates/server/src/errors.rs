use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::ServiceError;
use tracing::{error, warn};

pub const INVALID_DICT: &str = "Dict inválido ou ausente.";
pub const SAVE_FAILED: &str = "Falha ao salvar o dict no arquivo.";

/// Handler error: a `ServiceError` rendered as `{"error": "..."}`.
/// Clients get the fixed messages above; the detail goes to the log.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = if self.0.is_client_error() {
            warn!(error = %self.0, "rejected submission");
            (StatusCode::BAD_REQUEST, INVALID_DICT)
        } else {
            error!(error = %self.0, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
        };
        (status, Json(ErrorBody { error: msg.to_string() })).into_response()
    }
}
