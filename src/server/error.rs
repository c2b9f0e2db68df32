use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

pub type AppResult<T> = Result<T, Error>;

/// every failure a request can end with, mapped onto an http status below
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// required url query parameter absent or empty
    #[error("Missing url")]
    MissingUrl,

    /// upstream answered with a non-success status, echoed back to the client
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// transport failed before any upstream response existed
    #[error("Error, something went wrong")]
    FetchFailed,

    #[error("failed to decompress gzip payload: {0}")]
    Decompression(String),

    #[error("failed to parse remote content: {0}")]
    Parse(String),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingUrl => StatusCode::BAD_REQUEST,
            Error::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Error::FetchFailed | Error::Decompression(_) | Error::Parse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!("request failed: {}", message);
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
