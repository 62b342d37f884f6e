use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shoplist_db::StoreError;
use thiserror::Error;
use tracing::error;

/// Every failure the HTTP surface can report. The display text is the exact
/// response body; nothing from the store leaks past `Internal`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid entry ID.")]
    InvalidEntry,

    #[error("Couldn't delete row {0}.")]
    DeleteFailed(String),

    #[error("Unsupported method.")]
    UnsupportedMethod,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidEntry
            | ApiError::DeleteFailed(_)
            | ApiError::UnsupportedMethod => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::NotFound { .. } => ApiError::InvalidEntry,
            other => {
                error!("Store failure: {}", other);
                ApiError::Internal
            }
        }
    }
}
