//! Mapping of request failures to HTTP responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use pixel_brief_model::BriefError;
use pixel_brief_render::{ExportError, RenderError};
use pixel_brief_store::StoreError;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Brief(#[from] BriefError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Brief(BriefError::MissingOrderName)
            | ApiError::Store(StoreError::MissingOrderName)
            | ApiError::Export(ExportError::MissingOrderName) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Brief(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Render(_) | ApiError::Export(_) | ApiError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_is_unprocessable() {
        assert_eq!(
            ApiError::from(BriefError::MissingOrderName).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ExportError::MissingOrderName).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn bad_form_is_bad_request() {
        let err = ApiError::from(BriefError::InvalidDeadline {
            field: "date",
            value: "x".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_body_is_plain_text() {
        let response = ApiError::from(BriefError::MissingOrderName).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn store_failure_is_server_error() {
        assert_eq!(
            ApiError::from(StoreError::Poisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
