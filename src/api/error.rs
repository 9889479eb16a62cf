//! Mapping of [`DirectoryError`] onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::envelope::ApiEnvelope;
use crate::error::DirectoryError;

/// Handler error: a [`DirectoryError`] rendered as an envelope with
/// `data: null` and the variant's status code.
#[derive(Debug)]
pub struct AppError(pub DirectoryError);

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DirectoryError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.0.to_string();

        if self.0.is_client_error() {
            tracing::warn!(status = status.as_u16(), "{message}");
        } else {
            tracing::error!(status = status.as_u16(), "{message}");
        }

        ApiEnvelope::empty(status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError(DirectoryError::NotFound("company 1".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_maps_to_500() {
        let resp = AppError(DirectoryError::Storage(anyhow::anyhow!("down"))).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
