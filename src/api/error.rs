use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snafu::Snafu;

use super::validate::ValidationError;
use crate::database::BackendError;
use crate::model::VideoId;
use crate::Located;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(transparent)]
    Validation { source: ValidationError },

    #[snafu(display("no video found with id {id}"))]
    VideoNotFound { id: String },

    #[snafu(display("a video with id {id} already exists"))]
    VideoExists { id: VideoId },

    /// The cause is logged but never sent to the client.
    #[snafu(display("{message}"))]
    Storage {
        message: &'static str,
        source: BackendError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::VideoNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::VideoExists { .. } => StatusCode::CONFLICT,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage { message, source } = &self {
            tracing::error!(error = %source, location = %source.location(), "{message}");
        }

        let content = ErrorResponse {
            message: self.to_string(),
        };

        (self.status(), Json(content)).into_response()
    }
}
