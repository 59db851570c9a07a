//! Request error taxonomy.
//!
//! Client mistakes get a 4xx with a short explanation; anything that went
//! wrong on our side or upstream gets a generic body, with the real cause
//! logged server-side only.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The multipart body carried no `image` field.
    #[error("no image field in multipart body")]
    MissingImage,

    #[error("could not read multipart body")]
    InvalidMultipart(#[source] MultipartError),

    /// Bytes under the `image` field are not a recognized image format.
    #[error("uploaded bytes are not a recognized image format")]
    NotAnImage,

    #[error("upload exceeds the size limit")]
    TooLarge,

    /// Spooling the upload to disk or reading it back failed.
    #[error("temporary file error")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::InvalidMultipart(_) | ApiError::NotAnImage => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Provider(ProviderError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// What the client sees. Never includes upstream or filesystem detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::MissingImage => "No image file was uploaded.",
            ApiError::InvalidMultipart(_) => "The upload request could not be read.",
            ApiError::NotAnImage => "The uploaded file is not a supported image.",
            ApiError::TooLarge => "The uploaded image is too large.",
            ApiError::Io(_) | ApiError::Provider(_) => "Something went wrong.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, %status, "analyse request failed");
        } else {
            tracing::warn!(error = ?self, %status, "analyse request rejected");
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}
