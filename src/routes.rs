//! The `POST /analyse` upload handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::errors::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyseResponse {
    pub result: String,
}

/// Accepts one multipart field named `image`, spools it to disk for the
/// duration of the request, and relays it to the provider.
pub async fn analyse(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let data = image_field(&mut multipart).await?;

    let format = image::guess_format(&data).map_err(|_| ApiError::NotAnImage)?;
    tracing::info!(bytes = data.len(), format = ?format, "image uploaded");

    // Spooled upload lives exactly as long as this request: the temp file is
    // removed on drop no matter which way we exit.
    let spooled = tempfile::NamedTempFile::new_in(&state.config.upload_dir)?;
    tokio::fs::write(spooled.path(), &data).await?;
    let stored = tokio::fs::read(spooled.path()).await?;

    let data_url = format!("data:{};base64,{}", format.to_mime_type(), BASE64.encode(&stored));

    let _permit = state
        .provider_permits
        .acquire()
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "provider permits closed"))?;

    let result = state.provider.describe(&data_url).await?;

    tracing::info!(chars = result.len(), "provider returned a description");
    Ok(Json(AnalyseResponse { result }))
}

/// Finds the `image` field, ignoring any other form fields.
async fn image_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(classify)? {
        if field.name() == Some("image") {
            return field.bytes().await.map_err(classify);
        }
    }
    Err(ApiError::MissingImage)
}

fn classify(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge
    } else {
        ApiError::InvalidMultipart(err)
    }
}
