//! Image listing, upload and retrieval.

use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::{blocking, ServeError};
use crate::prelude::*;

#[derive(Debug, Serialize)]
pub struct ImageList {
    images: Vec<String>,
}

/// Outcome of an upload, in the shape the editor's upload widget expects.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum UploadResult {
    Success,
    Error { message: String },
}

pub async fn list(
    State(ctx): State<Context>,
    Path(project): Path<String>,
) -> Result<Json<ImageList>, ServeError> {
    let images = blocking(move || Ok(ctx.store.images(&project)?)).await?;
    Ok(Json(ImageList { images }))
}

/// Stores the multipart field named `file` under its own file name.
pub async fn upload(
    State(ctx): State<Context>,
    Path(project): Path<String>,
    multipart: Multipart,
) -> (StatusCode, Json<UploadResult>) {
    match store_upload(ctx, project, multipart).await {
        Ok(()) => (StatusCode::OK, Json(UploadResult::Success)),
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                error!("Image upload failed: {}", err.message());
            }
            (status, Json(UploadResult::Error { message: err.message() }))
        }
    }
}

async fn store_upload(
    ctx: Context,
    project: String,
    mut multipart: Multipart,
) -> Result<(), ServeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServeError::bad_request(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let Some(name) = field.file_name().map(str::to_owned) else {
            return Err(ServeError::bad_request("The \"file\" field has no file name."));
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|err| ServeError::bad_request(err.to_string()))?;

        return blocking(move || Ok(ctx.store.write_image(&project, &name, &bytes)?)).await;
    }

    Err(ServeError::bad_request("No \"file\" field in upload."))
}

pub async fn delete(
    State(ctx): State<Context>,
    Path((project, image)): Path<(String, String)>,
) -> Result<StatusCode, ServeError> {
    blocking(move || Ok(ctx.store.delete_image(&project, &image)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serves raw image bytes.
pub async fn fetch(
    State(ctx): State<Context>,
    Path((project, image)): Path<(String, String)>,
) -> Result<Response, ServeError> {
    let content_type = content_type(&image);
    let bytes = blocking(move || Ok(ctx.store.read_image(&project, &image)?)).await?;

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn content_type(name: &str) -> &'static str {
    let extension = FsPath::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
