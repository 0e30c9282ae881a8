use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use futures::StreamExt;
use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::streamer::StreamBody;
use crate::state::AppState;

fn body_from(data: clipstream_storage::ByteStream) -> Body {
    Body::from_stream(data.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    }))
}

fn build_err(e: axum::http::Error) -> HttpAppError {
    HttpAppError(AppError::Internal(format!(
        "Failed to build response: {}",
        e
    )))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}/stream",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Full video body"),
        (status = 206, description = "Requested byte range"),
        (status = 400, description = "Malformed Range header", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable; Content-Range carries the size")
    )
)]
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    // A Range header that is not valid ASCII is as malformed as any other
    // unparseable range, so it gets the same 400.
    let range_header = headers
        .get(header::RANGE)
        .map(|value| {
            value.to_str().map_err(|_| {
                AppError::InvalidInput("Range header must be ASCII".to_string())
            })
        })
        .transpose()?;

    let stream = state.streamer().open(id, range_header).await?;

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, stream.content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    let builder = match stream.body {
        StreamBody::Full { size } => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, size),
        StreamBody::Partial { start, end, size } => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_LENGTH, end - start + 1)
            .header(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", start, end, size),
            ),
    };

    builder.body(body_from(stream.data)).map_err(build_err)
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}/thumbnail",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Thumbnail image"),
        (status = 404, description = "Video or thumbnail not found", body = ErrorResponse)
    )
)]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let thumbnail = state.streamer().open_thumbnail(id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, thumbnail.content_type)
        .header(header::CONTENT_LENGTH, thumbnail.size)
        .header(
            header::CACHE_CONTROL,
            crate::constants::THUMBNAIL_CACHE_CONTROL,
        )
        .body(body_from(thumbnail.data))
        .map_err(build_err)
}
