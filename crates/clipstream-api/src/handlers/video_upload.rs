use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use clipstream_core::models::VideoResponse;

use crate::auth::Caller;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::parse_video_form;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video ingested", body = VideoResponse),
        (status = 400, description = "Invalid metadata or file", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Caller may not upload", body = ErrorResponse),
        (status = 413, description = "File exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = parse_video_form(multipart).await?;
    let (record, tags) = state.ingest().upload(caller, form).await?;
    let body = VideoResponse::from_record(record, tags, &state.config.base_url);

    Ok((StatusCode::CREATED, Json(body)))
}
