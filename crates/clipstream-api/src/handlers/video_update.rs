use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::models::{VideoResponse, VideoUpdate};

use crate::auth::Caller;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{parse_video_form, validate_metadata};

#[utoipa::path(
    put,
    path = "/api/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated video", body = VideoResponse),
        (status = 400, description = "Invalid fields or deleted video", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn update_video(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = parse_video_form(multipart).await?;
    validate_metadata(&form)?;

    let update = VideoUpdate {
        title: form.title.clone(),
        description: form.description.clone(),
        visibility: form.visibility,
        comments_enabled: form.comments_enabled,
        tags: form.tags.clone(),
    };

    let (record, tags) = state
        .ingest()
        .update(id, caller, update, form.thumbnail)
        .await?;

    Ok(Json(VideoResponse::from_record(
        record,
        tags,
        &state.config.base_url,
    )))
}
