use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::models::VideoResponse;

use crate::auth::Caller;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video soft-deleted"),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.lifecycle().soft_delete(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/videos/admin/{id}/restore",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video restored", body = VideoResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn restore_video(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.lifecycle().restore(id, caller).await?;
    let tags = state.tags.tag_names_for_video(id).await?;

    Ok(Json(VideoResponse::from_record(
        record,
        tags,
        &state.config.base_url,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/videos/admin/{id}/permanent",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video and blobs permanently removed"),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn purge_video(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.lifecycle().purge(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
