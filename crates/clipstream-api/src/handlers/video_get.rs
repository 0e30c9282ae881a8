use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::models::{PageRequest, VideoListResponse, VideoResponse};

use crate::auth::{Caller, MaybeCaller};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::page_to_response;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video metadata", body = VideoResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.lifecycle().get(id).await?;
    let tags = state.tags.tag_names_for_video(id).await?;

    Ok(Json(VideoResponse::from_record(
        record,
        tags,
        &state.config.base_url,
    )))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Public video listing", body = VideoListResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = state.lifecycle().list_public(page).await?;
    Ok(Json(page_to_response(&state, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos/user/{user_id}",
    tag = "videos",
    params(
        ("user_id" = Uuid, Path, description = "Owner ID"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Owner's videos; hidden ones only for the owner or an admin", body = VideoListResponse)
    )
)]
pub async fn list_user_videos(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = state
        .lifecycle()
        .list_for_owner(user_id, caller, page)
        .await?;
    Ok(Json(page_to_response(&state, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos/my",
    tag = "videos",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Caller's own videos, hidden ones included", body = VideoListResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse)
    )
)]
pub async fn list_my_videos(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = state
        .lifecycle()
        .list_for_owner(caller.caller_id, Some(caller), page)
        .await?;
    Ok(Json(page_to_response(&state, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos/admin/all",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Every video, deleted ones included", body = VideoListResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn list_all_videos(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = state.lifecycle().list_all(caller, page).await?;
    Ok(Json(page_to_response(&state, page).await?))
}
