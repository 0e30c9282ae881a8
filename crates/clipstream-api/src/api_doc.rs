//! OpenAPI document, served at `/api/openapi.json`.

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use clipstream_core::models::{ProcessingStatus, VideoListResponse, VideoResponse, Visibility};

use crate::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "clipstream API",
        description = "Video ingestion and range-based streaming service"
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::video_upload::upload_video,
        crate::handlers::video_get::get_video,
        crate::handlers::video_get::list_videos,
        crate::handlers::video_get::list_user_videos,
        crate::handlers::video_get::list_my_videos,
        crate::handlers::video_get::list_all_videos,
        crate::handlers::video_update::update_video,
        crate::handlers::video_delete::delete_video,
        crate::handlers::video_delete::restore_video,
        crate::handlers::video_delete::purge_video,
        crate::handlers::video_stream::stream_video,
        crate::handlers::video_stream::get_thumbnail,
    ),
    components(schemas(
        VideoResponse,
        VideoListResponse,
        Visibility,
        ProcessingStatus,
        ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video catalog and streaming"),
        (name = "admin", description = "Administrative operations"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
