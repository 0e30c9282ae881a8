//! Route table and middleware stack.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use clipstream_core::Config;

use crate::api_doc::openapi_json;
use crate::constants::BODY_LIMIT_SLACK_BYTES;
use crate::handlers::{
    health::health,
    video_delete::{delete_video, purge_video, restore_video},
    video_get::{get_video, list_all_videos, list_my_videos, list_user_videos, list_videos},
    video_stream::{get_thumbnail, stream_video},
    video_update::update_video,
    video_upload::upload_video,
};
use crate::state::AppState;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // Multipart bodies include framing overhead on top of the file payloads.
    let body_limit = state.config.max_video_size_bytes
        + state.config.max_thumbnail_size_bytes
        + BODY_LIMIT_SLACK_BYTES;

    let cors = cors_layer(&state.config);

    // Static segments (my, user, admin) are registered alongside the {id}
    // routes; axum gives static segments priority.
    Router::new()
        .route("/api/health", get(health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/videos", post(upload_video).get(list_videos))
        .route("/api/videos/my", get(list_my_videos))
        .route("/api/videos/user/{user_id}", get(list_user_videos))
        .route("/api/videos/admin/all", get(list_all_videos))
        .route("/api/videos/admin/{id}/restore", put(restore_video))
        .route("/api/videos/admin/{id}/permanent", delete(purge_video))
        .route(
            "/api/videos/{id}",
            get(get_video).put(update_video).delete(delete_video),
        )
        .route("/api/videos/{id}/stream", get(stream_video))
        .route("/api/videos/{id}/thumbnail", get(get_thumbnail))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
