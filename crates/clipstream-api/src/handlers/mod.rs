pub mod health;
pub mod video_delete;
pub mod video_get;
pub mod video_stream;
pub mod video_update;
pub mod video_upload;

use std::sync::Arc;

use clipstream_core::models::{Page, VideoListResponse, VideoResponse};
use clipstream_core::AppError;

use crate::state::AppState;

/// Hydrate one page of records into the list response shape. Tag names are
/// fetched per record; pages are capped small enough that this stays cheap.
pub(crate) async fn page_to_response(
    state: &Arc<AppState>,
    page: Page,
) -> Result<VideoListResponse, AppError> {
    let total_pages = page.total_pages();
    let mut items = Vec::with_capacity(page.items.len());
    for record in page.items {
        let tags = state.tags.tag_names_for_video(record.id).await?;
        items.push(VideoResponse::from_record(
            record,
            tags,
            &state.config.base_url,
        ));
    }

    Ok(VideoListResponse {
        items,
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages,
    })
}
