//! Collaborator traits for persistence.
//!
//! The ingestion, lifecycle, and streaming services only ever see these
//! traits; concrete backends (Postgres in clipstream-db, in-memory doubles in
//! tests) are wired in at startup behind `Arc<dyn …>`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Page, PageRequest, Tag, VideoRecord};

/// The video catalog: create/read/update/mark-deleted/mark-restored records,
/// keyed by video id.
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Insert a new record. Fails if the id already exists.
    async fn create(&self, record: &VideoRecord) -> Result<(), AppError>;

    /// Fetch a record by id, deleted or not. Callers apply visibility rules.
    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Persist all mutable fields of an existing record and refresh its
    /// `updated_at` timestamp.
    async fn save(&self, record: &VideoRecord) -> Result<(), AppError>;

    /// Public listing: `visibility = public`, not deleted, status ready,
    /// newest first.
    async fn find_public(&self, page: PageRequest) -> Result<Page, AppError>;

    /// Per-owner listing. With `include_hidden`, non-public and non-ready
    /// records are returned too (owner/admin view); deleted records never are.
    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        include_hidden: bool,
        page: PageRequest,
    ) -> Result<Page, AppError>;

    /// Administrative listing: every record, including deleted ones.
    async fn find_all(&self, page: PageRequest) -> Result<Page, AppError>;

    /// Set the soft-delete flag. Returns the updated record, `None` if absent.
    async fn mark_deleted(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Clear the soft-delete flag. Returns the updated record, `None` if absent.
    async fn restore(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Remove the record permanently. Idempotent.
    async fn hard_delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Whether a non-deleted record with this id exists.
    async fn exists(&self, id: Uuid) -> Result<bool, AppError>;

    /// Number of non-deleted records owned by `owner_id`.
    async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, AppError>;
}

/// The tag index: free-text tags associated with videos.
///
/// `replace_tags_for_video` is delete-all-then-reinsert, which is not safe
/// under unserialized concurrent writers for the same video; implementations
/// must serialize replacement (e.g. a transaction) and callers must not assume
/// last-writer-wins merging.
#[async_trait]
pub trait TagIndex: Send + Sync {
    /// Case-insensitive find-or-create by name.
    async fn find_or_create(&self, name: &str) -> Result<Tag, AppError>;

    /// Replace the full association set for a video with the given tag ids.
    async fn replace_tags_for_video(
        &self,
        video_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), AppError>;

    /// Tag names associated with a video, alphabetical.
    async fn tag_names_for_video(&self, video_id: Uuid) -> Result<Vec<String>, AppError>;

    /// Drop every association for a video (permanent-delete path).
    async fn clear_tags_for_video(&self, video_id: Uuid) -> Result<(), AppError>;
}
