//! Record lifecycle: reads, listings, soft delete, restore, permanent delete.

use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::models::{Page, PageRequest, VideoRecord};
use clipstream_core::{AppError, CallerContext, TagIndex, VideoCatalog};
use clipstream_storage::BlobStore;

pub struct VideoLifecycle {
    catalog: Arc<dyn VideoCatalog>,
    tags: Arc<dyn TagIndex>,
    blobs: Arc<dyn BlobStore>,
}

impl VideoLifecycle {
    pub fn new(
        catalog: Arc<dyn VideoCatalog>,
        tags: Arc<dyn TagIndex>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        VideoLifecycle {
            catalog,
            tags,
            blobs,
        }
    }

    /// Fetch a single record; deleted and unknown ids are both 404.
    pub async fn get(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        let record = self
            .catalog
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if record.deleted {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        Ok(record)
    }

    /// Public catalog listing: public, not deleted, ready; newest first.
    pub async fn list_public(&self, page: PageRequest) -> Result<Page, AppError> {
        self.catalog.find_public(page).await
    }

    /// Listing of one owner's videos. The owner themselves (and admins) also
    /// see non-public and non-ready records; everyone else sees the public
    /// slice only.
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        caller: Option<CallerContext>,
        page: PageRequest,
    ) -> Result<Page, AppError> {
        let include_hidden = caller.is_some_and(|c| c.may_modify(owner_id));
        self.catalog.find_by_owner(owner_id, include_hidden, page).await
    }

    /// Administrative listing: everything, deleted records included.
    pub async fn list_all(
        &self,
        caller: CallerContext,
        page: PageRequest,
    ) -> Result<Page, AppError> {
        if !caller.role.is_admin() {
            return Err(AppError::Forbidden(
                "Admin role required".to_string(),
            ));
        }
        self.catalog.find_all(page).await
    }

    /// Soft delete: owner or admin. The record and blobs stay; the video just
    /// disappears from every non-admin surface.
    pub async fn soft_delete(&self, id: Uuid, caller: CallerContext) -> Result<(), AppError> {
        let record = self
            .catalog
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if !caller.may_modify(record.owner_id) {
            return Err(AppError::Forbidden(
                "Only the owner or an admin may delete this video".to_string(),
            ));
        }

        self.catalog.mark_deleted(id).await?;
        tracing::info!(video_id = %id, caller_id = %caller.caller_id, "Video soft-deleted");
        Ok(())
    }

    /// Restore a soft-deleted record. Admin only.
    pub async fn restore(&self, id: Uuid, caller: CallerContext) -> Result<VideoRecord, AppError> {
        if !caller.role.is_admin() {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }

        let record = self
            .catalog
            .restore(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        tracing::info!(video_id = %id, "Video restored");
        Ok(record)
    }

    /// Permanent delete: admin only. The one operation that frees storage.
    /// Blob deletion failures are logged and skipped so a half-missing blob
    /// set cannot wedge the record forever.
    pub async fn purge(&self, id: Uuid, caller: CallerContext) -> Result<(), AppError> {
        if !caller.role.is_admin() {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }

        let record = self
            .catalog
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if let Err(e) = self.blobs.delete(&record.video_key).await {
            tracing::error!(video_id = %id, key = %record.video_key, error = %e, "Failed to delete video blob");
        }
        if let Some(key) = record.thumbnail_key.as_deref() {
            if let Err(e) = self.blobs.delete(key).await {
                tracing::error!(video_id = %id, key = key, error = %e, "Failed to delete thumbnail blob");
            }
        }

        self.tags.clear_tags_for_video(id).await?;
        self.catalog.hard_delete(id).await?;

        tracing::info!(video_id = %id, "Video permanently deleted");
        Ok(())
    }

    /// Whether a non-deleted record exists.
    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        self.catalog.exists(id).await
    }

    /// Non-deleted video count for one owner.
    pub async fn count_for_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        self.catalog.count_by_owner(owner_id).await
    }
}
