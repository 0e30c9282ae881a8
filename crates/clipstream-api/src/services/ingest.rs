//! Video ingestion.
//!
//! Ordering invariant: blobs are persisted before any catalog write, so a
//! storage failure can never leave a catalog record pointing at nothing, and
//! a catalog failure triggers best-effort blob cleanup so no orphan record
//! remains either way.

use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use clipstream_core::models::{ProcessingStatus, VideoRecord, VideoUpdate, Visibility};
use clipstream_core::{AppError, CallerContext, VideoCatalog};
use clipstream_storage::{BlobKind, BlobStore};

use crate::error::storage_to_app;
use crate::services::tags::TagResolver;
use crate::utils::upload::{
    validate_metadata, validate_thumbnail_file, validate_video_file, UploadedFile, VideoForm,
};

pub struct IngestPipeline {
    catalog: Arc<dyn VideoCatalog>,
    blobs: Arc<dyn BlobStore>,
    tags: TagResolver,
    max_video_bytes: usize,
    max_thumbnail_bytes: usize,
}

impl IngestPipeline {
    pub fn new(
        catalog: Arc<dyn VideoCatalog>,
        blobs: Arc<dyn BlobStore>,
        tags: TagResolver,
        max_video_bytes: usize,
        max_thumbnail_bytes: usize,
    ) -> Self {
        IngestPipeline {
            catalog,
            blobs,
            tags,
            max_video_bytes,
            max_thumbnail_bytes,
        }
    }

    async fn cleanup_blob(&self, key: &str) {
        if let Err(e) = self.blobs.delete(key).await {
            tracing::warn!(key = key, error = %e, "Failed to clean up blob after aborted ingest");
        }
    }

    async fn store_blob(
        &self,
        kind: BlobKind,
        id: Uuid,
        file: &UploadedFile,
    ) -> Result<String, AppError> {
        let ext = file.extension_or(kind.default_ext());
        self.blobs
            .store(kind, id, &ext, file.data.clone())
            .await
            .map_err(storage_to_app)
    }

    /// Run the full ingest flow: validate, persist blobs, create the catalog
    /// record as `Uploading`, attach tags, flip to `Ready`.
    pub async fn upload(
        &self,
        caller: CallerContext,
        form: VideoForm,
    ) -> Result<(VideoRecord, Vec<String>), AppError> {
        if !caller.role.can_upload() {
            return Err(AppError::Forbidden(
                "Only creators and admins may upload videos".to_string(),
            ));
        }

        validate_metadata(&form)?;
        let title = form
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Title is required".to_string()))?
            .to_string();

        let video = form
            .video
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("Video file is required".to_string()))?;
        validate_video_file(video, self.max_video_bytes)?;
        if let Some(thumbnail) = form.thumbnail.as_ref() {
            validate_thumbnail_file(thumbnail, self.max_thumbnail_bytes)?;
        }

        let id = Uuid::new_v4();
        let video_byte_size = video.data.len() as i64;

        let video_key = self.store_blob(BlobKind::Video, id, video).await?;

        let mut thumbnail_key = None;
        let mut thumbnail_byte_size = None;
        let mut thumbnail_content_type = None;
        if let Some(thumbnail) = form.thumbnail.as_ref() {
            match self.store_blob(BlobKind::Thumbnail, id, thumbnail).await {
                Ok(key) => {
                    thumbnail_key = Some(key);
                    thumbnail_byte_size = Some(thumbnail.data.len() as i64);
                    thumbnail_content_type = thumbnail.content_type.clone();
                }
                Err(e) => {
                    self.cleanup_blob(&video_key).await;
                    return Err(e);
                }
            }
        }

        let now = Utc::now();
        let mut record = VideoRecord {
            id,
            owner_id: caller.caller_id,
            title,
            description: form.description.clone().filter(|d| !d.trim().is_empty()),
            video_key: video_key.clone(),
            thumbnail_key: thumbnail_key.clone(),
            video_byte_size,
            thumbnail_byte_size,
            thumbnail_content_type,
            duration_seconds: None,
            resolution: None,
            visibility: form.visibility.unwrap_or(Visibility::Public),
            processing_status: ProcessingStatus::Uploading,
            comments_enabled: form.comments_enabled.unwrap_or(true),
            views: 0,
            deleted: false,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.catalog.create(&record).await {
            self.cleanup_blob(&video_key).await;
            if let Some(key) = thumbnail_key.as_deref() {
                self.cleanup_blob(key).await;
            }
            return Err(e);
        }

        let tag_names = form.tags.clone().unwrap_or_default();
        if let Err(e) = self.tags.apply(id, &tag_names).await {
            self.mark_failed(&mut record).await;
            return Err(e);
        }

        record.processing_status = ProcessingStatus::Ready;
        if let Err(e) = self.catalog.save(&record).await {
            self.mark_failed(&mut record).await;
            return Err(e);
        }

        let tags = self.tags.names_for(id).await?;
        tracing::info!(
            video_id = %id,
            owner_id = %caller.caller_id,
            bytes = video_byte_size,
            "Video ingested"
        );

        Ok((record, tags))
    }

    /// Terminal state for an ingest that got a record written but could not
    /// complete. Best effort: the record is already invisible to streaming
    /// while non-Ready.
    async fn mark_failed(&self, record: &mut VideoRecord) {
        record.processing_status = ProcessingStatus::Failed;
        if let Err(e) = self.catalog.save(record).await {
            tracing::error!(video_id = %record.id, error = %e, "Failed to mark video as failed");
        }
    }

    /// Apply a metadata update. Owner or admin only; deleted records are not
    /// updatable. A supplied tag list replaces the association set wholesale;
    /// a replacement thumbnail re-points the record at a new blob (the old
    /// blob is left for a separate cleanup policy).
    pub async fn update(
        &self,
        id: Uuid,
        caller: CallerContext,
        update: VideoUpdate,
        thumbnail: Option<UploadedFile>,
    ) -> Result<(VideoRecord, Vec<String>), AppError> {
        let mut record = self
            .catalog
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if !caller.may_modify(record.owner_id) {
            return Err(AppError::Forbidden(
                "Only the owner or an admin may update this video".to_string(),
            ));
        }
        if record.deleted {
            return Err(AppError::InvalidInput(
                "Deleted videos cannot be updated".to_string(),
            ));
        }

        if let Some(title) = update.title {
            record.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            let trimmed = description.trim();
            record.description = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(visibility) = update.visibility {
            record.visibility = visibility;
        }
        if let Some(enabled) = update.comments_enabled {
            record.comments_enabled = enabled;
        }

        if let Some(thumbnail) = thumbnail.as_ref() {
            validate_thumbnail_file(thumbnail, self.max_thumbnail_bytes)?;
            let key = self.store_blob(BlobKind::Thumbnail, id, thumbnail).await?;
            record.thumbnail_key = Some(key);
            record.thumbnail_byte_size = Some(thumbnail.data.len() as i64);
            record.thumbnail_content_type = thumbnail.content_type.clone();
        }

        if let Some(tag_names) = update.tags.as_deref() {
            self.tags.apply(id, tag_names).await?;
        }

        record.updated_at = Utc::now();
        self.catalog.save(&record).await?;

        let tags = self.tags.names_for(id).await?;
        Ok((record, tags))
    }
}
