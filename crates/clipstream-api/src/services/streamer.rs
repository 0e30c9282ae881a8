//! Range-based streaming.
//!
//! The streamer turns a video id plus an optional raw `Range` header into an
//! opened body stream and the numbers the handler needs for headers. Policy
//! (uniform 404 for deleted/non-ready, 416 semantics) lives here; the handler
//! only renders.

use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::range::RangeSpec;
use clipstream_core::{AppError, VideoCatalog};
use clipstream_storage::keys::key_extension;
use clipstream_storage::{BlobStore, ByteStream};

use crate::constants::DEFAULT_THUMBNAIL_CONTENT_TYPE;
use crate::error::storage_to_app;

/// Extension-based content-type lookup for video blobs; unknown extensions
/// fall back to `video/mp4`.
pub fn video_content_type(key: &str) -> &'static str {
    match key_extension(key).as_deref() {
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        _ => "video/mp4",
    }
}

/// What to serve: the whole blob (200) or one byte window of it (206).
pub enum StreamBody {
    Full {
        size: u64,
    },
    Partial {
        start: u64,
        end: u64,
        size: u64,
    },
}

pub struct VideoStream {
    pub content_type: &'static str,
    pub body: StreamBody,
    pub data: ByteStream,
}

pub struct ThumbnailStream {
    pub content_type: String,
    pub size: u64,
    pub data: ByteStream,
}

pub struct RangeStreamer {
    catalog: Arc<dyn VideoCatalog>,
    blobs: Arc<dyn BlobStore>,
}

impl RangeStreamer {
    pub fn new(catalog: Arc<dyn VideoCatalog>, blobs: Arc<dyn BlobStore>) -> Self {
        RangeStreamer { catalog, blobs }
    }

    /// Look up the record and require it to be streamable. Unknown, deleted,
    /// and non-ready videos are indistinguishable to the caller.
    async fn streamable(&self, id: Uuid) -> Result<clipstream_core::models::VideoRecord, AppError> {
        let record = self
            .catalog
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if !record.is_streamable() {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        Ok(record)
    }

    /// Size probe that treats a missing blob as a data-integrity problem:
    /// the record said the blob exists. Clients still just see 404.
    async fn blob_size(&self, id: Uuid, key: &str) -> Result<u64, AppError> {
        match self.blobs.size(key).await {
            Ok(size) => Ok(size),
            Err(clipstream_storage::StorageError::NotFound(_)) => {
                tracing::error!(
                    video_id = %id,
                    key = key,
                    "Catalog references a blob that is missing from storage"
                );
                Err(AppError::NotFound("Video not found".to_string()))
            }
            Err(e) => Err(storage_to_app(e)),
        }
    }

    /// Open a video for streaming. `range_header` is the raw `Range` value,
    /// if the request carried one.
    pub async fn open(
        &self,
        id: Uuid,
        range_header: Option<&str>,
    ) -> Result<VideoStream, AppError> {
        let record = self.streamable(id).await?;
        let size = self.blob_size(id, &record.video_key).await?;
        let content_type = video_content_type(&record.video_key);

        match range_header {
            None => {
                let data = self
                    .blobs
                    .open_stream(&record.video_key)
                    .await
                    .map_err(storage_to_app)?;
                Ok(VideoStream {
                    content_type,
                    body: StreamBody::Full { size },
                    data,
                })
            }
            Some(raw) => {
                let window = RangeSpec::parse(raw)?.resolve(size)?;
                let data = self
                    .blobs
                    .open_range(&record.video_key, window.start, window.end)
                    .await
                    .map_err(storage_to_app)?;
                tracing::debug!(
                    video_id = %id,
                    start = window.start,
                    end = window.end,
                    size = size,
                    "Serving byte range"
                );
                Ok(VideoStream {
                    content_type,
                    body: StreamBody::Partial {
                        start: window.start,
                        end: window.end,
                        size,
                    },
                    data,
                })
            }
        }
    }

    /// Open a video's thumbnail. Missing thumbnails and non-streamable videos
    /// are both plain 404s.
    pub async fn open_thumbnail(&self, id: Uuid) -> Result<ThumbnailStream, AppError> {
        let record = self.streamable(id).await?;
        let key = record
            .thumbnail_key
            .as_deref()
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

        let size = self.blob_size(id, key).await?;
        let data = self.blobs.open_stream(key).await.map_err(storage_to_app)?;

        Ok(ThumbnailStream {
            content_type: record
                .thumbnail_content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_THUMBNAIL_CONTENT_TYPE.to_string()),
            size,
            data,
        })
    }
}
