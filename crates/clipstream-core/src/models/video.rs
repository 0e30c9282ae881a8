use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Unlisted => write!(f, "unlisted"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "unlisted" => Ok(Visibility::Unlisted),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

/// Lifecycle stage of a video's backing file, independent of its visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Uploading,
    Ready,
    Failed,
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Uploading => write!(f, "uploading"),
            ProcessingStatus::Ready => write!(f, "ready"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uploading" => Ok(ProcessingStatus::Uploading),
            "ready" => Ok(ProcessingStatus::Ready),
            "failed" => Ok(ProcessingStatus::Failed),
            other => Err(format!("unknown processing status: {}", other)),
        }
    }
}

/// A catalog record for one uploaded video. Blob references are opaque storage
/// keys resolvable by the blob store; the record exclusively owns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_key: String,
    pub thumbnail_key: Option<String>,
    pub video_byte_size: i64,
    pub thumbnail_byte_size: Option<i64>,
    pub thumbnail_content_type: Option<String>,
    pub duration_seconds: Option<i64>,
    pub resolution: Option<String>,
    pub visibility: Visibility,
    pub processing_status: ProcessingStatus,
    pub comments_enabled: bool,
    pub views: i64,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    /// True when the video may be served on the public stream path.
    pub fn is_streamable(&self) -> bool {
        !self.deleted && self.processing_status == ProcessingStatus::Ready
    }

    /// True when `caller_id` owns this record.
    pub fn is_owned_by(&self, caller_id: Uuid) -> bool {
        self.owner_id == caller_id
    }
}

/// Fields an update request may change. `None` means "leave unchanged";
/// a supplied tag list replaces the association set wholesale.
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub comments_enabled: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Zero-based page request with a clamped size.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn clamped(self) -> Self {
        PageRequest {
            page: self.page,
            size: self.size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        self.page as i64 * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

/// One page of catalog records plus the total match count.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<VideoRecord>,
    pub total_elements: u64,
    pub page: u32,
    pub size: u32,
}

impl Page {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size as u64) as u32
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub stream_url: String,
    pub thumbnail_url: Option<String>,
    pub owner_id: Uuid,
    pub views: i64,
    pub visibility: Visibility,
    pub processing_status: ProcessingStatus,
    pub comments_enabled: bool,
    pub video_byte_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Build the response DTO; stream and thumbnail URLs are derived from the
    /// public base URL rather than exposing storage keys.
    pub fn from_record(record: VideoRecord, tags: Vec<String>, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let thumbnail_url = record
            .thumbnail_key
            .as_ref()
            .map(|_| format!("{}/api/videos/{}/thumbnail", base, record.id));

        VideoResponse {
            stream_url: format!("{}/api/videos/{}/stream", base, record.id),
            thumbnail_url,
            id: record.id,
            title: record.title,
            description: record.description,
            owner_id: record.owner_id,
            views: record.views,
            visibility: record.visibility,
            processing_status: record.processing_status,
            comments_enabled: record.comments_enabled,
            video_byte_size: record.video_byte_size,
            duration_seconds: record.duration_seconds,
            resolution: record.resolution,
            tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoListResponse {
    pub items: Vec<VideoResponse>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}
