use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use clipstream_core::models::{Page, PageRequest, ProcessingStatus, VideoRecord, Visibility};
use clipstream_core::{AppError, VideoCatalog};

use super::db_err;

const SELECT_COLUMNS: &str = "id, owner_id, title, description, video_key, thumbnail_key, \
     video_byte_size, thumbnail_byte_size, thumbnail_content_type, duration_seconds, resolution, \
     visibility, processing_status, comments_enabled, views, deleted, created_at, updated_at";

/// Raw row shape; enums live as TEXT columns and are parsed at the boundary.
#[derive(Debug, FromRow)]
struct VideoRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    video_key: String,
    thumbnail_key: Option<String>,
    video_byte_size: i64,
    thumbnail_byte_size: Option<i64>,
    thumbnail_content_type: Option<String>,
    duration_seconds: Option<i64>,
    resolution: Option<String>,
    visibility: String,
    processing_status: String,
    comments_enabled: bool,
    views: i64,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_record(self) -> Result<VideoRecord, AppError> {
        let visibility = Visibility::from_str(&self.visibility)
            .map_err(|e| AppError::Internal(format!("Corrupt visibility column: {}", e)))?;
        let processing_status = ProcessingStatus::from_str(&self.processing_status)
            .map_err(|e| AppError::Internal(format!("Corrupt processing_status column: {}", e)))?;

        Ok(VideoRecord {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            video_key: self.video_key,
            thumbnail_key: self.thumbnail_key,
            video_byte_size: self.video_byte_size,
            thumbnail_byte_size: self.thumbnail_byte_size,
            thumbnail_content_type: self.thumbnail_content_type,
            duration_seconds: self.duration_seconds,
            resolution: self.resolution,
            visibility,
            processing_status,
            comments_enabled: self.comments_enabled,
            views: self.views,
            deleted: self.deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn rows_to_records(rows: Vec<VideoRow>) -> Result<Vec<VideoRecord>, AppError> {
    rows.into_iter().map(VideoRow::into_record).collect()
}

/// Postgres-backed video catalog.
#[derive(Clone)]
pub struct PgVideoCatalog {
    pool: PgPool,
}

impl PgVideoCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        where_clause: &str,
        owner: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page, AppError> {
        let page = page.clamped();

        let count_sql = format!("SELECT COUNT(*) FROM videos WHERE {}", where_clause);
        let list_sql = format!(
            "SELECT {} FROM videos WHERE {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            SELECT_COLUMNS,
            where_clause,
            page.limit(),
            page.offset()
        );

        let (total, rows) = match owner {
            Some(owner_id) => {
                let total: i64 = sqlx::query_scalar(&count_sql)
                    .bind(owner_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(db_err)?;
                let rows = sqlx::query_as::<_, VideoRow>(&list_sql)
                    .bind(owner_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(db_err)?;
                (total, rows)
            }
            None => {
                let total: i64 = sqlx::query_scalar(&count_sql)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(db_err)?;
                let rows = sqlx::query_as::<_, VideoRow>(&list_sql)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(db_err)?;
                (total, rows)
            }
        };

        Ok(Page {
            items: rows_to_records(rows)?,
            total_elements: total.max(0) as u64,
            page: page.page,
            size: page.size,
        })
    }
}

#[async_trait]
impl VideoCatalog for PgVideoCatalog {
    async fn create(&self, record: &VideoRecord) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO videos (id, owner_id, title, description, video_key, thumbnail_key, \
             video_byte_size, thumbnail_byte_size, thumbnail_content_type, duration_seconds, \
             resolution, visibility, processing_status, comments_enabled, views, deleted, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(record.id)
        .bind(record.owner_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.video_key)
        .bind(&record.thumbnail_key)
        .bind(record.video_byte_size)
        .bind(record.thumbnail_byte_size)
        .bind(&record.thumbnail_content_type)
        .bind(record.duration_seconds)
        .bind(&record.resolution)
        .bind(record.visibility.to_string())
        .bind(record.processing_status.to_string())
        .bind(record.comments_enabled)
        .bind(record.views)
        .bind(record.deleted)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let sql = format!("SELECT {} FROM videos WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(VideoRow::into_record).transpose()
    }

    async fn save(&self, record: &VideoRecord) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE videos SET title = $2, description = $3, video_key = $4, thumbnail_key = $5, \
             video_byte_size = $6, thumbnail_byte_size = $7, thumbnail_content_type = $8, \
             duration_seconds = $9, resolution = $10, visibility = $11, processing_status = $12, \
             comments_enabled = $13, views = $14, deleted = $15, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.video_key)
        .bind(&record.thumbnail_key)
        .bind(record.video_byte_size)
        .bind(record.thumbnail_byte_size)
        .bind(&record.thumbnail_content_type)
        .bind(record.duration_seconds)
        .bind(&record.resolution)
        .bind(record.visibility.to_string())
        .bind(record.processing_status.to_string())
        .bind(record.comments_enabled)
        .bind(record.views)
        .bind(record.deleted)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn find_public(&self, page: PageRequest) -> Result<Page, AppError> {
        self.fetch_page(
            "visibility = 'public' AND deleted = FALSE AND processing_status = 'ready'",
            None,
            page,
        )
        .await
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        include_hidden: bool,
        page: PageRequest,
    ) -> Result<Page, AppError> {
        let where_clause = if include_hidden {
            "owner_id = $1 AND deleted = FALSE"
        } else {
            "owner_id = $1 AND deleted = FALSE AND visibility = 'public' \
             AND processing_status = 'ready'"
        };
        self.fetch_page(where_clause, Some(owner_id), page).await
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page, AppError> {
        self.fetch_page("TRUE", None, page).await
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let sql = format!(
            "UPDATE videos SET deleted = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(VideoRow::into_record).transpose()
    }

    async fn restore(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let sql = format!(
            "UPDATE videos SET deleted = FALSE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(VideoRow::into_record).transpose()
    }

    async fn hard_delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE id = $1 AND deleted = FALSE")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(found > 0)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM videos WHERE owner_id = $1 AND deleted = FALSE",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(count.max(0) as u64)
    }
}
