use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use clipstream_core::models::Tag;
use clipstream_core::{AppError, TagIndex};

use super::db_err;

#[derive(Debug, FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
        }
    }
}

/// Postgres-backed tag index.
///
/// Association replacement runs inside a transaction, which provides the
/// serialization the delete-all-then-reinsert step requires.
#[derive(Clone)]
pub struct PgTagIndex {
    pool: PgPool,
}

impl PgTagIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagIndex for PgTagIndex {
    async fn find_or_create(&self, name: &str) -> Result<Tag, AppError> {
        // Upsert against the case-insensitive unique index; the no-op update
        // makes RETURNING yield the existing row (first-created casing wins).
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags (id, name) VALUES ($1, $2) \
             ON CONFLICT ((LOWER(name))) DO UPDATE SET name = tags.name \
             RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn replace_tags_for_video(
        &self,
        video_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM video_tags WHERE video_id = $1")
            .bind(video_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for tag_id in tag_ids {
            sqlx::query(
                "INSERT INTO video_tags (video_id, tag_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(video_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn tag_names_for_video(&self, video_id: Uuid) -> Result<Vec<String>, AppError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT t.name FROM tags t \
             JOIN video_tags vt ON vt.tag_id = t.id \
             WHERE vt.video_id = $1 ORDER BY t.name",
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(names)
    }

    async fn clear_tags_for_video(&self, video_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM video_tags WHERE video_id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}
