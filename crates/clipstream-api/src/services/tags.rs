//! Tag resolution.
//!
//! Tag names are free text; the resolver normalizes them (trim, drop blanks,
//! case-insensitive dedup keeping the first spelling) before touching the
//! index, so "Rust" and "rust" in one request resolve to a single tag.

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use clipstream_core::models::Tag;
use clipstream_core::{AppError, TagIndex};

#[derive(Clone)]
pub struct TagResolver {
    index: Arc<dyn TagIndex>,
}

impl TagResolver {
    pub fn new(index: Arc<dyn TagIndex>) -> Self {
        TagResolver { index }
    }

    /// Trim, drop blanks, dedup case-insensitively (first spelling wins).
    pub fn normalize(names: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.to_lowercase()))
            .map(str::to_string)
            .collect()
    }

    /// Find-or-create every normalized name.
    pub async fn resolve(&self, names: &[String]) -> Result<Vec<Tag>, AppError> {
        let mut tags = Vec::new();
        for name in Self::normalize(names) {
            tags.push(self.index.find_or_create(&name).await?);
        }
        Ok(tags)
    }

    /// Resolve `names` and replace the video's association set wholesale.
    /// An empty (or all-blank) list clears the video's tags.
    pub async fn apply(&self, video_id: Uuid, names: &[String]) -> Result<(), AppError> {
        let tags = self.resolve(names).await?;
        let ids: Vec<Uuid> = tags.iter().map(|t| t.id).collect();
        self.index.replace_tags_for_video(video_id, &ids).await
    }

    /// Tag names currently associated with a video, alphabetical.
    pub async fn names_for(&self, video_id: Uuid) -> Result<Vec<String>, AppError> {
        self.index.tag_names_for_video(video_id).await
    }
}
