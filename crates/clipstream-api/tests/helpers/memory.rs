//! In-memory catalog and tag index doubles for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use clipstream_core::models::{
    Page, PageRequest, ProcessingStatus, Tag, VideoRecord, Visibility,
};
use clipstream_core::{AppError, TagIndex, VideoCatalog};

fn page_of(mut items: Vec<VideoRecord>, page: PageRequest) -> Page {
    let page = page.clamped();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = items.len() as u64;
    let start = (page.offset() as usize).min(items.len());
    let end = (start + page.limit() as usize).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        total_elements: total,
        page: page.page,
        size: page.size,
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    records: Mutex<HashMap<Uuid, VideoRecord>>,
    fail_next_create: AtomicBool,
}

impl InMemoryCatalog {
    /// Make the next `create` call fail, for testing ingest cleanup.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn record(&self, id: Uuid) -> Option<VideoRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    /// Force a record's processing status, bypassing the ingest flow.
    pub fn set_status(&self, id: Uuid, status: ProcessingStatus) {
        if let Some(record) = self.records.lock().unwrap().get_mut(&id) {
            record.processing_status = status;
        }
    }
}

#[async_trait]
impl VideoCatalog for InMemoryCatalog {
    async fn create(&self, record: &VideoRecord) -> Result<(), AppError> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database("injected create failure".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(AppError::Database(format!("duplicate id {}", record.id)));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, record: &VideoRecord) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&record.id) {
            return Err(AppError::Database(format!("no record {}", record.id)));
        }
        let mut updated = record.clone();
        updated.updated_at = Utc::now();
        records.insert(record.id, updated);
        Ok(())
    }

    async fn find_public(&self, page: PageRequest) -> Result<Page, AppError> {
        let items = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| {
                r.visibility == Visibility::Public && !r.deleted && r.is_streamable()
            })
            .cloned()
            .collect();
        Ok(page_of(items, page))
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        include_hidden: bool,
        page: PageRequest,
    ) -> Result<Page, AppError> {
        let items = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id && !r.deleted)
            .filter(|r| {
                include_hidden || (r.visibility == Visibility::Public && r.is_streamable())
            })
            .cloned()
            .collect();
        Ok(page_of(items, page))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page, AppError> {
        let items = self.records.lock().unwrap().values().cloned().collect();
        Ok(page_of(items, page))
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.get_mut(&id).map(|record| {
            record.deleted = true;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn restore(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.get_mut(&id).map(|record| {
            record.deleted = false;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn hard_delete(&self, id: Uuid) -> Result<(), AppError> {
        self.records.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&id)
            .is_some_and(|r| !r.deleted))
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id && !r.deleted)
            .count() as u64)
    }
}

#[derive(Default)]
struct TagState {
    tags: HashMap<Uuid, Tag>,
    assoc: HashMap<Uuid, Vec<Uuid>>,
}

#[derive(Default)]
pub struct InMemoryTagIndex {
    inner: Mutex<TagState>,
}

impl InMemoryTagIndex {
    pub fn tag_count(&self) -> usize {
        self.inner.lock().unwrap().tags.len()
    }
}

#[async_trait]
impl TagIndex for InMemoryTagIndex {
    async fn find_or_create(&self, name: &str) -> Result<Tag, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(tag) = inner
            .tags
            .values()
            .find(|t| t.name.eq_ignore_ascii_case(name))
        {
            return Ok(tag.clone());
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        inner.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn replace_tags_for_video(
        &self,
        video_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let mut ids = tag_ids.to_vec();
        ids.dedup();
        self.inner.lock().unwrap().assoc.insert(video_id, ids);
        Ok(())
    }

    async fn tag_names_for_video(&self, video_id: Uuid) -> Result<Vec<String>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut names: Vec<String> = inner
            .assoc
            .get(&video_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.tags.get(id))
                    .map(|t| t.name.clone())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    async fn clear_tags_for_video(&self, video_id: Uuid) -> Result<(), AppError> {
        self.inner.lock().unwrap().assoc.remove(&video_id);
        Ok(())
    }
}
