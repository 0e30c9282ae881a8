//! Shared application state.

use std::sync::Arc;

use clipstream_core::{Config, TagIndex, VideoCatalog};
use clipstream_storage::BlobStore;

use crate::services::ingest::IngestPipeline;
use crate::services::lifecycle::VideoLifecycle;
use crate::services::streamer::RangeStreamer;
use crate::services::tags::TagResolver;

/// Everything a handler needs, behind one `Arc`. Backends are trait objects
/// so tests can substitute in-memory doubles for Postgres and local disk.
pub struct AppState {
    pub catalog: Arc<dyn VideoCatalog>,
    pub tags: Arc<dyn TagIndex>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn VideoCatalog>,
        tags: Arc<dyn TagIndex>,
        blobs: Arc<dyn BlobStore>,
        config: Config,
    ) -> Self {
        AppState {
            catalog,
            tags,
            blobs,
            config,
        }
    }

    // Services are cheap bundles of Arc clones, assembled per request.

    pub fn ingest(&self) -> IngestPipeline {
        IngestPipeline::new(
            self.catalog.clone(),
            self.blobs.clone(),
            self.tag_resolver(),
            self.config.max_video_size_bytes,
            self.config.max_thumbnail_size_bytes,
        )
    }

    pub fn streamer(&self) -> RangeStreamer {
        RangeStreamer::new(self.catalog.clone(), self.blobs.clone())
    }

    pub fn lifecycle(&self) -> VideoLifecycle {
        VideoLifecycle::new(self.catalog.clone(), self.tags.clone(), self.blobs.clone())
    }

    pub fn tag_resolver(&self) -> TagResolver {
        TagResolver::new(self.tags.clone())
    }
}
