//! Shared limits and defaults.

/// Maximum accepted video upload size (500 MiB).
pub const MAX_VIDEO_BYTES: usize = 500 * 1024 * 1024;

/// Maximum accepted thumbnail upload size (10 MiB).
pub const MAX_THUMBNAIL_BYTES: usize = 10 * 1024 * 1024;

/// Maximum length of a video title.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum length of a video description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Maximum length of a single tag.
pub const MAX_TAG_LEN: usize = 50;

/// Default page size for listing queries.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard cap on page size for listing queries.
pub const MAX_PAGE_SIZE: u32 = 100;
