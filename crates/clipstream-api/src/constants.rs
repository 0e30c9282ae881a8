//! API-level constants.

/// Prefix shared by every route.
pub const API_PREFIX: &str = "/api";

/// Cache policy for served thumbnails (30 days).
pub const THUMBNAIL_CACHE_CONTROL: &str = "public, max-age=2592000";

/// Content type served when a thumbnail record predates content-type capture.
pub const DEFAULT_THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Slack added on top of the configured upload limits when sizing the request
/// body cap, to cover multipart framing overhead.
pub const BODY_LIMIT_SLACK_BYTES: usize = 1024 * 1024;
