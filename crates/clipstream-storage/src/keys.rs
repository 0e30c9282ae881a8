//! Blob key derivation.

use uuid::Uuid;

/// What a blob holds; decides its directory, filename shape, and fallback
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Video,
    Thumbnail,
}

impl BlobKind {
    pub fn dir(&self) -> &'static str {
        match self {
            BlobKind::Video => "videos",
            BlobKind::Thumbnail => "thumbnails",
        }
    }

    /// Extension used when the original filename has none.
    pub fn default_ext(&self) -> &'static str {
        match self {
            BlobKind::Video => "mp4",
            BlobKind::Thumbnail => "jpg",
        }
    }
}

/// Derive the storage key for one upload attempt. The millisecond timestamp
/// makes concurrent or retried uploads of the same video id collision-free.
pub fn blob_key(kind: BlobKind, id: Uuid, timestamp_millis: u64, ext: &str) -> String {
    match kind {
        BlobKind::Video => format!("{}/{}_{}.{}", kind.dir(), id, timestamp_millis, ext),
        BlobKind::Thumbnail => {
            format!("{}/{}_thumb_{}.{}", kind.dir(), id, timestamp_millis, ext)
        }
    }
}

/// Lowercased extension of a key's filename, if any.
pub fn key_extension(key: &str) -> Option<String> {
    let filename = key.rsplit('/').next()?;
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}
