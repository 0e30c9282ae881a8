//! Durable blob placement and retrieval for raw video and thumbnail bytes.
//!
//! The `BlobStore` trait is the only surface the rest of clipstream sees;
//! `LocalBlobStore` is the filesystem backend. Keys are relative paths of the
//! form `videos/{id}_{millis}.{ext}` / `thumbnails/{id}_thumb_{millis}.{ext}`.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::BlobKind;
pub use local::LocalBlobStore;
pub use traits::{BlobStore, ByteStream, StorageError, StorageResult};
