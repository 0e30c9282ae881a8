pub mod ingest;
pub mod lifecycle;
pub mod streamer;
pub mod tags;
