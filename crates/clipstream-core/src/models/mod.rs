pub mod tag;
pub mod video;

pub use tag::Tag;
pub use video::{
    Page, PageRequest, ProcessingStatus, VideoListResponse, VideoRecord, VideoResponse,
    VideoUpdate, Visibility,
};
