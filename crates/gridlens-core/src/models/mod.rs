pub mod image_record;
pub mod upload;

pub use image_record::ImageRecord;
pub use upload::{EnrichmentNotice, UploadedFileInfo};
