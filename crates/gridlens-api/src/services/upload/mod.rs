//! Image upload pipeline
//!
//! One linear workflow per request:
//! extract → sanitize → EXIF → store → {record, notify} → sign.
//! The record write and queue notification are best-effort post-commit
//! hooks; everything else aborts the request on failure.

mod extract;
mod hooks;
mod service;
mod types;

pub use extract::extract_first_file;
pub use hooks::{post_commit, HookOutcome};
pub use service::{UploadPipeline, UploadPolicy};
pub use types::ExtractedFile;
