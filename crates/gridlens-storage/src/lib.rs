//! Gridlens storage library
//!
//! Object storage abstraction and implementations. The upload pipeline
//! talks to the `ObjectStorage` trait; backends exist for S3-compatible
//! stores and the local filesystem.
//!
//! # Key format
//!
//! Object keys are flat: `{record_id}{extension}` (e.g.
//! `550e8400-e29b-41d4-a716-446655440000.jpg`). Keys must not contain
//! `..` or a leading `/`.

pub mod factory;
pub mod local;
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use gridlens_core::StorageBackend;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
