//! Gridlens database library
//!
//! Metadata-record persistence. The upload pipeline writes through the
//! `RecordStore` trait; the Postgres implementation keeps one row per
//! uploaded image, with every enrichment column nullable so downstream
//! workers can fill them in later.

pub mod records;

pub use records::{PgRecordStore, RecordStore, RecordStoreError};
