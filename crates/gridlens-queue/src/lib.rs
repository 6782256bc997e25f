//! Gridlens queue library
//!
//! Enrichment-worker notification. The upload pipeline publishes
//! through the `EnrichmentQueue` trait; the SQS implementation sends
//! the correlation message the out-of-process workers consume.

pub mod sqs;

pub use sqs::{EnrichmentQueue, NotifyError, SqsQueue};
