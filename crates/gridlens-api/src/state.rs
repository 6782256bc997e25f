//! Application state shared across handlers.

use gridlens_core::Config;

use crate::services::upload::UploadPipeline;

pub struct AppState {
    pub config: Config,
    pub pipeline: UploadPipeline,
}
