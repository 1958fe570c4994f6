use std::sync::Arc;

use crate::application::services::AuditPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AuditPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<AuditPipeline>) -> Self {
        Self { pipeline }
    }
}
