mod audit;
mod health;

pub use audit::{AuditRequestBody, AuditResponse, ErrorResponse, audit_handler, video_id_for};
pub use health::{HealthResponse, SERVICE_NAME, health_handler};
