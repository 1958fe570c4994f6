use super::AuditState;

/// Caller-supplied input of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    pub video_url: String,
    pub video_id: String,
}

impl AuditRequest {
    pub fn new(video_url: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            video_id: video_id.into(),
        }
    }

    pub fn into_state(self) -> AuditState {
        AuditState::new(self.video_url, self.video_id)
    }
}
