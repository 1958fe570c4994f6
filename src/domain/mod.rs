mod audit_request;
mod audit_state;
mod audit_status;
mod compliance_issue;
mod indexing_job;
mod video_index;
mod video_source;

pub use audit_request::AuditRequest;
pub use audit_state::{Append, AuditState, Reducer, Replace, Slot, StateUpdate};
pub use audit_status::AuditStatus;
pub use compliance_issue::{ComplianceIssue, Severity};
pub use indexing_job::{IndexingJobId, IndexingJobState};
pub use video_index::{
    DurationInsight, IndexedVideo, SummarizedInsights, TextSegment, VideoIndex, VideoInsightSet,
    VideoInsights, VideoMetadata,
};
pub use video_source::{Platform, UnsupportedSource, VideoSource};
