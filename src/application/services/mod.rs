mod audit_pipeline;
mod audit_prompt;
mod audit_stage;
mod indexing_stage;
mod pipeline_node;
mod verdict_parser;

pub use audit_pipeline::{AuditPipeline, PipelineError, PipelineStage};
pub use audit_prompt::{build_query, build_system_prompt, build_user_message};
pub use audit_stage::{AuditError, AuditStage, DEFAULT_TOP_K, NO_TRANSCRIPT_REPORT};
pub use indexing_stage::{
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, IndexingError, IndexingStage, PollPolicy,
};
pub use pipeline_node::{NodeError, PipelineNode};
pub use verdict_parser::{
    BodyOrigin, DEFAULT_FINAL_REPORT, JsonBody, Verdict, VerdictParseError, extract_json_body,
    parse_verdict,
};
