use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use brand_guardian::application::ports::{
    DownloadError, JobStatusReport, LlmClient, LlmClientError, RetrievalError, RuleRetriever,
    VideoDownloader, VideoIndexer, VideoIndexerError,
};
use brand_guardian::application::services::{
    AuditPipeline, AuditStage, DEFAULT_TOP_K, IndexingStage, NO_TRANSCRIPT_REPORT, NodeError,
    PipelineError, PipelineNode, PipelineStage, PollPolicy,
};
use brand_guardian::domain::{
    AuditRequest, AuditState, AuditStatus, IndexingJobId, IndexingJobState, Severity,
    StateUpdate, VideoIndex, VideoSource,
};

struct FileWritingDownloader;

#[async_trait]
impl VideoDownloader for FileWritingDownloader {
    async fn download(
        &self,
        _source: &VideoSource,
        destination: &Path,
    ) -> Result<PathBuf, DownloadError> {
        tokio::fs::write(destination, b"mp4").await?;
        Ok(destination.to_path_buf())
    }
}

/// Echoes the upload name back as transcript so runs can be told apart.
struct EchoIndexer {
    final_state: IndexingJobState,
}

#[async_trait]
impl VideoIndexer for EchoIndexer {
    async fn submit(
        &self,
        _video_path: &Path,
        name: &str,
    ) -> Result<IndexingJobId, VideoIndexerError> {
        Ok(IndexingJobId::new(name))
    }

    async fn poll(&self, job_id: &IndexingJobId) -> Result<JobStatusReport, VideoIndexerError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let payload = serde_json::from_value::<VideoIndex>(serde_json::json!({
            "videos": [{"insights": {
                "transcript": [{"text": "guaranteed"}, {"text": job_id.as_str()}],
                "ocr": [{"text": "SALE"}]
            }}]
        }))
        .ok();
        Ok(JobStatusReport {
            state: self.final_state.clone(),
            payload,
        })
    }
}

/// Reports `Processed` on the first poll with a single transcript segment.
struct ImmediateIndexer {
    transcript: &'static str,
}

#[async_trait]
impl VideoIndexer for ImmediateIndexer {
    async fn submit(
        &self,
        _video_path: &Path,
        _name: &str,
    ) -> Result<IndexingJobId, VideoIndexerError> {
        Ok(IndexingJobId::new("job-demo"))
    }

    async fn poll(&self, _job_id: &IndexingJobId) -> Result<JobStatusReport, VideoIndexerError> {
        let payload = serde_json::from_value::<VideoIndex>(serde_json::json!({
            "videos": [{"insights": {"transcript": [{"text": self.transcript}]}}]
        }))
        .ok();
        Ok(JobStatusReport {
            state: IndexingJobState::Processed,
            payload,
        })
    }
}

struct StaticRetriever;

#[async_trait]
impl RuleRetriever for StaticRetriever {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<String>, RetrievalError> {
        Ok(vec!["Claims must be substantiated.".to_string()])
    }
}

/// Flags a critical issue naming whatever transcript it was shown.
struct TranscriptEchoLlm;

#[async_trait]
impl LlmClient for TranscriptEchoLlm {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmClientError> {
        let transcript = user_message
            .lines()
            .find_map(|l| l.strip_prefix("TRANSCRIPT: "))
            .unwrap_or_default();
        Ok(serde_json::json!({
            "compliance_results": [{
                "category": "Claim Validation",
                "severity": "CRITICAL",
                "description": transcript
            }],
            "status": "FAIL",
            "final_report": format!("Reviewed: {transcript}")
        })
        .to_string())
    }
}

fn pipeline(final_state: IndexingJobState) -> AuditPipeline {
    let indexer = IndexingStage::new(
        Arc::new(FileWritingDownloader),
        Arc::new(EchoIndexer { final_state }),
        PollPolicy {
            interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        },
    );
    let auditor = AuditStage::new(
        Arc::new(StaticRetriever),
        Arc::new(TranscriptEchoLlm),
        DEFAULT_TOP_K,
    );
    AuditPipeline::new(Arc::new(indexer), Arc::new(auditor))
}

struct BrokenNode;

#[async_trait]
impl PipelineNode for BrokenNode {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn run(&self, _state: &AuditState) -> Result<StateUpdate, NodeError> {
        Err(NodeError::Internal("state store unavailable".to_string()))
    }
}

struct NoopNode;

#[async_trait]
impl PipelineNode for NoopNode {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn run(&self, _state: &AuditState) -> Result<StateUpdate, NodeError> {
        Ok(StateUpdate::default())
    }
}

#[tokio::test]
async fn given_guarantee_claim_in_transcript_when_run_then_fail_with_one_critical_issue() {
    let indexer = IndexingStage::new(
        Arc::new(FileWritingDownloader),
        Arc::new(ImmediateIndexer {
            transcript: "This product guarantees results",
        }),
        PollPolicy::default(),
    );
    let auditor = AuditStage::new(
        Arc::new(StaticRetriever),
        Arc::new(TranscriptEchoLlm),
        DEFAULT_TOP_K,
    );
    let pipeline = AuditPipeline::new(Arc::new(indexer), Arc::new(auditor));

    let final_state = pipeline
        .run(AuditRequest::new("https://youtu.be/abc123", "vid_demo"))
        .await
        .unwrap();

    assert_eq!(final_state.final_status.get(), Some(&AuditStatus::Fail));
    assert_eq!(final_state.compliance_results.len(), 1);
    let issue = &final_state.compliance_results.as_slice()[0];
    assert_eq!(issue.severity, Severity::Critical);
    assert_eq!(issue.description, "This product guarantees results");
}

#[tokio::test]
async fn given_youtube_video_with_critical_claim_when_run_then_fail_with_one_issue() {
    let final_state = pipeline(IndexingJobState::Processed)
        .run(AuditRequest::new("https://youtu.be/abc123", "vid_demo"))
        .await
        .unwrap();

    assert_eq!(final_state.video_id, "vid_demo");
    assert_eq!(final_state.final_status.get(), Some(&AuditStatus::Fail));
    assert_eq!(final_state.compliance_results.len(), 1);
    assert_eq!(
        final_state.compliance_results.as_slice()[0].severity,
        Severity::Critical
    );
    assert_eq!(
        final_state.transcript.get().map(String::as_str),
        Some("guaranteed vid_demo")
    );
    assert!(final_state.errors.is_empty());
    assert!(!final_state.local_file_path.get().unwrap().exists());
}

#[tokio::test]
async fn given_failed_indexing_when_run_then_auditor_reports_missing_transcript() {
    let final_state = pipeline(IndexingJobState::Failed)
        .run(AuditRequest::new("https://youtu.be/abc123", "vid_demo"))
        .await
        .unwrap();

    assert_eq!(final_state.final_status.get(), Some(&AuditStatus::Fail));
    assert_eq!(
        final_state.final_report.get().map(String::as_str),
        Some(NO_TRANSCRIPT_REPORT)
    );
    assert_eq!(final_state.errors.len(), 1);
    assert!(final_state.compliance_results.is_empty());
}

#[tokio::test]
async fn given_two_concurrent_runs_when_executed_then_states_do_not_mix() {
    let pipeline = Arc::new(pipeline(IndexingJobState::Processed));

    let first = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            pipeline
                .run(AuditRequest::new("https://youtu.be/one", "vid_one"))
                .await
        })
    };
    let second = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            pipeline
                .run(AuditRequest::new("https://www.youtube.com/watch?v=two", "vid_two"))
                .await
        })
    };

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(first.compliance_results.len(), 1);
    assert_eq!(second.compliance_results.len(), 1);
    assert_eq!(
        first.final_report.get().map(String::as_str),
        Some("Reviewed: guaranteed vid_one")
    );
    assert_eq!(
        second.final_report.get().map(String::as_str),
        Some("Reviewed: guaranteed vid_two")
    );
    assert_ne!(first.local_file_path.get(), second.local_file_path.get());
}

#[tokio::test]
async fn given_indexer_node_error_when_run_then_pipeline_error_names_node_and_stage() {
    let pipeline = AuditPipeline::new(Arc::new(BrokenNode), Arc::new(NoopNode));

    let err = pipeline
        .run(AuditRequest::new("https://youtu.be/abc123", "vid_demo"))
        .await
        .unwrap_err();

    let PipelineError::Node { node, stage, .. } = &err;
    assert_eq!(*node, "broken");
    assert_eq!(*stage, PipelineStage::Start);
    assert!(err.to_string().contains("state store unavailable"));
}

#[tokio::test]
async fn given_auditor_node_error_when_run_then_failure_reported_after_indexer() {
    let pipeline = AuditPipeline::new(Arc::new(NoopNode), Arc::new(BrokenNode));

    let err = pipeline
        .run(AuditRequest::new("https://youtu.be/abc123", "vid_demo"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Node {
            stage: PipelineStage::IndexerComplete,
            ..
        }
    ));
}
