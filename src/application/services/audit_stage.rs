use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError, RetrievalError, RuleRetriever};
use crate::domain::{AuditState, AuditStatus, StateUpdate, VideoMetadata};
use crate::infrastructure::observability::sanitize_prompt;

use super::audit_prompt::{build_query, build_system_prompt, build_user_message};
use super::verdict_parser::{Verdict, VerdictParseError, parse_verdict};
use super::{NodeError, PipelineNode};

pub const DEFAULT_TOP_K: usize = 3;
pub const NO_TRANSCRIPT_REPORT: &str =
    "Audit skipped because video processing failed (No Transcript).";

/// Retrieval-augmented compliance check of the extracted video text.
pub struct AuditStage {
    retriever: Arc<dyn RuleRetriever>,
    llm_client: Arc<dyn LlmClient>,
    top_k: usize,
}

impl AuditStage {
    pub fn new(
        retriever: Arc<dyn RuleRetriever>,
        llm_client: Arc<dyn LlmClient>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            llm_client,
            top_k,
        }
    }

    async fn audit(
        &self,
        transcript: &str,
        ocr_text: &[String],
        metadata: Option<&VideoMetadata>,
    ) -> Result<Verdict, AuditError> {
        let query = build_query(transcript, ocr_text);
        tracing::debug!(query = %sanitize_prompt(&query), top_k = self.top_k, "Retrieving rules");

        let rule_passages = self.retriever.search(&query, self.top_k).await?;
        tracing::info!(passages = rule_passages.len(), "Rules retrieved");

        let system_prompt = build_system_prompt(&rule_passages);
        let user_message = build_user_message(metadata, transcript, ocr_text);

        let raw_response = self
            .llm_client
            .complete(&system_prompt, &user_message)
            .await?;

        parse_verdict(&raw_response).map_err(|source| AuditError::Verdict {
            source,
            raw_response,
        })
    }
}

#[async_trait]
impl PipelineNode for AuditStage {
    fn name(&self) -> &'static str {
        "auditor"
    }

    #[tracing::instrument(skip(self, state), fields(video_id = %state.video_id))]
    async fn run(&self, state: &AuditState) -> Result<StateUpdate, NodeError> {
        let transcript = state.transcript.get().map(String::as_str).unwrap_or_default();
        if transcript.is_empty() {
            tracing::warn!("No transcript available, skipping audit");
            return Ok(StateUpdate {
                final_status: Some(AuditStatus::Fail),
                final_report: Some(NO_TRANSCRIPT_REPORT.to_string()),
                ..StateUpdate::default()
            });
        }

        let ocr_text = state.ocr_text.get().map(Vec::as_slice).unwrap_or_default();

        match self
            .audit(transcript, ocr_text, state.video_metadata.get())
            .await
        {
            Ok(verdict) => {
                tracing::info!(
                    status = %verdict.status,
                    issues = verdict.compliance_results.len(),
                    "Audit complete"
                );
                Ok(StateUpdate {
                    compliance_results: verdict.compliance_results,
                    final_status: Some(verdict.status),
                    final_report: Some(verdict.final_report),
                    ..StateUpdate::default()
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Audit failed");
                if let AuditError::Verdict { raw_response, .. } = &e {
                    tracing::error!(
                        raw_response = %sanitize_prompt(raw_response),
                        "Unparseable model response"
                    );
                    tracing::debug!(raw_response = %raw_response, "Full model response");
                }
                Ok(StateUpdate::failure(e.to_string()))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("rule retrieval: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("model completion: {0}")]
    Completion(#[from] LlmClientError),
    #[error("verdict: {source}")]
    Verdict {
        #[source]
        source: VerdictParseError,
        raw_response: String,
    },
}
