use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use crate::domain::{AuditRequest, AuditState};

use super::{NodeError, PipelineNode};

/// Position of a run in the fixed `Start -> Indexer -> Auditor -> End` graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Start,
    IndexerComplete,
    AuditorComplete,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "START",
            PipelineStage::IndexerComplete => "INDEXER_COMPLETE",
            PipelineStage::AuditorComplete => "AUDITOR_COMPLETE",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequences the indexer and auditor over one state record per run.
///
/// The pipeline does no recovery of its own: nodes report expected failures
/// through the state, and a node returning `Err` ends the run with a
/// [`PipelineError`].
pub struct AuditPipeline {
    indexer: Arc<dyn PipelineNode>,
    auditor: Arc<dyn PipelineNode>,
}

impl AuditPipeline {
    pub fn new(indexer: Arc<dyn PipelineNode>, auditor: Arc<dyn PipelineNode>) -> Self {
        Self { indexer, auditor }
    }

    pub async fn run(&self, request: AuditRequest) -> Result<AuditState, PipelineError> {
        let span = tracing::info_span!("audit_pipeline", video_id = %request.video_id);

        async move {
            let mut state = request.into_state();
            let mut stage = PipelineStage::Start;

            let edges = [
                (&self.indexer, PipelineStage::IndexerComplete),
                (&self.auditor, PipelineStage::AuditorComplete),
            ];

            for (node, next) in edges {
                let update = node
                    .run(&state)
                    .await
                    .map_err(|source| PipelineError::Node {
                        node: node.name(),
                        stage,
                        source,
                    })?;
                state.apply(update);

                tracing::debug!(
                    from = %stage,
                    to = %next,
                    node = node.name(),
                    "Stage transition"
                );
                stage = next;
            }

            tracing::info!(
                final_status = state
                    .final_status
                    .get()
                    .map(|s| s.as_str())
                    .unwrap_or("UNSET"),
                issues = state.compliance_results.len(),
                errors = state.errors.len(),
                "Pipeline finished"
            );

            Ok(state)
        }
        .instrument(span)
        .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("node '{node}' failed after {stage}: {source}")]
    Node {
        node: &'static str,
        stage: PipelineStage,
        #[source]
        source: NodeError,
    },
}
