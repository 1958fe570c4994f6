use async_trait::async_trait;

use crate::domain::{AuditState, StateUpdate};

/// One step of the audit graph.
///
/// A node reads the current state and returns the fields it wants to change.
/// Expected failures belong in the returned update (`errors`,
/// `final_status`); `Err` is reserved for conditions the node cannot express
/// as state and aborts the whole run.
#[async_trait]
pub trait PipelineNode: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, state: &AuditState) -> Result<StateUpdate, NodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("internal error: {0}")]
    Internal(String),
}
