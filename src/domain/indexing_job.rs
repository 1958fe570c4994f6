use std::fmt;
use std::str::FromStr;

/// Identifier the external video-intelligence service assigns to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexingJobId(String);

impl IndexingJobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexingJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexingJobState {
    Uploaded,
    Queued,
    Processing,
    Processed,
    Failed,
    Quarantined,
    Unknown(String),
}

impl IndexingJobState {
    pub fn as_str(&self) -> &str {
        match self {
            IndexingJobState::Uploaded => "Uploaded",
            IndexingJobState::Queued => "Queued",
            IndexingJobState::Processing => "Processing",
            IndexingJobState::Processed => "Processed",
            IndexingJobState::Failed => "Failed",
            IndexingJobState::Quarantined => "Quarantined",
            IndexingJobState::Unknown(raw) => raw,
        }
    }

    /// No further transition happens from a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IndexingJobState::Processed | IndexingJobState::Failed | IndexingJobState::Quarantined
        )
    }
}

impl FromStr for IndexingJobState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Uploaded" => IndexingJobState::Uploaded,
            "Queued" => IndexingJobState::Queued,
            "Processing" => IndexingJobState::Processing,
            "Processed" => IndexingJobState::Processed,
            "Failed" => IndexingJobState::Failed,
            "Quarantined" => IndexingJobState::Quarantined,
            other => IndexingJobState::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for IndexingJobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
