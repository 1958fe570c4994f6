//! State record threaded through one audit run.
//!
//! Every mutable field declares how updates merge into it: a [`Replace`]
//! field takes the latest value a node produced, an [`Append`] field only
//! ever grows. Nodes never touch the record directly; they return a
//! [`StateUpdate`] which [`AuditState::apply`] folds in.

use std::path::PathBuf;

use serde::Serialize;

use super::{AuditStatus, ComplianceIssue, VideoMetadata};

/// Merge rule of a single state field.
pub trait Reducer {
    type Update;

    fn merge(&mut self, update: Self::Update);
}

/// Value of a field no node has produced yet, kept distinct from an empty
/// value a node did produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Slot<T> {
    Pending,
    Ready(T),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Replace<T>(Slot<T>);

impl<T> Replace<T> {
    pub fn get(&self) -> Option<&T> {
        match &self.0 {
            Slot::Pending => None,
            Slot::Ready(value) => Some(value),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.0, Slot::Pending)
    }

    pub fn slot(&self) -> &Slot<T> {
        &self.0
    }

    pub fn into_inner(self) -> Option<T> {
        match self.0 {
            Slot::Pending => None,
            Slot::Ready(value) => Some(value),
        }
    }
}

impl<T> Default for Replace<T> {
    fn default() -> Self {
        Self(Slot::Pending)
    }
}

impl<T> Reducer for Replace<T> {
    type Update = T;

    fn merge(&mut self, update: T) {
        self.0 = Slot::Ready(update);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Append<T>(Vec<T>);

impl<T> Append<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for Append<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Reducer for Append<T> {
    type Update = Vec<T>;

    fn merge(&mut self, update: Vec<T>) {
        self.0.extend(update);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditState {
    pub video_url: String,
    pub video_id: String,
    pub local_file_path: Replace<PathBuf>,
    pub video_metadata: Replace<VideoMetadata>,
    pub transcript: Replace<String>,
    pub ocr_text: Replace<Vec<String>>,
    pub compliance_results: Append<ComplianceIssue>,
    pub final_status: Replace<AuditStatus>,
    pub final_report: Replace<String>,
    pub errors: Append<String>,
}

/// Partial update returned by a pipeline node. `None` and empty vectors
/// leave the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub local_file_path: Option<PathBuf>,
    pub video_metadata: Option<VideoMetadata>,
    pub transcript: Option<String>,
    pub ocr_text: Option<Vec<String>>,
    pub compliance_results: Vec<ComplianceIssue>,
    pub final_status: Option<AuditStatus>,
    pub final_report: Option<String>,
    pub errors: Vec<String>,
}

impl StateUpdate {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            final_status: Some(AuditStatus::Fail),
            ..Self::default()
        }
    }
}

impl AuditState {
    pub fn new(video_url: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            video_id: video_id.into(),
            local_file_path: Replace::default(),
            video_metadata: Replace::default(),
            transcript: Replace::default(),
            ocr_text: Replace::default(),
            compliance_results: Append::default(),
            final_status: Replace::default(),
            final_report: Replace::default(),
            errors: Append::default(),
        }
    }

    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            local_file_path,
            video_metadata,
            transcript,
            ocr_text,
            compliance_results,
            final_status,
            final_report,
            errors,
        } = update;

        if let Some(path) = local_file_path {
            self.local_file_path.merge(path);
        }
        if let Some(metadata) = video_metadata {
            self.video_metadata.merge(metadata);
        }
        if let Some(text) = transcript {
            self.transcript.merge(text);
        }
        if let Some(lines) = ocr_text {
            self.ocr_text.merge(lines);
        }
        self.compliance_results.merge(compliance_results);
        if let Some(status) = final_status {
            self.final_status.merge(status);
        }
        if let Some(report) = final_report {
            self.final_report.merge(report);
        }
        self.errors.merge(errors);
    }
}
