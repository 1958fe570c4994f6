use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::DEFAULT_FINAL_REPORT;
use crate::domain::{AuditRequest, AuditState, AuditStatus, ComplianceIssue};
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditRequestBody {
    pub video_url: String,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub session_id: String,
    pub video_id: String,
    pub status: AuditStatus,
    pub final_report: String,
    pub compliance_results: Vec<ComplianceIssue>,
    pub errors: Vec<String>,
}

impl AuditResponse {
    fn from_state(session_id: String, state: AuditState) -> Self {
        let status = state.final_status.get().copied().unwrap_or(AuditStatus::Unknown);
        Self {
            session_id,
            video_id: state.video_id,
            status,
            final_report: state
                .final_report
                .into_inner()
                .unwrap_or_else(|| DEFAULT_FINAL_REPORT.to_string()),
            compliance_results: state.compliance_results.into_vec(),
            errors: state.errors.into_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Derives the short run id the indexer uses for naming its upload.
pub fn video_id_for(session_id: &Uuid) -> String {
    let simple = session_id.simple().to_string();
    format!("vid_{}", &simple[..8])
}

pub async fn audit_handler(
    State(state): State<AppState>,
    Json(body): Json<AuditRequestBody>,
) -> Response {
    let session = Uuid::new_v4();
    let session_id = session.to_string();
    let video_id = video_id_for(&session);

    tracing::info!(
        session_id = %session_id,
        video_id = %video_id,
        video_url = %body.video_url,
        "Received audit request"
    );

    match state
        .pipeline
        .run(AuditRequest::new(body.video_url, video_id))
        .await
    {
        Ok(final_state) => {
            (StatusCode::OK, Json(AuditResponse::from_state(session_id, final_state)))
                .into_response()
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Audit workflow failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: format!("Workflow Execution Failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
