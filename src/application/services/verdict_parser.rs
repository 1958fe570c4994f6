//! Decoding of the model's compliance verdict.
//!
//! Models often wrap the requested JSON in a markdown fence. Parsing is two
//! steps: [`extract_json_body`] locates the JSON text and records where it
//! came from, then [`parse_verdict`] decodes it. A decode failure names the
//! origin so logs tell "no fence" apart from "fence found, bad JSON".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AuditStatus, ComplianceIssue, Severity};

pub const DEFAULT_FINAL_REPORT: &str = "No report generated.";

const FENCE: &str = "```";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)```(?:json)?(.*?)```").expect("Failed to compile fenced block pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOrigin {
    /// Content of the first fenced block.
    Fenced,
    /// No fence marker anywhere; the whole response.
    Unfenced,
    /// A fence marker was present but never closed; the whole response.
    UnterminatedFence,
}

impl BodyOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyOrigin::Fenced => "fenced",
            BodyOrigin::Unfenced => "unfenced",
            BodyOrigin::UnterminatedFence => "unterminated-fence",
        }
    }
}

impl fmt::Display for BodyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonBody<'a> {
    pub text: &'a str,
    pub origin: BodyOrigin,
}

pub fn extract_json_body(raw: &str) -> JsonBody<'_> {
    if !raw.contains(FENCE) {
        return JsonBody {
            text: raw.trim(),
            origin: BodyOrigin::Unfenced,
        };
    }

    match FENCED_BLOCK.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => JsonBody {
            text: inner.as_str().trim(),
            origin: BodyOrigin::Fenced,
        },
        None => JsonBody {
            text: raw.trim(),
            origin: BodyOrigin::UnterminatedFence,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub compliance_results: Vec<ComplianceIssue>,
    pub status: AuditStatus,
    pub final_report: String,
}

#[derive(Deserialize)]
struct RawVerdict {
    #[serde(default)]
    compliance_results: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    final_report: Option<Value>,
}

pub fn parse_verdict(raw: &str) -> Result<Verdict, VerdictParseError> {
    let body = extract_json_body(raw);

    if body.text.is_empty() {
        return Err(VerdictParseError::EmptyBody {
            origin: body.origin,
        });
    }

    let decoded: RawVerdict =
        serde_json::from_str(body.text).map_err(|source| VerdictParseError::InvalidJson {
            origin: body.origin,
            source,
        })?;

    let compliance_results = match decoded.compliance_results {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().filter_map(into_issue).collect(),
        Some(other) => {
            tracing::warn!(value = %other, "compliance_results is not an array, ignoring");
            Vec::new()
        }
    };

    let status = match optional_text(decoded.status) {
        None => AuditStatus::Fail,
        Some(raw_status) => raw_status.parse().unwrap_or_else(|_| {
            tracing::warn!(status = %raw_status, "Unrecognized verdict status");
            AuditStatus::Unknown
        }),
    };

    Ok(Verdict {
        compliance_results,
        status,
        final_report: optional_text(decoded.final_report)
            .unwrap_or_else(|| DEFAULT_FINAL_REPORT.to_string()),
    })
}

/// Reads one reported issue field by field so a mistyped member costs only
/// that member, not the verdict.
fn into_issue(item: Value) -> Option<ComplianceIssue> {
    let mut fields = match item {
        Value::Object(fields) => fields,
        other => {
            tracing::warn!(item = %other, "Skipping compliance issue that is not an object");
            return None;
        }
    };

    let raw_severity = text_field(fields.remove("severity"));
    let severity = raw_severity.parse().unwrap_or_else(|_| {
        tracing::warn!(severity = %raw_severity, "Unrecognized severity, recording as warning");
        Severity::Warning
    });

    let mut issue = ComplianceIssue::new(
        text_field(fields.remove("category")),
        severity,
        text_field(fields.remove("description")),
    );
    issue.timestamp = optional_text(fields.remove("timestamp"));
    Some(issue)
}

fn text_field(value: Option<Value>) -> String {
    optional_text(value).unwrap_or_default()
}

fn optional_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerdictParseError {
    #[error("model output contained no JSON ({origin} body was empty)")]
    EmptyBody { origin: BodyOrigin },
    #[error("no valid JSON found in {origin} model output: {source}")]
    InvalidJson {
        origin: BodyOrigin,
        #[source]
        source: serde_json::Error,
    },
}

impl VerdictParseError {
    pub fn origin(&self) -> BodyOrigin {
        match self {
            VerdictParseError::EmptyBody { origin } => *origin,
            VerdictParseError::InvalidJson { origin, .. } => *origin,
        }
    }
}
