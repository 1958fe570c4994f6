use brand_guardian::application::services::{
    BodyOrigin, DEFAULT_FINAL_REPORT, VerdictParseError, extract_json_body, parse_verdict,
};
use brand_guardian::domain::{AuditStatus, Severity};

#[test]
fn given_json_fenced_response_when_parsed_then_pass_with_no_issues() {
    let raw = "Here you go:\n```json\n{\"compliance_results\": [], \"status\": \"PASS\", \"final_report\": \"ok\"}\n```\nThanks";

    let verdict = parse_verdict(raw).unwrap();

    assert_eq!(verdict.status, AuditStatus::Pass);
    assert!(verdict.compliance_results.is_empty());
    assert_eq!(verdict.final_report, "ok");
}

#[test]
fn given_bare_fence_without_language_tag_when_extracted_then_inner_text_is_used() {
    let body = extract_json_body("```\n{\"status\": \"PASS\"}\n```");

    assert_eq!(body.origin, BodyOrigin::Fenced);
    assert_eq!(body.text, "{\"status\": \"PASS\"}");
}

#[test]
fn given_unfenced_json_when_extracted_then_whole_trimmed_text_is_used() {
    let body = extract_json_body("  {\"status\": \"FAIL\"}  \n");

    assert_eq!(body.origin, BodyOrigin::Unfenced);
    assert_eq!(body.text, "{\"status\": \"FAIL\"}");
}

#[test]
fn given_unterminated_fence_when_parsed_then_error_names_origin() {
    let err = parse_verdict("```json\n{\"status\": \"PASS\"}").unwrap_err();

    assert_eq!(err.origin(), BodyOrigin::UnterminatedFence);
    assert!(matches!(err, VerdictParseError::InvalidJson { .. }));
}

#[test]
fn given_missing_final_report_when_parsed_then_default_report_is_used() {
    let verdict = parse_verdict(r#"{"compliance_results": [], "status": "PASS"}"#).unwrap();

    assert_eq!(verdict.final_report, DEFAULT_FINAL_REPORT);
    assert_eq!(verdict.final_report, "No report generated.");
}

#[test]
fn given_missing_status_when_parsed_then_status_defaults_to_fail() {
    let verdict = parse_verdict(r#"{"final_report": "partial"}"#).unwrap();

    assert_eq!(verdict.status, AuditStatus::Fail);
    assert!(verdict.compliance_results.is_empty());
}

#[test]
fn given_lowercase_values_when_parsed_then_matched_case_insensitively() {
    let raw = r#"{"compliance_results": [{"category": "Claims", "severity": "critical", "description": "Guaranteed results"}], "status": "fail"}"#;

    let verdict = parse_verdict(raw).unwrap();

    assert_eq!(verdict.status, AuditStatus::Fail);
    assert_eq!(verdict.compliance_results[0].severity, Severity::Critical);
}

#[test]
fn given_unknown_severity_and_status_when_parsed_then_warning_and_unknown() {
    let raw = r#"{"compliance_results": [{"category": "Tone", "severity": "MINOR", "description": "x", "timestamp": "00:12"}], "status": "MAYBE"}"#;

    let verdict = parse_verdict(raw).unwrap();

    assert_eq!(verdict.status, AuditStatus::Unknown);
    assert_eq!(verdict.compliance_results[0].severity, Severity::Warning);
    assert_eq!(
        verdict.compliance_results[0].timestamp.as_deref(),
        Some("00:12")
    );
}

#[test]
fn given_prose_without_json_when_parsed_then_invalid_json_error() {
    let err = parse_verdict("I could not evaluate this video.").unwrap_err();

    assert_eq!(err.origin(), BodyOrigin::Unfenced);
    assert!(err.to_string().contains("no valid JSON"));
}

#[test]
fn given_empty_fence_when_parsed_then_empty_body_error() {
    let err = parse_verdict("```json\n```").unwrap_err();

    assert!(matches!(
        err,
        VerdictParseError::EmptyBody {
            origin: BodyOrigin::Fenced
        }
    ));
}

#[test]
fn given_numeric_timestamp_when_parsed_then_issue_is_kept_with_timestamp_as_text() {
    let raw = "```json\n{\"compliance_results\": [{\"category\": \"Claims\", \"severity\": \"CRITICAL\", \"description\": \"Guaranteed cure\", \"timestamp\": 12.5}], \"status\": \"FAIL\"}\n```";

    let verdict = parse_verdict(raw).unwrap();

    assert_eq!(verdict.status, AuditStatus::Fail);
    assert_eq!(verdict.compliance_results.len(), 1);
    assert_eq!(verdict.compliance_results[0].severity, Severity::Critical);
    assert_eq!(
        verdict.compliance_results[0].timestamp.as_deref(),
        Some("12.5")
    );
}

#[test]
fn given_null_category_when_parsed_then_issue_is_kept_with_empty_category() {
    let raw = r#"{"compliance_results": [{"category": null, "severity": "CRITICAL", "description": "Hidden fees"}], "status": "FAIL"}"#;

    let verdict = parse_verdict(raw).unwrap();

    assert_eq!(verdict.compliance_results.len(), 1);
    assert_eq!(verdict.compliance_results[0].category, "");
    assert_eq!(verdict.compliance_results[0].description, "Hidden fees");
    assert_eq!(verdict.compliance_results[0].severity, Severity::Critical);
}

#[test]
fn given_issue_missing_fields_when_parsed_then_defaults_fill_them() {
    let raw = r#"{"compliance_results": [{"severity": "WARNING"}, "not an issue"], "status": "FAIL", "final_report": null}"#;

    let verdict = parse_verdict(raw).unwrap();

    assert_eq!(verdict.compliance_results.len(), 1);
    assert_eq!(verdict.compliance_results[0].category, "");
    assert_eq!(verdict.compliance_results[0].description, "");
    assert!(verdict.compliance_results[0].timestamp.is_none());
    assert_eq!(verdict.final_report, DEFAULT_FINAL_REPORT);
}
