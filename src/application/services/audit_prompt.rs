use crate::domain::VideoMetadata;

/// Retrieval query: transcript followed by the on-screen text.
pub fn build_query(transcript: &str, ocr_text: &[String]) -> String {
    format!("{} {}", transcript, ocr_text.join(" "))
}

pub fn build_system_prompt(rule_passages: &[String]) -> String {
    let rules = rule_passages.join("\n\n");

    format!(
        r#"You are a Senior Brand Compliance Auditor.

OFFICIAL REGULATORY RULES:
{rules}

INSTRUCTIONS:
1. Analyze the Transcript and OCR text below.
2. Identify ANY violations of the rules.
3. Return strictly JSON in the following format:

{{
    "compliance_results": [
        {{
            "category": "Claim Validation",
            "severity": "CRITICAL",
            "description": "Explanation of the violation..."
        }}
    ],
    "status": "FAIL",
    "final_report": "Summary of findings..."
}}

Severity must be either "CRITICAL" or "WARNING".
If no violations are found, set "status" to "PASS" and "compliance_results" to [].
"#
    )
}

pub fn build_user_message(
    metadata: Option<&VideoMetadata>,
    transcript: &str,
    ocr_text: &[String],
) -> String {
    let metadata_json = metadata
        .and_then(|m| serde_json::to_string(m).ok())
        .unwrap_or_else(|| "{}".to_string());
    let ocr_json = serde_json::to_string(ocr_text).unwrap_or_else(|_| "[]".to_string());

    format!(
        "VIDEO METADATA: {metadata_json}\nTRANSCRIPT: {transcript}\nON-SCREEN TEXT (OCR): {ocr_json}\n"
    )
}
