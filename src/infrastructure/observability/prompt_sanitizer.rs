const MAX_VISIBLE_CHARS: usize = 100;

const SENSITIVE_PATTERNS: [(&str, &str); 7] = [
    ("Bearer ", "Bearer [REDACTED]"),
    ("accessToken=", "accessToken=[REDACTED]"),
    ("api-key: ", "api-key: [REDACTED]"),
    ("api_key=", "api_key=[REDACTED]"),
    ("password=", "password=[REDACTED]"),
    ("secret=", "secret=[REDACTED]"),
    ("token=", "token=[REDACTED]"),
];

/// Shortens model prompts and responses for log output and masks credentials.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let sanitized = match trimmed.char_indices().nth(MAX_VISIBLE_CHARS) {
        Some((cut, _)) => format!("{}... ({} chars total)", &trimmed[..cut], total),
        None => trimmed.to_string(),
    };

    redact_sensitive_patterns(&sanitized)
}

fn redact_sensitive_patterns(text: &str) -> String {
    let mut result = text.to_string();

    for (pattern, replacement) in SENSITIVE_PATTERNS {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let idx = search_from + found;
            let value_start = idx + pattern.len();
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(idx..end, replacement);
            search_from = idx + replacement.len();
        }
    }

    result
}
