//! JSON extraction from raw LLM responses.
//!
//! Models wrap their JSON in code fences, prose, or nothing at all. This
//! module pulls out the most plausible JSON payload; it never fails, and the
//! returned string may still be unparsable — repairing it is the job of
//! `json_repair`.

/// Returns the best-effort JSON substring of an LLM response.
///
/// In order, first match wins:
/// 1. the body of a triple-backtick code fence (optionally tagged `json`),
/// 2. the span from the first `{` to the last `}`,
/// 3. the whole trimmed response.
pub fn extract_json_candidate(response: &str) -> String {
    if let Some(inner) = fenced_block(response) {
        return inner.trim().to_string();
    }
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            return response[start..=end].trim().to_string();
        }
    }
    response.trim().to_string()
}

/// Returns the body of the first complete triple-backtick fence, if any.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let mut body = &text[open + 3..];
    body = body
        .strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body);
    let close = body.find("```")?;
    Some(&body[..close])
}
