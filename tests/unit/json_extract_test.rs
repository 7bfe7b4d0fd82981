//! Unit tests for JSON extraction from raw LLM responses.

use markwarden::services::json_extract::extract_json_candidate;

#[test]
fn test_extracts_tagged_code_fence() {
    let response = "Here you go:\n```json\n{\"Dev\": []}\n```\nHope that helps!";
    assert_eq!(extract_json_candidate(response), "{\"Dev\": []}");
}

#[test]
fn test_extracts_untagged_code_fence() {
    let response = "```\n{\"a\": 1}\n```";
    assert_eq!(extract_json_candidate(response), "{\"a\": 1}");
}

#[test]
fn test_fence_without_newline_after_tag() {
    let response = "```json{\"a\": 1}```";
    assert_eq!(extract_json_candidate(response), "{\"a\": 1}");
}

#[test]
fn test_extracts_brace_span_from_prose() {
    let response = "Sure! The result is {\"News\": [{\"title\": \"BBC\", \"url\": \"https://bbc.co.uk\"}]} as requested.";
    assert_eq!(
        extract_json_candidate(response),
        "{\"News\": [{\"title\": \"BBC\", \"url\": \"https://bbc.co.uk\"}]}"
    );
}

#[test]
fn test_falls_back_to_trimmed_text() {
    let response = "  no json here at all  ";
    assert_eq!(extract_json_candidate(response), "no json here at all");
}

#[test]
fn test_fence_wins_over_brace_span() {
    // Prose braces outside the fence must not widen the extraction
    let response = "{ignore this} ```json\n{\"a\": 1}\n``` {and this}";
    assert_eq!(extract_json_candidate(response), "{\"a\": 1}");
}

#[test]
fn test_unclosed_fence_falls_through_to_brace_span() {
    let response = "```json\n{\"a\": 1}";
    assert_eq!(extract_json_candidate(response), "{\"a\": 1}");
}

#[test]
fn test_never_fails_on_empty_input() {
    assert_eq!(extract_json_candidate(""), "");
}
