//! Tiered repair of near-valid JSON from LLM responses.
//!
//! Each tier is a general-purpose pure function, attempted only if the prior
//! tier fails to produce parseable JSON:
//!
//! 1. direct parse;
//! 2. structural repair (outer-span re-extraction, trailing commas, unquoted
//!    keys, missing closers, run-on whitespace);
//! 3. truncation repair (cut at the last balanced prefix);
//! 4. key-value salvage (reconstruct a partial object from `"name": [...]`
//!    fragments that parse individually).
//!
//! All scanning is quote- and escape-aware so braces inside string values
//! never corrupt depth tracking.

use serde_json::Value;

use crate::types::errors::CategorizationError;

/// Parses a candidate JSON string, repairing it if necessary.
///
/// Returns the parsed top-level object, or `ParseFailure` once all four
/// tiers are exhausted. Callers treat that as a per-batch condition and fall
/// back to rule-based categorization; it is never fatal to a run.
pub fn parse_resilient(candidate: &str) -> Result<Value, CategorizationError> {
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        if value.is_object() {
            return Ok(value);
        }
    }

    let repaired = repair_structure(candidate);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        if value.is_object() {
            return Ok(value);
        }
    }

    if let Some(prefix) = repair_truncation(candidate) {
        if let Ok(value) = serde_json::from_str::<Value>(&prefix) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    if let Some(value) = salvage_categories(candidate) {
        return Ok(value);
    }

    Err(CategorizationError::ParseFailure(preview(candidate)))
}

/// Tier 2: structural repair.
///
/// Re-extracts the outermost `{...}` span, strips trailing commas before
/// closers, quotes unquoted object keys, collapses whitespace runs, and
/// appends missing closers computed from the open-container stack.
pub fn repair_structure(input: &str) -> String {
    let sliced = match (input.find('{'), input.rfind('}')) {
        (Some(start), Some(end)) if start < end => &input[start..=end],
        (Some(start), _) => &input[start..],
        _ => input,
    };

    let chars: Vec<char> = sliced.chars().collect();
    let mut out = String::with_capacity(sliced.len() + 8);
    // Expected closers for currently open containers, innermost last
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            '{' => {
                stack.push('}');
                out.push(c);
                i += 1;
            }
            '[' => {
                stack.push(']');
                out.push(c);
                i += 1;
            }
            '}' | ']' => {
                // Stray closers with nothing open are dropped
                if !stack.is_empty() {
                    stack.pop();
                    out.push(c);
                }
                i += 1;
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                let trailing = j < chars.len() && (chars[j] == '}' || chars[j] == ']');
                if !trailing {
                    out.push(',');
                }
                i += 1;
            }
            ch if ch.is_whitespace() => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
            }
            ch if expecting_key(&out, &stack) && is_ident_start(ch) => {
                let mut j = i;
                while j < chars.len() && is_ident_char(chars[j]) {
                    j += 1;
                }
                let mut k = j;
                while k < chars.len() && chars[k].is_whitespace() {
                    k += 1;
                }
                if k < chars.len() && chars[k] == ':' {
                    out.push('"');
                    out.extend(&chars[i..j]);
                    out.push('"');
                } else {
                    out.extend(&chars[i..j]);
                }
                i = j;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    if in_string {
        out.push('"');
    }
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out.trim().to_string()
}

/// Tier 3: truncation repair.
///
/// Walks the string tracking container depth and returns the prefix ending at
/// the last position where depth returns to zero, or `None` if it never does.
pub fn repair_truncation(input: &str) -> Option<String> {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut seen_open = false;
    let mut last_balanced: Option<usize> = None;

    for (idx, c) in input.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                seen_open = true;
            }
            '}' | ']' => {
                depth -= 1;
                if depth == 0 && seen_open {
                    last_balanced = Some(idx + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    last_balanced.map(|end| input[..end].trim().to_string())
}

/// Tier 4: key-value salvage.
///
/// Scans for `"name": [ ... ]` shaped fragments anywhere in the string and
/// reconstructs a partial object from whichever fragments parse individually.
pub fn salvage_categories(input: &str) -> Option<Value> {
    let chars: Vec<char> = input.chars().collect();
    let mut map = serde_json::Map::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '"' {
            i += 1;
            continue;
        }
        let (key, after_key) = match read_quoted(&chars, i) {
            Some(parsed) => parsed,
            None => break, // unterminated string; nothing more to salvage
        };
        let mut j = after_key;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        if j >= chars.len() || chars[j] != ':' {
            i = after_key;
            continue;
        }
        j += 1;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        if j >= chars.len() || chars[j] != '[' {
            i = after_key;
            continue;
        }
        match matching_close(&chars, j) {
            Some(end) => {
                let fragment: String = chars[j..=end].iter().collect();
                if let Ok(value) = serde_json::from_str::<Value>(&fragment) {
                    if !key.is_empty() {
                        map.insert(key, value);
                    }
                }
                i = end + 1;
            }
            None => {
                i = after_key;
            }
        }
    }

    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}

/// Reads a quoted string starting at `start` (which must be `"`). Returns the
/// unescaped content and the index just past the closing quote.
fn read_quoted(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut content = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                content.push(chars[i + 1]);
                i += 2;
            }
            '"' => return Some((content, i + 1)),
            c => {
                content.push(c);
                i += 1;
            }
        }
    }
    None
}

/// Finds the index of the `]` matching the `[` at `open`, quote-aware.
fn matching_close(chars: &[char], open: usize) -> Option<usize> {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = open;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// True when the scanner sits inside an object at a key position.
fn expecting_key(out: &str, stack: &[char]) -> bool {
    if stack.last() != Some(&'}') {
        return false;
    }
    matches!(out.trim_end().chars().last(), Some('{') | Some(','))
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn preview(s: &str) -> String {
    s.chars().take(120).collect()
}
