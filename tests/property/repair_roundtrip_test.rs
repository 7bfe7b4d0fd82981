//! Property tests for the JSON repair pipeline: well-formed category maps
//! always parse unchanged, and no input panics the pipeline.

use markwarden::services::json_repair::parse_resilient;
use proptest::prelude::*;
use serde_json::{json, Value};

fn category_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,14}( [A-Z][a-z]{1,10})?"
}

fn bookmark_entry() -> impl Strategy<Value = Value> {
    ("[A-Za-z0-9 ]{1,30}", "[a-z0-9]{1,12}", "[a-z0-9/]{0,20}").prop_map(
        |(title, host, path)| {
            json!({
                "title": title,
                "url": format!("https://{}.example/{}", host, path),
            })
        },
    )
}

fn category_map() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map(
        category_name(),
        proptest::collection::vec(bookmark_entry(), 1..6),
        1..8,
    )
    .prop_map(|map| Value::Object(map.into_iter().map(|(k, v)| (k, json!(v))).collect()))
}

proptest! {
    /// Well-formed output never needs repair, and repair never alters it.
    #[test]
    fn valid_maps_parse_unchanged(map in category_map()) {
        let serialized = serde_json::to_string(&map).unwrap();
        let parsed = parse_resilient(&serialized).unwrap();
        prop_assert_eq!(parsed, map);
    }

    /// Pretty-printed output (indentation, newlines) parses identically.
    #[test]
    fn pretty_printing_is_transparent(map in category_map()) {
        let pretty = serde_json::to_string_pretty(&map).unwrap();
        let parsed = parse_resilient(&pretty).unwrap();
        prop_assert_eq!(parsed, map);
    }

    /// Chatty model framing around valid JSON is stripped before parsing.
    #[test]
    fn fenced_maps_parse_unchanged(map in category_map()) {
        let framed = format!(
            "Here are your categories:\n```json\n{}\n```\nLet me know if you need changes.",
            serde_json::to_string(&map).unwrap()
        );
        let parsed = parse_resilient(&framed).unwrap();
        prop_assert_eq!(parsed, map);
    }

    /// Every prefix of valid output either repairs to an object or fails
    /// cleanly; the pipeline must never panic on truncation.
    #[test]
    fn truncation_never_panics(map in category_map(), keep in 0usize..400) {
        let serialized = serde_json::to_string(&map).unwrap();
        let cut = serialized.len().min(keep);
        let truncated = &serialized[..cut];
        match parse_resilient(truncated) {
            Ok(value) => prop_assert!(value.is_object()),
            Err(_) => {}
        }
    }

    /// Arbitrary garbage fails cleanly, never panics.
    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,200}") {
        match parse_resilient(&input) {
            Ok(value) => prop_assert!(value.is_object()),
            Err(_) => {}
        }
    }
}
