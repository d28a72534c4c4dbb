//! Structured-JSON extraction from noisy model output.
//!
//! Models wrap their answer in code fences, prose, or trailing commentary.
//! A reply that is already a complete JSON document (bare arrays included) is
//! parsed as-is once any code fence is removed. Otherwise the extractor scans
//! for the first `{` and returns the first balanced top-level object, tracking
//! string literals and escapes so braces inside strings do not count.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Parsing failed; carries the raw model text for diagnostics.
#[derive(Debug, Error)]
#[error("Failed to parse model output as JSON: {message}")]
pub struct JsonExtractionError {
    pub message: String,
    pub raw: String,
}

/// Return the first balanced JSON object in `text`.
///
/// If an object starts but never closes, the fragment from the first `{` to
/// the end is returned so the subsequent parse fails with a clear message.
/// Text with no `{` is returned trimmed.
pub fn extract_json(text: &str) -> &str {
    let Some(start) = text.find('{') else {
        return text.trim();
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &text[start..start + offset + ch.len_utf8()];
                }
            }
            _ => {}
        }
    }

    text[start..].trim_end()
}

/// Body of a reply wrapped in a single code fence, or the trimmed text.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // drop the info string (`json`, `JSON`, ...) on the opening line
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => inner.trim(),
    }
}

/// Extract and deserialize in one step.
///
/// The whole reply is tried first so a bare top-level array survives; only
/// when that fails does the first balanced object get extracted.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, JsonExtractionError> {
    if let Ok(value) = serde_json::from_str(strip_code_fence(text)) {
        return Ok(value);
    }
    serde_json::from_str(extract_json(text)).map_err(|e| JsonExtractionError {
        message: e.to_string(),
        raw: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    #[test]
    fn test_plain_object() {
        assert_eq!(extract_json(r#"{"a":1}"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_fenced_code_block() {
        let text = "```json\n{\"classifications\": []}\n```";
        assert_eq!(extract_json(text), "{\"classifications\": []}");
    }

    #[test]
    fn test_prose_before_and_after() {
        let text = "Here is my analysis:\n{\"x\": {\"y\": 2}}\nLet me know if you need more {detail}.";
        assert_eq!(extract_json(text), "{\"x\": {\"y\": 2}}");
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"note": "use } and { freely", "q": "say \"}\""} trailing"#;
        let extracted = extract_json(text);
        let value: Value = serde_json::from_str(extracted).unwrap();
        assert_eq!(value["note"], "use } and { freely");
        assert_eq!(value["q"], "say \"}\"");
    }

    #[test]
    fn test_first_of_two_objects() {
        assert_eq!(extract_json(r#"{"a":1} {"b":2}"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_unterminated_returns_fragment() {
        let text = "prefix {\"a\": [1, 2";
        assert_eq!(extract_json(text), "{\"a\": [1, 2");
        assert!(parse_json::<Value>(text).is_err());
    }

    #[test]
    fn test_no_object_returns_trimmed_text() {
        assert_eq!(extract_json("  nothing here  "), "nothing here");
    }

    #[test]
    fn test_parse_failure_keeps_raw_text() {
        let err = parse_json::<Value>("sorry, I cannot help").unwrap_err();
        assert_eq!(err.raw, "sorry, I cannot help");
    }

    #[test]
    fn test_bare_array_parsed_whole() {
        let text = r#"[{"signal_id": "s1"}, {"signal_id": "s2"}]"#;
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_fenced_bare_array_parsed_whole() {
        let text = "```json\n[{\"a\": 1}, {\"a\": 2}]\n```";
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value[1]["a"], 2);
    }

    #[test]
    fn test_array_wrapped_in_prose_falls_back_to_first_object() {
        let value: Value = parse_json(r#"Result: [{"a": 1}, {"a": 2}] done"#).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_multibyte_content() {
        let text = "Résumé → {\"name\": \"Zürich ☕\"} fin";
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value["name"], "Zürich ☕");
    }

    proptest! {
        #[test]
        fn prop_wrapped_object_is_recovered(
            prefix in "[a-zA-Z .:\n]{0,40}",
            suffix in "[a-zA-Z .:\n]{0,40}",
            key in "[a-z]{1,8}",
            val in "[a-zA-Z0-9{}\\[\\] ]{0,20}",
        ) {
            let object = serde_json::json!({ key.clone(): val.clone() });
            let text = format!("{prefix}```json\n{object}\n```{suffix}");

            let parsed: Value = parse_json(&text).unwrap();
            prop_assert_eq!(&parsed[&key], &Value::String(val));
        }
    }
}
