//! JSON extraction from generative text responses
//!
//! Models are asked to return a bare JSON array but routinely wrap it in
//! markdown code fences or surround it with prose. This module is the single
//! place that turns raw response text into a parsed array, and it fails
//! closed: anything that is not unambiguously one JSON array is an error.

use regex::Regex;

use crate::error::{Error, Result};

/// Extract the JSON array from possibly-fenced response text
///
/// Strips ``` and ```json fences, locates the outermost `[...]` span, and
/// parses it. Prose without an array, a non-array top level, and malformed
/// JSON all fail; there is no partial acceptance.
pub fn extract_json_array(raw: &str) -> Result<serde_json::Value> {
    let stripped = strip_code_fences(raw);

    let start = stripped.find('[');
    let end = stripped.rfind(']');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &stripped[s..=e];
            serde_json::from_str(json_str).map_err(|err| {
                Error::InvalidResponse(format!(
                    "Invalid JSON array: {} | Raw: {}",
                    err,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidResponse(format!(
            "No JSON array found | Raw: {}",
            truncate(raw)
        ))),
    }
}

/// Remove markdown code-fence markers, leaving the fenced content in place
fn strip_code_fences(raw: &str) -> String {
    let fence_re = Regex::new(r"```(?:json)?").expect("valid regex");
    fence_re.replace_all(raw, "").trim().to_string()
}

/// Truncate long raw responses for error messages
fn truncate(s: &str) -> String {
    const MAX: usize = 200;
    if s.chars().count() > MAX {
        let cut: String = s.chars().take(MAX).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let value = extract_json_array(r#"[{"type": "info", "text": "ok"}]"#).unwrap();
        assert_eq!(value[0]["type"], "info");
    }

    #[test]
    fn test_fenced_array() {
        let raw = "```json\n[{\"type\": \"warning\", \"text\": \"careful\"}]\n```";
        let value = extract_json_array(raw).unwrap();
        assert_eq!(value[0]["text"], "careful");
    }

    #[test]
    fn test_array_surrounded_by_prose() {
        let raw = "Here are your insights:\n[{\"type\": \"info\", \"text\": \"ok\"}]\nHope that helps!";
        let value = extract_json_array(raw).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_array() {
        let value = extract_json_array("[]").unwrap();
        assert!(value.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_prose_without_array_fails() {
        assert!(extract_json_array("I cannot help with that request.").is_err());
    }

    #[test]
    fn test_object_top_level_fails() {
        assert!(extract_json_array(r#"{"type": "info", "text": "ok"}"#).is_err());
    }

    #[test]
    fn test_truncated_array_fails() {
        assert!(extract_json_array(r#"[{"type": "info", "text": "#).is_err());
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(extract_json_array("[{'single': 'quotes'}]").is_err());
    }

    #[test]
    fn test_error_truncates_long_raw() {
        let raw = format!("₱{}", "x".repeat(500));
        let err = extract_json_array(&raw).unwrap_err();
        assert!(err.to_string().len() < 300);
    }
}
