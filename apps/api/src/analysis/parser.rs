//! Response parser — pulls the first well-formed JSON object out of a noisy
//! model response.
//!
//! Providers are instructed to emit pure JSON but are not guaranteed to:
//! responses arrive wrapped in markdown fences, prefixed with commentary, or
//! truncated. Parsing is therefore best-effort, trying progressively looser
//! strategies before giving up.

use serde_json::Value;
use thiserror::Error;

/// Upper bound on how far past an opening brace the balanced-candidate scan
/// will look for a closing one. Bounds worst-case cost on pathological
/// responses; a valid object whose closing brace lies beyond this window
/// will not be found by the scan (the last-brace fallback may still catch it).
pub const JSON_SCAN_WINDOW: usize = 20_000;

#[derive(Debug, Error)]
#[error("no valid JSON object found in model response")]
pub struct ParseError;

/// Extracts the first JSON object from `text`.
///
/// Strategies, in order, stopping at the first success:
/// 1. Parse the entire input as JSON.
/// 2. For each `{` from left to right, try every closing `}` within
///    [`JSON_SCAN_WINDOW`] characters; the first substring that parses wins.
///    This favors the earliest, shortest well-formed object — the intended
///    payload even when wrapped in prose or code fences.
/// 3. Parse the span from the first `{` to the last `}` in the whole input.
pub fn extract_first_json(text: &str) -> Result<Value, ParseError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Ok(value);
        }
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (open_pos, &(open_byte, ch)) in chars.iter().enumerate() {
        if ch != '{' {
            continue;
        }
        let window_end = (open_pos + JSON_SCAN_WINDOW).min(chars.len());
        for &(close_byte, close_ch) in &chars[open_pos + 1..window_end] {
            if close_ch != '}' {
                continue;
            }
            let candidate = &text[open_byte..close_byte + close_ch.len_utf8()];
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                return Ok(value);
            }
        }
    }

    // Last resort: the widest possible span.
    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
        if first < last {
            if let Ok(value) = serde_json::from_str::<Value>(&text[first..=last]) {
                return Ok(value);
            }
        }
    }

    Err(ParseError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json_round_trips() {
        let obj = json!({"scores": {"Tailoring": 7}, "overall_score": 8});
        let parsed = extract_first_json(&obj.to_string()).unwrap();
        assert_eq!(parsed, obj);
    }

    #[test]
    fn test_json_inside_markdown_fence() {
        let text = "Here is the result:\n```json\n{\"a\":1}\n```";
        assert_eq!(extract_first_json(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_json_with_leading_and_trailing_prose() {
        let text = "Sure! The analysis follows. {\"overall_score\": 6} Hope this helps.";
        assert_eq!(
            extract_first_json(text).unwrap(),
            json!({"overall_score": 6})
        );
    }

    #[test]
    fn test_nested_object_recovered_despite_early_close_braces() {
        // The first candidate ends at the inner object's brace and fails to
        // parse; the scan keeps going to the outer close.
        let text = "prefix {\"outer\": {\"inner\": [1, 2]}} suffix";
        assert_eq!(
            extract_first_json(text).unwrap(),
            json!({"outer": {"inner": [1, 2]}})
        );
    }

    #[test]
    fn test_earliest_object_wins() {
        let text = "{\"first\": 1} and later {\"second\": 2}";
        assert_eq!(extract_first_json(text).unwrap(), json!({"first": 1}));
    }

    #[test]
    fn test_no_json_is_an_error() {
        assert!(extract_first_json("no json here").is_err());
    }

    #[test]
    fn test_unclosed_object_is_an_error() {
        assert!(extract_first_json("{\"truncated\": \"resp").is_err());
    }

    #[test]
    fn test_top_level_array_is_not_an_object() {
        // A bare array is not the chunk-analysis shape; the embedded-object
        // scan may still find an object inside it.
        assert!(extract_first_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_the_scan() {
        let text = "note: use {braces} carefully {\"msg\": \"a } in a string\"}";
        assert_eq!(
            extract_first_json(text).unwrap(),
            json!({"msg": "a } in a string"})
        );
    }
}
