//! Extraction of JSON payloads from model output
//!
//! Models asked for "only JSON" still wrap it in Markdown fences or add a
//! sentence around it. [`extract_json`] is the single place that deals with
//! this, so the plan generator and the synthesizer parse replies the same way.

use crate::types::{AppError, Result};
use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Return the body of the first fenced block, or the trimmed input when
/// there is no fence. A language tag right after the opening fence
/// (` ```json `) is dropped. An unterminated fence runs to the end.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(start) = text.find(FENCE) else {
        return text;
    };

    let mut rest = &text[start + FENCE.len()..];
    if let Some(newline) = rest.find('\n') {
        let tag = rest[..newline].trim();
        if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            rest = &rest[newline + 1..];
        }
    }

    match rest.find(FENCE) {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

/// Parse `T` out of possibly-annotated model output.
///
/// Fences are stripped first. If that does not parse, the outermost
/// `{ ... }` span is tried. Anything else is [`AppError::MalformedResponse`].
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let candidate = strip_code_fences(text);
    if candidate.is_empty() {
        return Err(AppError::MalformedResponse("empty response".to_string()));
    }

    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let braced = match (candidate.find('{'), candidate.rfind('}')) {
                (Some(open), Some(close)) if open < close => Some(&candidate[open..=close]),
                _ => None,
            };
            braced
                .and_then(|slice| serde_json::from_str(slice).ok())
                .ok_or_else(|| AppError::MalformedResponse(first_err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        answer: u32,
    }

    #[test]
    fn test_plain_json() {
        let parsed: Sample = extract_json(r#"{"answer": 42}"#).unwrap();
        assert_eq!(parsed, Sample { answer: 42 });
    }

    #[test]
    fn test_json_fence_with_tag() {
        let text = "Voici le plan :\n```json\n{\"answer\": 7}\n```\nBonne recherche";
        let parsed: Sample = extract_json(text).unwrap();
        assert_eq!(parsed.answer, 7);
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n{\"answer\": 3}\n```";
        assert_eq!(strip_code_fences(text), "{\"answer\": 3}");
    }

    #[test]
    fn test_inline_fence_without_newline() {
        assert_eq!(strip_code_fences("```{\"answer\": 1}```"), "{\"answer\": 1}");
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "```json\n{\"answer\": 5}";
        let parsed: Sample = extract_json(text).unwrap();
        assert_eq!(parsed.answer, 5);
    }

    #[test]
    fn test_surrounding_prose_without_fence() {
        let text = "Sure! {\"answer\": 9} Hope this helps.";
        let parsed: Sample = extract_json(text).unwrap();
        assert_eq!(parsed.answer, 9);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result: Result<Sample> = extract_json("I cannot help with that.");
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_is_malformed() {
        let result: Result<Sample> = extract_json("   ");
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
