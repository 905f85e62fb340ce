//! Post-processing for JSON text returned by the completion endpoint.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s*([}\]])").expect("trailing comma pattern is a valid regex")
});

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Removes commas that directly precede a closing `}` or `]`.
///
/// This is the only repair applied to model output. It is not string-aware, so
/// callers only run it on text that already failed to parse.
pub fn remove_trailing_commas(text: &str) -> Cow<'_, str> {
    TRAILING_COMMA.replace_all(text, "$1")
}

/// Deserializes model output, retrying once with trailing commas removed.
///
/// Well-formed JSON is never rewritten.
pub fn parse_llm_json<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let text = strip_json_fences(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first) => {
            let repaired = remove_trailing_commas(text);
            if matches!(repaired, Cow::Borrowed(_)) {
                return Err(first);
            }
            debug!("Direct JSON parse failed ({first}); retrying with trailing commas removed");
            serde_json::from_str(&repaired)
        }
    }
}
