//! Single-stage guard for worldmap lightbox snippets
//!
//! The snippet wrapper is fixed per engine, so it is stripped with a closed
//! list of patterns rather than a transmitted catalog. Whatever the patterns
//! leave behind goes through the character, keyword, call and function rules.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ValidationError;

use super::residue::{tokenize, SEPARATOR};
use super::rules::PatternValidator;

/// Applied in order; each match becomes a separator
static WRAPPER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // function wrapper
        r"function geo2_maps_lightbox_\d+\(\s*imageSrc\s*\)\s*\{\s*\(\s*function\(\s*\$\s*\)\s*\{",
        r"\}\s*\)\(\s*jQuery\s*\);\s*\}",
        r#"geo2_maps_lightbox_\d+\(\s*""\s*\);"#,
        // engine calls
        r"jQuery\.slimbox\(\s*\[",
        r"\$\.fancybox\(\s*\[",
        r"jQuery\.fancybox3\.open\(\s*\[",
        // items
        r#"\{\s*href:\s*""#,
        r#"",\s*title:\s*""#,
        r#"\{\s*src:\s*""#,
        r#"",\s*opts:\s*\{\s*caption:\s*""#,
        r#"",\s*thumb:\s*""#,
        r#""\s*\}\s*\},\s*"#,
        r#""\s*\},\s*"#,
        r#"\[""#,
        r#"",\s*""#,
        r#""\],\s*"#,
        // options
        r"\],\s*(?:0,\s*)?\{",
        r#"counterText:\s*"(?:Image \{x\} of \{y\}|Photo \{x\} of \{y\}|\{x\}/\{y\})""#,
        r#"type:\s*"image""#,
        r"\}(?:,\s*0)?\s*\);",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Replace every known wrapper with the separator
pub fn strip_wrappers(snippet: &str) -> String {
    let separator = SEPARATOR.to_string();
    WRAPPER_PATTERNS
        .iter()
        .fold(snippet.to_string(), |working, pattern| {
            pattern.replace_all(&working, separator.as_str()).into_owned()
        })
}

/// Residue tokens of a lightbox snippet
pub fn residue(snippet: &str) -> Vec<String> {
    tokenize(&strip_wrappers(snippet))
}

/// Validate a lightbox snippet
pub fn validate_snippet(snippet: &str) -> Result<(), ValidationError> {
    let tokens = residue(snippet);
    debug!(tokens = tokens.len(), "validating lightbox snippet");
    PatternValidator::strict().validate(&tokens)
}
