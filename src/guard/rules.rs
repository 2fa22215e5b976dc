//! Blacklist rules applied to residue tokens

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ValidationError, ValidationErrorKind};

// =============================================================================
// RULE PATTERNS
// =============================================================================

/// scheme://[user[:pass]@]host[:port][/path]*, host being a dotted quad or a
/// domain name
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:http|https|ftp)://",
        r"(?:[a-zA-Z0-9.\-]+(?::[a-zA-Z0-9.&%$\-]+)*@)*",
        r"(?:",
        r"(?:25[0-5]|2[0-4][0-9]|[0-1][0-9]{2}|[1-9][0-9]|[1-9])\.",
        r"(?:25[0-5]|2[0-4][0-9]|[0-1][0-9]{2}|[1-9][0-9]|[1-9]|0)\.",
        r"(?:25[0-5]|2[0-4][0-9]|[0-1][0-9]{2}|[1-9][0-9]|[1-9]|0)\.",
        r"(?:25[0-5]|2[0-4][0-9]|[0-1][0-9]{2}|[1-9][0-9]|[0-9])",
        r"|(?:[a-zA-Z0-9\-]+\.)*[a-zA-Z0-9\-]+\.(?:com|edu|gov|net|org|biz|info|pro|[a-z]{3,10}|[a-zA-Z]{2})",
        r")",
        r"(?::[0-9]+)*",
        r"(?:/(?:$|[a-zA-Z0-9.,?+&%$#=~_\-]+))*$",
    ))
    .unwrap()
});

static SAFE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^[^\\<>"'`]+$"#).unwrap());

/// Matched against the lowercased token
static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"javascript\b|phpinfo\b|html\b|\bscript\b|\bobject\b|\bapplet\b|\bembed\b|phpsess(?:id|ion)\b|iframe\b",
    )
    .unwrap()
});

static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:eval|system|alert|void)\s*\(").unwrap());

/// Named declarations, anonymous functions and arrow functions
static INJECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+\w+\s*\(|(?i:function\s*\()|=\s*\w+\s*=>|\(.*\)\s*=>").unwrap()
});

// =============================================================================
// VALIDATOR
// =============================================================================

/// Checks residue tokens against the rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternValidator {
    /// Skip the URL rule; every token goes through the character rules
    strict: bool,
}

impl PatternValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator for channels where a URL earns no exemption
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Validate tokens in order, stopping at the first failure
    pub fn validate<S: AsRef<str>>(&self, tokens: &[S]) -> Result<(), ValidationError> {
        tokens
            .iter()
            .try_for_each(|token| self.check(token.as_ref()))
    }

    /// Validate a single token
    ///
    /// Words that mention a scheme are held to the URL grammar and exempt from
    /// the other rules; the rest of the token still goes through them.
    pub fn check(&self, token: &str) -> Result<(), ValidationError> {
        if self.strict || !looks_like_url(token) {
            return check_text(token);
        }
        let mut prose = Vec::new();
        for word in token.split_whitespace() {
            if !looks_like_url(word) {
                prose.push(word);
            } else if !URL_RE.is_match(word) {
                return Err(ValidationError::new(ValidationErrorKind::UrlFormat, word));
            }
        }
        if prose.is_empty() {
            return Ok(());
        }
        check_text(&prose.join(" ")).map_err(|e| ValidationError::new(e.kind(), token))
    }
}

/// Rules b to e
fn check_text(token: &str) -> Result<(), ValidationError> {
    if !SAFE_RE.is_match(token) {
        return Err(ValidationError::new(
            ValidationErrorKind::UnsafeCharacter,
            token,
        ));
    }
    if KEYWORD_RE.is_match(&token.to_lowercase()) {
        return Err(ValidationError::new(
            ValidationErrorKind::ForbiddenKeyword,
            token,
        ));
    }
    if CALL_RE.is_match(token) {
        return Err(ValidationError::new(ValidationErrorKind::ForbiddenCall, token));
    }
    if INJECTION_RE.is_match(token) {
        return Err(ValidationError::new(ValidationErrorKind::CodeInjection, token));
    }
    Ok(())
}

fn looks_like_url(token: &str) -> bool {
    token.contains("http") || token.contains("ftp")
}
