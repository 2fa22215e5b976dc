//! Validation errors and their report rendering

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in payload text
pub type Span = std::ops::Range<usize>;

/// A residue token failed a validation rule; the whole payload is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed URL in payload: {token:?}")]
    UrlFormat { token: String },
    #[error("unsafe character in payload: {token:?}")]
    UnsafeCharacter { token: String },
    #[error("forbidden keyword in payload: {token:?}")]
    ForbiddenKeyword { token: String },
    #[error("forbidden call in payload: {token:?}")]
    ForbiddenCall { token: String },
    #[error("code injection in payload: {token:?}")]
    CodeInjection { token: String },
}

/// Which rule rejected a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    UrlFormat,
    UnsafeCharacter,
    ForbiddenKeyword,
    ForbiddenCall,
    CodeInjection,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationErrorKind::UrlFormat => "url-format",
            ValidationErrorKind::UnsafeCharacter => "unsafe-character",
            ValidationErrorKind::ForbiddenKeyword => "forbidden-keyword",
            ValidationErrorKind::ForbiddenCall => "forbidden-call",
            ValidationErrorKind::CodeInjection => "code-injection",
        };
        write!(f, "{}", name)
    }
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, token: impl Into<String>) -> Self {
        let token = token.into();
        match kind {
            ValidationErrorKind::UrlFormat => ValidationError::UrlFormat { token },
            ValidationErrorKind::UnsafeCharacter => ValidationError::UnsafeCharacter { token },
            ValidationErrorKind::ForbiddenKeyword => ValidationError::ForbiddenKeyword { token },
            ValidationErrorKind::ForbiddenCall => ValidationError::ForbiddenCall { token },
            ValidationErrorKind::CodeInjection => ValidationError::CodeInjection { token },
        }
    }

    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::UrlFormat { .. } => ValidationErrorKind::UrlFormat,
            ValidationError::UnsafeCharacter { .. } => ValidationErrorKind::UnsafeCharacter,
            ValidationError::ForbiddenKeyword { .. } => ValidationErrorKind::ForbiddenKeyword,
            ValidationError::ForbiddenCall { .. } => ValidationErrorKind::ForbiddenCall,
            ValidationError::CodeInjection { .. } => ValidationErrorKind::CodeInjection,
        }
    }

    /// The offending residue token
    pub fn token(&self) -> &str {
        match self {
            ValidationError::UrlFormat { token }
            | ValidationError::UnsafeCharacter { token }
            | ValidationError::ForbiddenKeyword { token }
            | ValidationError::ForbiddenCall { token }
            | ValidationError::CodeInjection { token } => token,
        }
    }

    /// Where the token first occurs in `source`
    pub fn span(&self, source: &str) -> Span {
        let token = self.token();
        match source.find(token) {
            Some(start) if !token.is_empty() => start..start + token.len(),
            _ => 0..0,
        }
    }

    fn rule(&self) -> &'static str {
        match self.kind() {
            ValidationErrorKind::UrlFormat => "does not match the URL grammar",
            ValidationErrorKind::UnsafeCharacter => "contains a character outside the safe set",
            ValidationErrorKind::ForbiddenKeyword => "contains a blacklisted keyword",
            ValidationErrorKind::ForbiddenCall => "calls a forbidden function",
            ValidationErrorKind::CodeInjection => "declares a function",
        }
    }

    /// Format the error with payload context using ariadne
    pub fn report(&self, source: &str, filename: &str) -> String {
        let span = self.span(source);
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(format!("payload rejected ({})", self.kind()))
            .with_label(
                Label::new((filename, span))
                    .with_message(format!("this text {}", self.rule()))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| self.to_string()),
            Err(_) => self.to_string(),
        }
    }
}
