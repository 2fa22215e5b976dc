//! Residue extraction
//!
//! Removes every approved fragment from a payload. Whatever is left came from
//! entity data and must be checked by the validator.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Stands in for removed fragments so that text on either side never merges
pub const SEPARATOR: char = '\u{1f}';

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap()
});

/// Strips approved fragments from payload text
#[derive(Debug, Clone, Copy)]
pub struct ResidueExtractor<'a> {
    fragments: &'a [String],
}

impl<'a> ResidueExtractor<'a> {
    /// `fragments` must already be in removal order
    pub fn new(fragments: &'a [String]) -> Self {
        Self { fragments }
    }

    /// Remove every occurrence of every fragment, in catalog order
    pub fn strip(&self, payload: &str) -> String {
        let separator = SEPARATOR.to_string();
        let mut working = payload.to_string();
        for fragment in self.fragments.iter().filter(|f| !f.is_empty()) {
            if working.contains(fragment.as_str()) {
                working = working.replace(fragment.as_str(), &separator);
            }
        }
        working
    }

    /// Residue tokens of `payload`, numeric tokens dropped
    pub fn extract(&self, payload: &str) -> Vec<String> {
        let tokens = tokenize(&self.strip(payload));
        trace!(count = tokens.len(), "residue tokens");
        tokens
    }
}

/// Split stripped text into trimmed, non-empty, non-numeric tokens
pub fn tokenize(stripped: &str) -> Vec<String> {
    stripped
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty() && !is_numeric(token))
        .map(str::to_string)
        .collect()
}

/// Ids, indices and coordinates
pub fn is_numeric(token: &str) -> bool {
    NUMERIC_RE.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_occurrence_is_removed() {
        let list = fragments(&["<b>", "</b>"]);
        let extractor = ResidueExtractor::new(&list);
        assert_eq!(
            extractor.extract("<b>one</b> and <b>two</b>"),
            vec!["one", "and", "two"]
        );
    }

    #[test]
    fn test_numeric_tokens_are_dropped() {
        let list = fragments(&["var loc_", " = new Location( ", ", ", " );"]);
        let extractor = ResidueExtractor::new(&list);
        assert!(extractor
            .extract("var loc_0 = new Location( 46.45, -6.5 );")
            .is_empty());
    }

    #[test]
    fn test_interior_whitespace_is_kept() {
        let list = fragments(&["\""]);
        let extractor = ResidueExtractor::new(&list);
        assert_eq!(extractor.extract("\"  Blue water \""), vec!["Blue water"]);
    }

    #[test]
    fn test_text_around_removed_fragment_does_not_merge() {
        let list = fragments(&["ipt"]);
        let extractor = ResidueExtractor::new(&list);
        assert_eq!(extractor.extract("scriptx"), vec!["scr", "x"]);
    }

    #[test]
    fn test_is_numeric() {
        for token in ["0", "42", "-6.5", "+1.", ".25", "1e-3"] {
            assert!(is_numeric(token), "{token}");
        }
        for token in ["", "1a", "1.2.3", "e5", "Paris"] {
            assert!(!is_numeric(token), "{token}");
        }
    }
}
