//! Consumer-side payload checks
//!
//! A payload is accepted only when everything that is not an approved fragment
//! passes the [`PatternValidator`]. Rejections are logged under
//! [`INTEGRITY_TARGET`] so that tamper signals can be filtered apart from
//! ordinary input errors.

mod lightbox;
mod residue;
mod rules;

pub use lightbox::{residue as lightbox_residue, strip_wrappers, validate_snippet};
pub use residue::{is_numeric, tokenize, ResidueExtractor, SEPARATOR};
pub use rules::PatternValidator;

use tracing::{debug, warn};

use crate::error::ValidationError;

/// Log target for rejected payloads
pub const INTEGRITY_TARGET: &str = "geo_payload::integrity";

/// Strip `fragments` from `text` and validate the residue
///
/// Returns the residue tokens that passed.
pub fn validate_text(
    channel: &str,
    text: &str,
    fragments: &[String],
) -> Result<Vec<String>, ValidationError> {
    let tokens = ResidueExtractor::new(fragments).extract(text);
    debug!(channel, tokens = tokens.len(), "validating residue");
    PatternValidator::new()
        .validate(&tokens)
        .map_err(|err| rejected(channel, err))?;
    Ok(tokens)
}

/// Validate a worldmap lightbox snippet
pub fn validate_lightbox(snippet: &str) -> Result<(), ValidationError> {
    validate_snippet(snippet).map_err(|err| rejected("lightbox", err))
}

fn rejected(channel: &str, err: ValidationError) -> ValidationError {
    warn!(
        target: INTEGRITY_TARGET,
        channel,
        kind = %err.kind(),
        token = %err.token(),
        "payload rejected"
    );
    err
}
