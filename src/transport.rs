//! Wire exchange between the composing process and the consuming runtime
//!
//! The skeleton and the approved fragment list travel base64-encoded inside a
//! JSON record, so code punctuation in either can never collide with the
//! record's own delimiters. The data-bearing region texts travel in `body`.

use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::template::{ApprovedFragmentList, CodePayload, FragmentCatalog, MapId, Region};

/// Delimiter between the three body sections
pub const BODY_SPLIT: &str = "{split}";

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{geo2_(?:map|infobox|pin_desc)_data\}").unwrap());

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid base64 in exchange: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("exchange field is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON in exchange: {0}")]
    Json(#[from] serde_json::Error),
    #[error("approved fragment list is missing its section markers")]
    MalformedApprovedList,
    #[error("response body has {parts} sections, expected 3")]
    MalformedBody { parts: usize },
    #[error("caption records are not a list of string-valued objects")]
    MalformedCaptions,
}

/// One request's payload as it crosses the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub map_id: MapId,
    /// base64 program text with region hole markers
    pub skeleton: String,
    /// base64 JSON list of approved fragments
    pub approved: String,
    /// pins `{split}` lightbox items `{split}` caption records
    pub body: String,
}

/// Body split into its region texts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseBody<'a> {
    pub pins: &'a str,
    pub lightbox: &'a str,
    pub captions: &'a str,
}

impl ResponseBody<'_> {
    pub fn get(&self, region: Region) -> &str {
        match region {
            Region::Pins => self.pins,
            Region::Lightbox => self.lightbox,
            Region::Captions => self.captions,
        }
    }
}

/// Decoded form of an [`Exchange`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub map_id: MapId,
    pub skeleton: String,
    pub approved: ApprovedFragmentList,
}

impl Exchange {
    /// Package a composed payload with the catalog it was composed against
    pub fn encode(payload: &CodePayload, catalog: &FragmentCatalog) -> Result<Self, TransportError> {
        let approved = serde_json::to_string(&catalog.approved().to_wire())?;
        let body = [
            payload.regions.pins.as_str(),
            payload.regions.lightbox.as_str(),
            payload.regions.captions.as_str(),
        ]
        .join(BODY_SPLIT);
        debug!(
            map_id = %payload.map_id,
            skeleton = payload.template.len(),
            body = body.len(),
            "encoded exchange"
        );
        Ok(Exchange {
            map_id: payload.map_id,
            skeleton: BASE64.encode(&payload.template),
            approved: BASE64.encode(approved),
            body,
        })
    }

    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Decode skeleton and approved list
    pub fn decode(&self) -> Result<Received, TransportError> {
        let skeleton = String::from_utf8(BASE64.decode(&self.skeleton)?)?;
        let list: Vec<String> =
            serde_json::from_str(&String::from_utf8(BASE64.decode(&self.approved)?)?)?;
        let approved =
            ApprovedFragmentList::from_wire(list).ok_or(TransportError::MalformedApprovedList)?;
        Ok(Received {
            map_id: self.map_id,
            skeleton,
            approved,
        })
    }

    /// Split the body at [`BODY_SPLIT`]
    pub fn body(&self) -> Result<ResponseBody<'_>, TransportError> {
        let parts: Vec<&str> = self.body.split(BODY_SPLIT).collect();
        match parts.as_slice() {
            &[pins, lightbox, captions] => Ok(ResponseBody {
                pins,
                lightbox,
                captions,
            }),
            _ => Err(TransportError::MalformedBody { parts: parts.len() }),
        }
    }
}

/// Flatten caption records to one `id text` line per record
pub fn flatten_captions(records: &str) -> Result<String, TransportError> {
    if records.trim().is_empty() {
        return Ok(String::new());
    }
    let parsed: Vec<Map<String, Value>> = serde_json::from_str(&format!("[{}]", records))
        .map_err(|_| TransportError::MalformedCaptions)?;
    let mut lines = Vec::new();
    for record in &parsed {
        for (key, value) in record {
            let Value::String(text) = value else {
                return Err(TransportError::MalformedCaptions);
            };
            lines.push(format!("{} {}", key, text));
        }
    }
    Ok(lines.join("\n"))
}

/// Put each region text into its hole in the skeleton
///
/// Markers are located in the skeleton alone, so a marker inside region text
/// is never substituted.
pub fn fill(skeleton: &str, body: &ResponseBody<'_>) -> String {
    let mut filled = String::with_capacity(skeleton.len() + body.pins.len() + body.lightbox.len());
    let mut last = 0;
    for hole in MARKER_RE.find_iter(skeleton) {
        filled.push_str(&skeleton[last..hole.start()]);
        let region = Region::ALL
            .into_iter()
            .find(|region| region.marker() == hole.as_str());
        match region {
            Some(region) => filled.push_str(body.get(region)),
            None => filled.push_str(hole.as_str()),
        }
        last = hole.end();
    }
    filled.push_str(&skeleton[last..]);
    filled
}
