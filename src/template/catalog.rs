//! Fragment catalog derived from a template definition
//!
//! The catalog lists every literal the composer can emit for a configuration.
//! It is read straight off the [`TemplateDefinition`], never maintained by hand.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::{Configuration, ConfigurationError};

use super::composer::CodePayload;
use super::definition::TemplateDefinition;
use super::segment::{Region, Segment};

/// Wire marker that opens the lightbox section of an approved list
pub const LIGHTBOX_MARKER: &str = "{lbox}";
/// Wire marker that opens the caption section of an approved list
pub const CAPTIONS_MARKER: &str = "{pic_desc}";

/// The composer emitted a literal the catalog does not list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("composer emitted literal {literal:?} that the fragment catalog does not list")]
pub struct CatalogDriftError {
    pub literal: String,
}

/// Approved fragments per transmitted region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovedFragmentList {
    pub pins: Vec<String>,
    pub lightbox: Vec<String>,
    pub captions: Vec<String>,
}

impl ApprovedFragmentList {
    pub fn section(&self, region: Region) -> &[String] {
        match region {
            Region::Pins => &self.pins,
            Region::Lightbox => &self.lightbox,
            Region::Captions => &self.captions,
        }
    }

    /// Flatten to the wire list: pins, `{lbox}`, lightbox, `{pic_desc}`, captions
    pub fn to_wire(&self) -> Vec<String> {
        let mut list = self.pins.clone();
        list.push(LIGHTBOX_MARKER.to_string());
        list.extend(self.lightbox.iter().cloned());
        list.push(CAPTIONS_MARKER.to_string());
        list.extend(self.captions.iter().cloned());
        list
    }

    /// Split a wire list at its section markers
    ///
    /// Returns `None` unless each marker appears exactly once and in order.
    pub fn from_wire(list: Vec<String>) -> Option<Self> {
        let lbox = list.iter().position(|f| f == LIGHTBOX_MARKER)?;
        let pic_desc = list.iter().position(|f| f == CAPTIONS_MARKER)?;
        if pic_desc < lbox {
            return None;
        }
        let mut rest = list.into_iter();
        let pins: Vec<String> = rest.by_ref().take(lbox).collect();
        rest.next();
        let lightbox: Vec<String> = rest.by_ref().take(pic_desc - lbox - 1).collect();
        rest.next();
        let captions: Vec<String> = rest.collect();

        let markers = [LIGHTBOX_MARKER, CAPTIONS_MARKER];
        let repeated = lightbox
            .iter()
            .chain(captions.iter())
            .any(|f| markers.contains(&f.as_str()));
        if repeated {
            return None;
        }
        Some(ApprovedFragmentList {
            pins,
            lightbox,
            captions,
        })
    }
}

/// Every literal the composer can emit for one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentCatalog {
    fragments: Vec<String>,
    approved: ApprovedFragmentList,
}

impl FragmentCatalog {
    pub fn new(config: &Configuration) -> Result<Self, ConfigurationError> {
        Ok(Self::from_definition(&TemplateDefinition::for_config(
            config,
        )?))
    }

    pub fn from_definition(definition: &TemplateDefinition) -> Self {
        let mut emitted: Vec<&str> = Vec::new();
        for segment in &definition.program {
            match segment {
                Segment::Literal(text) => emitted.push(text),
                Segment::Region(region) => emitted.extend(definition.region(*region).literals()),
                Segment::Slot(_) => {}
            }
        }
        let section = |region: Region| ordered(definition.region(region).literals());

        FragmentCatalog {
            fragments: ordered(emitted),
            approved: ApprovedFragmentList {
                pins: section(Region::Pins),
                lightbox: section(Region::Lightbox),
                captions: section(Region::Captions),
            },
        }
    }

    /// All fragments of the composed program, in removal order
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Fragments per region, for validating a transmitted body
    pub fn approved(&self) -> &ApprovedFragmentList {
        &self.approved
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.fragments.iter().any(|f| f == literal)
    }

    /// Check that every literal in `payload` is catalogued
    pub fn verify(&self, payload: &CodePayload) -> Result<(), CatalogDriftError> {
        let known: HashSet<&str> = self.fragments.iter().map(String::as_str).collect();
        match payload.literals().find(|literal| !known.contains(literal)) {
            Some(literal) => Err(CatalogDriftError {
                literal: literal.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Deduplicate in first-emission order, then move each fragment ahead of any
/// shorter fragment it contains. Stripping the shorter one first would split
/// the longer one and leave structural residue.
fn ordered<'a>(literals: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result: Vec<String> = Vec::new();
    for literal in literals {
        if literal.is_empty() || !seen.insert(literal) {
            continue;
        }
        match result.iter().position(|f| literal.contains(f.as_str())) {
            Some(index) => result.insert(index, literal.to_string()),
            None => result.push(literal.to_string()),
        }
    }
    result
}
