//! Map program templates
//!
//! A [`TemplateDefinition`] describes the program for one configuration as
//! literal code, slots and per-entity regions. Two things are derived from it:
//!
//! - the composed program, by [`TemplateComposer`], which fills slots from
//!   entities and expands regions once per entity
//! - the [`FragmentCatalog`], the list of every literal the program can contain
//!
//! ```text
//! var pin_ {Index} = geo2_thumbnail_ {MapId} ( loc_ {Index} , " {Title} " ...
//! ```

mod catalog;
mod composer;
mod definition;
mod infobox;
mod lightbox;
mod segment;

pub use catalog::{
    ApprovedFragmentList, CatalogDriftError, FragmentCatalog, CAPTIONS_MARKER, LIGHTBOX_MARKER,
};
pub use composer::{compose, CodePayload, Piece, RegionTexts, TemplateComposer};
pub use definition::{entry_point, RegionTemplate, TemplateDefinition};
pub use lightbox::{compose_snippet, snippet_definition, snippet_function};
pub use segment::{Field, MapId, Region, Segment, SegmentBuilder, Slot};
