//! Building blocks of a template definition
//!
//! A template is a flat sequence of [`Segment`]s. Literal segments are
//! developer-authored code, slots are filled from the request (map id, entity
//! index, entity fields) and regions mark where per-entity items are expanded.

use std::borrow::Cow;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Per-request number that scopes generated identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(u16);

impl MapId {
    pub const MAX: u16 = 999;

    pub fn new(id: u16) -> Self {
        MapId(id)
    }

    /// Pick an id for a fresh request
    pub fn random() -> Self {
        MapId(rand::thread_rng().gen_range(0..=Self::MAX))
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity value that a slot can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    GalleryId,
    AlbumId,
    Latitude,
    Longitude,
    ThumbWidth,
    ThumbHeight,
    Title,
    AltText,
    Description,
    Caption,
    GalleryTitle,
    GalleryDescription,
    Slug,
    PageUrl,
    ImageUrl,
    ThumbUrl,
    ExifCreated,
    ExifCamera,
    ExifLens,
    ExifAperture,
    ExifFocalLength,
    ExifShutterSpeed,
    ExifIso,
}

impl Field {
    /// Numeric fields never produce residue
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Field::Id
                | Field::GalleryId
                | Field::AlbumId
                | Field::Latitude
                | Field::Longitude
                | Field::ThumbWidth
                | Field::ThumbHeight
        )
    }

    /// The entity's value for this field, unescaped
    pub fn value<'e>(&self, entity: &'e Entity) -> Cow<'e, str> {
        let text = |s: &'e String| Cow::Borrowed(s.as_str());
        match self {
            Field::Id => Cow::Owned(entity.id.to_string()),
            Field::GalleryId => Cow::Owned(entity.gallery_id.to_string()),
            Field::AlbumId => entity
                .album_id
                .map(|id| Cow::Owned(id.to_string()))
                .unwrap_or(Cow::Borrowed("")),
            Field::Latitude => entity
                .gps
                .map(|g| Cow::Owned(g.latitude.to_string()))
                .unwrap_or(Cow::Borrowed("")),
            Field::Longitude => entity
                .gps
                .map(|g| Cow::Owned(g.longitude.to_string()))
                .unwrap_or(Cow::Borrowed("")),
            Field::ThumbWidth => Cow::Owned(entity.thumb_width.to_string()),
            Field::ThumbHeight => Cow::Owned(entity.thumb_height.to_string()),
            Field::Title => text(&entity.title),
            Field::AltText => text(&entity.alt_text),
            Field::Description => text(&entity.description),
            Field::Caption => text(&entity.caption),
            Field::GalleryTitle => text(&entity.gallery_title),
            Field::GalleryDescription => text(&entity.gallery_description),
            Field::Slug => text(&entity.slug),
            Field::PageUrl => text(&entity.page_url),
            Field::ImageUrl => text(&entity.image_url),
            Field::ThumbUrl => text(&entity.thumb_url),
            Field::ExifCreated => text(&entity.exif.created),
            Field::ExifCamera => text(&entity.exif.camera),
            Field::ExifLens => text(&entity.exif.lens),
            Field::ExifAperture => text(&entity.exif.aperture),
            Field::ExifFocalLength => text(&entity.exif.focal_length),
            Field::ExifShutterSpeed => text(&entity.exif.shutter_speed),
            Field::ExifIso => text(&entity.exif.iso),
        }
    }
}

/// A hole in the template filled at composition time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    MapId,
    /// Position of the current item within its region
    Index,
    Field(Field),
}

impl Slot {
    /// Text for this slot, given the current item if inside a region
    pub fn render<'e>(&self, map_id: MapId, item: Option<(usize, &'e Entity)>) -> Cow<'e, str> {
        match (self, item) {
            (Slot::MapId, _) => Cow::Owned(map_id.to_string()),
            (Slot::Index, Some((index, _))) => Cow::Owned(index.to_string()),
            (Slot::Field(field), Some((_, entity))) => field.value(entity),
            (Slot::Index, None) | (Slot::Field(_), None) => Cow::Borrowed(""),
        }
    }

    /// Whether this slot carries untrusted text
    pub fn is_data(&self) -> bool {
        match self {
            Slot::MapId | Slot::Index => false,
            Slot::Field(field) => !field.is_numeric(),
        }
    }
}

/// A data-bearing stretch of the program, repeated once per entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Pins,
    Lightbox,
    Captions,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Pins, Region::Lightbox, Region::Captions];

    /// Hole marker standing in for this region in a transmitted skeleton
    pub fn marker(&self) -> &'static str {
        match self {
            Region::Pins => "{geo2_map_data}",
            Region::Lightbox => "{geo2_infobox_data}",
            Region::Captions => "{geo2_pin_desc_data}",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Pins => write!(f, "pins"),
            Region::Lightbox => write!(f, "lightbox"),
            Region::Captions => write!(f, "captions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Slot(Slot),
    Region(Region),
}

/// Accumulate segments with chained calls
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal code; empty text is dropped
    pub fn lit(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.segments.push(Segment::Literal(text.to_string()));
        }
        self
    }

    /// Start a new line indented by `depth` tabs, then append `text`
    pub fn line(&mut self, depth: usize, text: &str) -> &mut Self {
        let indent = format!("\n{}", "\t".repeat(depth));
        self.lit(&indent).lit(text)
    }

    pub fn map_id(&mut self) -> &mut Self {
        self.segments.push(Segment::Slot(Slot::MapId));
        self
    }

    pub fn index(&mut self) -> &mut Self {
        self.segments.push(Segment::Slot(Slot::Index));
        self
    }

    pub fn field(&mut self, field: Field) -> &mut Self {
        self.segments.push(Segment::Slot(Slot::Field(field)));
        self
    }

    pub fn region(&mut self, region: Region) -> &mut Self {
        self.segments.push(Segment::Region(region));
        self
    }

    pub fn append(&mut self, segments: Vec<Segment>) -> &mut Self {
        self.segments.extend(segments);
        self
    }

    pub fn build(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_splits_indent_from_code() {
        let segments = SegmentBuilder::new().line(2, "var loc_").index().build();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("\n\t\t".to_string()),
                Segment::Literal("var loc_".to_string()),
                Segment::Slot(Slot::Index),
            ]
        );
    }

    #[test]
    fn test_empty_literal_is_dropped() {
        let segments = SegmentBuilder::new().lit("").map_id().lit("").build();
        assert_eq!(segments, vec![Segment::Slot(Slot::MapId)]);
    }

    #[test]
    fn test_slot_render() {
        let entity = Entity::new(12, 48.85, 2.35).with_title("Paris");
        let item = Some((3, &entity));
        assert_eq!(Slot::MapId.render(MapId::new(42), item), "42");
        assert_eq!(Slot::Index.render(MapId::new(42), item), "3");
        assert_eq!(Slot::Field(Field::Title).render(MapId::new(42), item), "Paris");
        assert_eq!(Slot::Field(Field::Latitude).render(MapId::new(42), item), "48.85");
        assert_eq!(Slot::Field(Field::Title).render(MapId::new(42), None), "");
    }

    #[test]
    fn test_numeric_fields_are_not_data() {
        assert!(!Slot::Field(Field::Id).is_data());
        assert!(!Slot::Index.is_data());
        assert!(Slot::Field(Field::Description).is_data());
    }

    #[test]
    fn test_random_map_id_in_range() {
        for _ in 0..50 {
            assert!(MapId::random().get() <= MapId::MAX);
        }
    }
}
