//! Composition of the map program from a template definition

use tracing::debug;

use crate::config::{Configuration, ConfigurationError};
use crate::entity::Entity;

use super::definition::TemplateDefinition;
use super::segment::{MapId, Region, Segment, Slot};

/// One emitted stretch of the composed program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Literal(String),
    Value {
        slot: Slot,
        /// Item index within the region, if emitted inside one
        item: Option<usize>,
        text: String,
    },
}

impl Piece {
    pub fn text(&self) -> &str {
        match self {
            Piece::Literal(text) => text,
            Piece::Value { text, .. } => text,
        }
    }
}

/// Region texts as they appear inside the composed program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTexts {
    pub pins: String,
    pub lightbox: String,
    pub captions: String,
}

impl RegionTexts {
    pub fn get(&self, region: Region) -> &str {
        match region {
            Region::Pins => &self.pins,
            Region::Lightbox => &self.lightbox,
            Region::Captions => &self.captions,
        }
    }

    fn get_mut(&mut self, region: Region) -> &mut String {
        match region {
            Region::Pins => &mut self.pins,
            Region::Lightbox => &mut self.lightbox,
            Region::Captions => &mut self.captions,
        }
    }
}

/// Output of one composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePayload {
    pub map_id: MapId,
    /// Every literal and value in emission order; concatenated they give `composed`
    pub skeleton: Vec<Piece>,
    pub composed: String,
    /// The program with each region replaced by its hole marker
    pub template: String,
    pub regions: RegionTexts,
    /// Source positions of the placed entities, in emission order
    pub entities_order: Vec<usize>,
}

impl CodePayload {
    /// Literal pieces of the skeleton, in emission order
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.skeleton.iter().filter_map(|p| match p {
            Piece::Literal(text) => Some(text.as_str()),
            Piece::Value { .. } => None,
        })
    }
}

/// Instantiates a template definition with entities
#[derive(Debug, Clone)]
pub struct TemplateComposer {
    definition: TemplateDefinition,
    map_id: MapId,
    placed_only: bool,
}

impl TemplateComposer {
    pub fn new(config: &Configuration, map_id: MapId) -> Result<Self, ConfigurationError> {
        Ok(Self::from_definition(
            TemplateDefinition::for_config(config)?,
            map_id,
        ))
    }

    pub fn from_definition(definition: TemplateDefinition, map_id: MapId) -> Self {
        Self {
            definition,
            map_id,
            placed_only: true,
        }
    }

    /// Also emit entities without a position
    ///
    /// Gallery viewer snippets list every image, placed on the map or not.
    pub fn with_unplaced(mut self) -> Self {
        self.placed_only = false;
        self
    }

    pub fn definition(&self) -> &TemplateDefinition {
        &self.definition
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    /// Compose the program for `entities`
    ///
    /// Entities without a position are skipped unless [`with_unplaced`] was
    /// set; indices count emitted entities only, so pin `n` and viewer item
    /// `n` refer to the same entity.
    ///
    /// [`with_unplaced`]: TemplateComposer::with_unplaced
    pub fn compose(&self, entities: &[Entity]) -> CodePayload {
        let placed: Vec<(usize, &Entity)> = entities
            .iter()
            .enumerate()
            .filter(|(_, e)| !self.placed_only || e.is_placed())
            .collect();
        if placed.len() < entities.len() {
            debug!(
                skipped = entities.len() - placed.len(),
                "entities without GPS are not placed"
            );
        }

        let mut out = Emitter::default();
        for segment in &self.definition.program {
            match segment {
                Segment::Literal(text) => out.literal(text, None),
                Segment::Slot(slot) => out.value(*slot, self.map_id, None, None),
                Segment::Region(region) => {
                    out.template.push_str(region.marker());
                    self.expand(&mut out, *region, &placed);
                }
            }
        }

        debug!(
            map_id = %self.map_id,
            pieces = out.skeleton.len(),
            bytes = out.composed.len(),
            "composed map program"
        );
        CodePayload {
            map_id: self.map_id,
            skeleton: out.skeleton,
            composed: out.composed,
            template: out.template,
            regions: out.regions,
            entities_order: placed.iter().map(|(source, _)| *source).collect(),
        }
    }

    fn expand(&self, out: &mut Emitter, region: Region, placed: &[(usize, &Entity)]) {
        let template = self.definition.region(region);
        for (index, (_, entity)) in placed.iter().enumerate() {
            if index > 0 {
                if let Some(separator) = &template.separator {
                    out.literal(separator, Some(region));
                }
            }
            for segment in &template.item {
                match segment {
                    Segment::Literal(text) => out.literal(text, Some(region)),
                    Segment::Slot(slot) => {
                        out.value(*slot, self.map_id, Some((index, *entity)), Some(region))
                    }
                    // regions do not nest
                    Segment::Region(_) => {}
                }
            }
        }
    }
}

#[derive(Default)]
struct Emitter {
    skeleton: Vec<Piece>,
    composed: String,
    template: String,
    regions: RegionTexts,
}

impl Emitter {
    fn literal(&mut self, text: &str, region: Option<Region>) {
        self.push(text, region);
        self.skeleton.push(Piece::Literal(text.to_string()));
    }

    fn value(
        &mut self,
        slot: Slot,
        map_id: MapId,
        item: Option<(usize, &Entity)>,
        region: Option<Region>,
    ) {
        let text = slot.render(map_id, item).into_owned();
        self.push(&text, region);
        self.skeleton.push(Piece::Value {
            slot,
            item: item.map(|(index, _)| index),
            text,
        });
    }

    fn push(&mut self, text: &str, region: Option<Region>) {
        self.composed.push_str(text);
        match region {
            Some(region) => self.regions.get_mut(region).push_str(text),
            None => self.template.push_str(text),
        }
    }
}

/// Compose the map program for `entities` under `config`
pub fn compose(
    entities: &[Entity],
    config: &Configuration,
    map_id: MapId,
) -> Result<CodePayload, ConfigurationError> {
    Ok(TemplateComposer::new(config, map_id)?.compose(entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Lightbox, PinMode};
    use crate::template::segment::Field;
    use pretty_assertions::assert_eq;

    fn lake() -> Entity {
        Entity::new(5, 46.45, 6.5)
            .with_title("Lake")
            .with_description("Blue water")
    }

    #[test]
    fn test_skeleton_concatenates_to_composed() {
        let config = Configuration::default().with_lightbox(Lightbox::Infobox);
        let payload = compose(&[lake(), lake()], &config, MapId::new(7)).unwrap();
        let joined: String = payload.skeleton.iter().map(Piece::text).collect();
        assert_eq!(joined, payload.composed);
    }

    #[test]
    fn test_template_plus_regions_is_composed() {
        let payload = compose(&[lake()], &Configuration::default(), MapId::new(7)).unwrap();
        let mut filled = payload.template.clone();
        for region in Region::ALL {
            filled = filled.replacen(region.marker(), payload.regions.get(region), 1);
        }
        assert_eq!(filled, payload.composed);
        assert!(!payload.template.contains("Lake"));
    }

    #[test]
    fn test_indices_are_sequential() {
        let config = Configuration::default().with_pin_mode(PinMode::Pushpin);
        let payload = compose(&[lake(), lake(), lake()], &config, MapId::new(1)).unwrap();
        assert!(payload.composed.contains("var pin_0 = geo2_thumbnail_1("));
        assert!(payload.composed.contains("var pin_2 = geo2_thumbnail_1("));
        assert!(!payload.composed.contains("pin_3"));
    }

    #[test]
    fn test_unplaced_entities_are_skipped() {
        let mut hidden = lake();
        hidden.gps = None;
        let payload = compose(&[hidden, lake()], &Configuration::default(), MapId::new(3)).unwrap();
        assert_eq!(payload.entities_order, vec![1]);
        assert!(payload.composed.contains("var loc_0 ="));
        assert!(!payload.composed.contains("var loc_1 ="));
    }

    #[test]
    fn test_values_record_their_item() {
        let payload = compose(&[lake(), lake()], &Configuration::default(), MapId::new(3)).unwrap();
        let titles: Vec<Option<usize>> = payload
            .skeleton
            .iter()
            .filter_map(|p| match p {
                Piece::Value {
                    slot: Slot::Field(Field::Title),
                    item,
                    ..
                } => Some(*item),
                _ => None,
            })
            .collect();
        assert!(titles.contains(&Some(0)));
        assert!(titles.contains(&Some(1)));
        assert!(titles.iter().all(|i| i.is_some()));
    }

    #[test]
    fn test_no_entities_leaves_regions_empty() {
        let payload = compose(&[], &Configuration::default(), MapId::new(9)).unwrap();
        assert_eq!(payload.regions, RegionTexts::default());
        assert!(payload.composed.contains("function geo2Map_9() {"));
    }

    #[test]
    fn test_data_is_not_escaped() {
        let entity = lake().with_description("<script>alert(1)</script>");
        let config = Configuration::default().with_lightbox(Lightbox::Infobox);
        let payload = compose(&[entity], &config, MapId::new(3)).unwrap();
        assert!(payload.composed.contains("<script>alert(1)</script>"));
    }
}
