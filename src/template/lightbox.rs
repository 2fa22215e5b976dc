//! Worldmap lightbox snippet
//!
//! In worldmap mode a click on a gallery pin asks for a small script that
//! opens the gallery viewer over that gallery's images. The snippet has a
//! fixed wrapper per engine, so the consumer checks it with fixed regexes
//! instead of a fragment catalog.

use crate::config::{Configuration, ConfigurationError, Lightbox};
use crate::entity::Entity;

use super::composer::{CodePayload, TemplateComposer};
use super::definition::{lightbox_item, slimbox_options, RegionTemplate, TemplateDefinition};
use super::segment::{MapId, Region, SegmentBuilder};

/// Name of the self-invoking function in a lightbox snippet
pub fn snippet_function(map_id: impl std::fmt::Display) -> String {
    format!("geo2_maps_lightbox_{}", map_id)
}

/// Template of the lightbox snippet for the configured engine
pub fn snippet_definition(config: &Configuration) -> Result<TemplateDefinition, ConfigurationError> {
    config.validate()?;
    let (head, tail) = match config.lightbox {
        Lightbox::Slimbox2 => (
            "jQuery.slimbox( [".to_string(),
            format!("], 0, {{ {} }} );", slimbox_options(config)),
        ),
        Lightbox::Fancybox => (
            "$.fancybox( [".to_string(),
            "], { cyclic: true, type: \"image\", index: 0 } );".to_string(),
        ),
        Lightbox::Fancybox3 => (
            "jQuery.fancybox3.open( [".to_string(),
            "], { loop: true }, 0 );".to_string(),
        ),
        Lightbox::Infobox | Lightbox::None => {
            return Err(ConfigurationError::Unsupported {
                channel: "lightbox channel",
                lightbox: config.lightbox,
            })
        }
    };

    let mut b = SegmentBuilder::new();
    b.lit(&format!("function {}", snippet_function("")))
        .map_id()
        .lit("( imageSrc ) {")
        .line(1, "( function( $ ) {")
        .line(2, &head)
        .region(Region::Lightbox)
        .lit(&tail)
        .line(1, "} )( jQuery );")
        .line(0, "}")
        .line(0, &snippet_function(""))
        .map_id()
        .lit("( \"\" );")
        .lit("\n");

    Ok(TemplateDefinition {
        program: b.build(),
        pins: RegionTemplate::default(),
        lightbox: RegionTemplate {
            item: lightbox_item(config.lightbox),
            separator: None,
        },
        captions: RegionTemplate::default(),
    })
}

/// Compose the lightbox snippet over every image of `entities`
pub fn compose_snippet(
    entities: &[Entity],
    config: &Configuration,
    map_id: MapId,
) -> Result<CodePayload, ConfigurationError> {
    let definition = snippet_definition(config)?;
    Ok(TemplateComposer::from_definition(definition, map_id)
        .with_unplaced()
        .compose(entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CounterText;
    use insta::assert_snapshot;

    fn photo() -> Entity {
        let mut entity = Entity::default()
            .with_title("Dune")
            .with_images("https://example.com/dune.jpg", "https://example.com/dune-t.jpg");
        entity.id = 3;
        entity
    }

    #[test]
    fn test_slimbox_snippet() {
        let mut config = Configuration::default().with_lightbox(Lightbox::Slimbox2);
        config.slimbox_counter = CounterText::Fraction;
        let payload = compose_snippet(&[photo()], &config, MapId::new(8)).unwrap();
        assert_snapshot!(
            payload.regions.lightbox.trim_end(),
            @r#"["https://example.com/dune.jpg", "Dune"],"#
        );
        assert!(payload
            .composed
            .contains("], 0, { loop: true, counterText: \"{x}/{y}\" } );"));
        assert!(payload.composed.ends_with("geo2_maps_lightbox_8( \"\" );\n"));
    }

    #[test]
    fn test_unplaced_images_are_listed() {
        let config = Configuration::default();
        let payload = compose_snippet(&[photo(), photo()], &config, MapId::new(2)).unwrap();
        assert_eq!(payload.entities_order, vec![0, 1]);
        assert!(payload.composed.starts_with("function geo2_maps_lightbox_2( imageSrc ) {"));
    }

    #[test]
    fn test_infobox_has_no_snippet() {
        let config = Configuration::default().with_lightbox(Lightbox::Infobox);
        assert!(matches!(
            snippet_definition(&config),
            Err(ConfigurationError::Unsupported {
                lightbox: Lightbox::Infobox,
                ..
            })
        ));
    }
}
