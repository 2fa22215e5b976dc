//! Template definitions per configuration
//!
//! [`TemplateDefinition::for_config`] is the only place that decides what the
//! map program looks like. The composer instantiates it and the fragment
//! catalog reads its literals, so the two always agree.

use crate::config::{Configuration, ConfigurationError, Lightbox, PinMode, ThumbShape};

use super::infobox;
use super::segment::{Field, Region, Segment, SegmentBuilder};

/// Items repeated once per placed entity inside a region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTemplate {
    pub item: Vec<Segment>,
    /// Emitted between consecutive items
    pub separator: Option<String>,
}

impl RegionTemplate {
    fn new(item: Vec<Segment>) -> Self {
        RegionTemplate {
            item,
            separator: None,
        }
    }

    fn separated(item: Vec<Segment>, separator: &str) -> Self {
        RegionTemplate {
            item,
            separator: Some(separator.to_string()),
        }
    }

    /// Literal texts in the order an expansion emits them
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        let items = self.item.iter().filter_map(|s| match s {
            Segment::Literal(text) => Some(text.as_str()),
            _ => None,
        });
        items.chain(self.separator.as_deref())
    }
}

/// Program and region templates for one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDefinition {
    /// Top-level segments, with one `Segment::Region` per data-bearing region
    pub program: Vec<Segment>,
    pub pins: RegionTemplate,
    pub lightbox: RegionTemplate,
    pub captions: RegionTemplate,
}

impl TemplateDefinition {
    /// Build the map program definition for `config`
    pub fn for_config(config: &Configuration) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let lightbox = if gallery_lightbox(config) {
            RegionTemplate::new(lightbox_item(config.lightbox))
        } else {
            RegionTemplate::default()
        };
        let captions = if config.uses_caption_records() {
            RegionTemplate::separated(infobox::caption_record(), ", ")
        } else {
            RegionTemplate::default()
        };

        Ok(TemplateDefinition {
            program: program(config),
            pins: RegionTemplate::new(pin_item(config)),
            lightbox,
            captions,
        })
    }

    pub fn region(&self, region: Region) -> &RegionTemplate {
        match region {
            Region::Pins => &self.pins,
            Region::Lightbox => &self.lightbox,
            Region::Captions => &self.captions,
        }
    }
}

/// Name of the function the consuming runtime calls to draw the map
pub fn entry_point(map_id: impl std::fmt::Display) -> String {
    format!("geo2Map_{}", map_id)
}

/// The per-map gallery viewer is only built outside worldmap mode
fn gallery_lightbox(config: &Configuration) -> bool {
    !config.worldmap && config.lightbox.is_gallery_viewer()
}

fn program(config: &Configuration) -> Vec<Segment> {
    let mut b = SegmentBuilder::new();

    b.lit("var map_")
        .map_id()
        .lit(", layer_")
        .map_id()
        .lit(", hoverLayer_")
        .map_id()
        .lit(", infobox_")
        .map_id()
        .lit(", mapBounds_")
        .map_id()
        .lit(";")
        .line(0, "var pins_")
        .map_id()
        .lit(" = [], locs_")
        .map_id()
        .lit(" = [];");

    entry(&mut b, config);
    show_pins(&mut b);
    hover(&mut b);
    click_handler(&mut b, config);
    thumbnail_function(&mut b, config);
    if config.uses_infobox() {
        infobox_functions(&mut b, config);
    }
    if config.route.is_some() {
        route_functions(&mut b, config);
    }
    if gallery_lightbox(config) {
        lightbox_function(&mut b, config);
    }
    b.lit("\n");
    b.build()
}

fn entry(b: &mut SegmentBuilder, config: &Configuration) {
    b.line(0, &format!("function {}", entry_point("")))
        .map_id()
        .lit("() {")
        .line(1, "map_")
        .map_id()
        .lit(" = new Microsoft.Maps.Map( \"#geo2_maps_map_")
        .map_id()
        .lit("\", {")
        .line(2, &format!("credentials: \"{}\",", config.credentials))
        .line(
            2,
            &format!(
                "mapTypeId: Microsoft.Maps.MapTypeId.{},",
                config.map_type.sdk_name()
            ),
        )
        .line(2, &format!("zoom: {}", config.zoom))
        .line(1, "} );")
        .line(1, "layer_")
        .map_id()
        .lit(" = new Microsoft.Maps.Layer();")
        .line(1, "hoverLayer_")
        .map_id()
        .lit(" = new Microsoft.Maps.Layer();")
        .line(1, "map_")
        .map_id()
        .lit(".layers.insert( layer_")
        .map_id()
        .lit(" );")
        .line(1, "map_")
        .map_id()
        .lit(".layers.insert( hoverLayer_")
        .map_id()
        .lit(" );");

    if config.uses_infobox() {
        b.line(1, "infobox_")
            .map_id()
            .lit(" = new Microsoft.Maps.Infobox( map_")
            .map_id()
            .lit(".getCenter(), { visible: false } );")
            .line(1, "infobox_")
            .map_id()
            .lit(".setMap( map_")
            .map_id()
            .lit(" );");
    }
    if config.route.is_some() {
        b.line(1, "loadRoute_").map_id().lit("();");
    }

    b.line(1, "pins_")
        .map_id()
        .lit(" = [];")
        .line(1, "locs_")
        .map_id()
        .lit(" = [];")
        .region(Region::Pins);

    // Canvas pins arrive asynchronously and show themselves once all loaded
    if config.pin_mode == PinMode::Pushpin {
        b.line(1, "showPins_").map_id().lit("();");
    }
    b.line(0, "}");
}

fn show_pins(b: &mut SegmentBuilder) {
    b.line(0, "function showPins_")
        .map_id()
        .lit("() {")
        .line(1, "if ( pins_")
        .map_id()
        .lit(".length !== locs_")
        .map_id()
        .lit(".length ) {")
        .line(2, "return;")
        .line(1, "}")
        .line(1, "layer_")
        .map_id()
        .lit(".add( pins_")
        .map_id()
        .lit(" );")
        .line(1, "if ( locs_")
        .map_id()
        .lit(".length > 1 ) {")
        .line(2, "mapBounds_")
        .map_id()
        .lit(" = Microsoft.Maps.LocationRect.fromLocations( locs_")
        .map_id()
        .lit(" );")
        .line(2, "map_")
        .map_id()
        .lit(".setView( { bounds: mapBounds_")
        .map_id()
        .lit(", padding: 40 } );")
        .line(1, "} else if ( locs_")
        .map_id()
        .lit(".length === 1 ) {")
        .line(2, "map_")
        .map_id()
        .lit(".setView( { center: locs_")
        .map_id()
        .lit("[0] } );")
        .line(1, "}")
        .line(0, "}");
}

fn hover(b: &mut SegmentBuilder) {
    b.line(0, "function bringForwardOnHover_")
        .map_id()
        .lit("( pin ) {")
        .line(
            1,
            "Microsoft.Maps.Events.addHandler( pin, \"mouseover\", function() {",
        )
        .line(2, "layer_")
        .map_id()
        .lit(".remove( pin );")
        .line(2, "hoverLayer_")
        .map_id()
        .lit(".clear();")
        .line(2, "hoverLayer_")
        .map_id()
        .lit(".add( pin );")
        .line(1, "} );")
        .line(
            1,
            "Microsoft.Maps.Events.addHandler( pin, \"mouseout\", function() {",
        )
        .line(2, "hoverLayer_")
        .map_id()
        .lit(".remove( pin );")
        .line(2, "layer_")
        .map_id()
        .lit(".add( pin );")
        .line(1, "} );")
        .line(0, "}");
}

fn click_handler(b: &mut SegmentBuilder, config: &Configuration) {
    b.line(0, "function pushpinClicked_")
        .map_id()
        .lit("( o ) {");
    if config.worldmap && !config.open_lightbox {
        b.line(1, "window.location = o.target.metadata.pageURL;");
    } else if config.uses_infobox() {
        b.line(1, "showInfobox_").map_id().lit("( o );");
    } else if config.worldmap && config.lightbox.is_gallery_viewer() {
        b.line(1, "geo2_maps_lightbox_ajax( o.target.metadata.gid );");
    } else if gallery_lightbox(config) {
        b.line(1, "geo2_maps_lightbox_")
            .map_id()
            .lit("( o.target.metadata.picture_nr );");
    }
    b.line(0, "}");
}

fn thumbnail_function(b: &mut SegmentBuilder, config: &Configuration) {
    match config.pin_mode {
        PinMode::Pushpin => {
            b.line(0, "function geo2_thumbnail_")
                .map_id()
                .lit("( location, title, caption, aid ) {");
            if config.worldmap {
                b.line(
                    1,
                    &format!(
                        "var color = aid ? \"{}\" : \"{}\";",
                        config.colors.album, config.colors.gallery
                    ),
                );
            } else {
                b.line(1, &format!("var color = \"{}\";", config.colors.pin));
            }
            b.line(
                1,
                "return new Microsoft.Maps.Pushpin( location, { title: title, subTitle: caption, color: color } );",
            )
            .line(0, "}");
        }
        PinMode::Thumbnail => {
            let thumb = config.thumb;
            b.line(0, "function geo2_thumbnail_")
                .map_id()
                .lit("( location, title, pinDesc, caption, url, pid, gid, aid, slug, pageURL, src, pictureNr, callback ) {")
                .line(1, "var img = new Image();")
                .line(1, "img.onload = function() {")
                .line(2, "var c = document.createElement( \"canvas\" );")
                .line(2, &format!("c.width = {};", thumb.width))
                .line(2, &format!("c.height = {};", thumb.height))
                .line(2, "var context = c.getContext( \"2d\" );");
            if config.thumb_shape == ThumbShape::Round {
                b.line(2, "context.beginPath();")
                    .line(
                        2,
                        &format!(
                            "context.arc( {}, {}, {}, 0, 2 * Math.PI );",
                            thumb.width / 2,
                            thumb.height / 2,
                            thumb.radius
                        ),
                    )
                    .line(2, "context.clip();");
            }
            b.line(
                2,
                &format!(
                    "context.drawImage( img, 0, 0, {}, {} );",
                    thumb.width, thumb.height
                ),
            )
            .line(2, "var pin = new Microsoft.Maps.Pushpin( location, {")
            .line(3, "icon: c.toDataURL(),")
            .line(
                3,
                &format!(
                    "anchor: new Microsoft.Maps.Point( {}, {} ),",
                    thumb.width / 2,
                    thumb.height / 2
                ),
            )
            .line(3, "title: title,")
            .line(3, "subTitle: caption")
            .line(2, "} );")
            .line(2, "pin.metadata = {")
            .line(3, "title: title,")
            .line(3, "thumb_width: img.width,")
            .line(3, "thumb_height: img.height,")
            .line(3, "HTMLcontent: pinDesc,")
            .line(3, "pid: pid,")
            .line(3, "gid: gid,")
            .line(3, "aid: aid,")
            .line(3, "slug: slug,")
            .line(3, "pageURL: pageURL,")
            .line(3, "src: src,")
            .line(3, "picture_nr: pictureNr")
            .line(2, "};")
            .line(2, "Microsoft.Maps.Events.addHandler( pin, \"click\", pushpinClicked_")
            .map_id()
            .lit(" );")
            .line(2, "bringForwardOnHover_")
            .map_id()
            .lit("( pin );")
            .line(2, "callback( pin );")
            .line(1, "};")
            .line(1, "img.crossOrigin = \"anonymous\";")
            .line(1, "img.src = url;")
            .line(1, "return img;")
            .line(0, "}");
        }
    }
}

fn infobox_functions(b: &mut SegmentBuilder, config: &Configuration) {
    b.line(0, "function closeInfobox_")
        .map_id()
        .lit("() {")
        .line(1, "infobox_")
        .map_id()
        .lit(".setOptions( { visible: false } );")
        .line(0, "}")
        .line(0, "function showInfobox_")
        .map_id()
        .lit("( o ) {")
        .line(1, "var meta = o.target.metadata;");

    let mut replacements = Vec::new();
    if config.infobox_width.is_none() {
        replacements.push((infobox::MAX_WIDTH_MARKER, "( meta.thumb_width + 20 ) + \"px\""));
    }
    if config.infobox_height.is_none() {
        replacements.push((infobox::MAX_HEIGHT_MARKER, "( meta.thumb_height + 120 ) + \"px\""));
        replacements.push((infobox::MAX_DESC_HEIGHT_MARKER, "meta.thumb_height + \"px\""));
    }
    if config.infobox_title_over {
        replacements.push((infobox::IMG_WIDTH_MARKER, "meta.thumb_width + \"px\""));
    }
    // a single literal, so no fragment can straddle the closing ` )` and `;`
    let mut content = String::from("var content = meta.HTMLcontent");
    for (marker, value) in replacements {
        content.push_str(&format!("\n\t\t.replace( \"{}\", {} )", marker, value));
    }
    content.push(';');

    b.line(1, &content)
        .line(1, "infobox_")
        .map_id()
        .lit(".setOptions( { location: o.target.getLocation(), htmlContent: content, visible: true } );")
        .line(0, "}");
}

fn route_functions(b: &mut SegmentBuilder, config: &Configuration) {
    let Some(route) = &config.route else {
        return;
    };
    b.line(0, "function loadRoute_")
        .map_id()
        .lit("() {")
        .line(
            1,
            "Microsoft.Maps.loadModule( \"Microsoft.Maps.GeoXml\", function() {",
        )
        .line(
            2,
            &format!(
                "Microsoft.Maps.GeoXml.readFromUrl( \"{}\", null, function( data ) {{",
                route.xml_url
            ),
        )
        .line(3, "renderRoute_")
        .map_id()
        .lit("( data );")
        .line(2, "} );")
        .line(1, "} );")
        .line(0, "}")
        .line(0, "function renderRoute_")
        .map_id()
        .lit("( data ) {")
        .line(1, "if ( data.shapes ) {")
        .line(2, "var routeLayer = new Microsoft.Maps.Layer();")
        .line(2, "for ( var i = 0; i < data.shapes.length; i++ ) {")
        .line(3, "if ( data.shapes[i] instanceof Microsoft.Maps.Polyline ) {")
        .line(
            4,
            &format!(
                "data.shapes[i].setOptions( {{ strokeColor: \"{}\", strokeThickness: {} }} );",
                route.color, route.width
            ),
        )
        .line(3, "}")
        .line(2, "}")
        .line(2, "routeLayer.add( data.shapes );")
        .line(2, "map_")
        .map_id()
        .lit(".layers.insert( routeLayer );")
        .line(1, "}")
        .line(1, "if ( data.summary && data.summary.bounds ) {")
        .line(2, "mapBounds_")
        .map_id()
        .lit(" = mapBounds_")
        .map_id()
        .lit(" ? Microsoft.Maps.LocationRect.merge( mapBounds_")
        .map_id()
        .lit(", data.summary.bounds ) : data.summary.bounds;")
        .line(2, "map_")
        .map_id()
        .lit(".setView( { bounds: mapBounds_")
        .map_id()
        .lit(", padding: 40 } );")
        .line(1, "}")
        .line(0, "}");
}

fn lightbox_function(b: &mut SegmentBuilder, config: &Configuration) {
    if config.uses_caption_records() {
        b.line(0, "var pic_desc_")
            .map_id()
            .lit(" = [")
            .region(Region::Captions)
            .lit("];");
    }
    b.line(0, "function geo2_maps_lightbox_")
        .map_id()
        .lit("( indexNr ) {");
    match config.lightbox {
        Lightbox::Slimbox2 => {
            b.line(1, "jQuery.slimbox( [")
                .region(Region::Lightbox)
                .lit(&format!(
                    "], indexNr, {{ {} }} );",
                    slimbox_options(config)
                ));
        }
        Lightbox::Fancybox => {
            b.line(1, "jQuery.fancybox( [")
                .region(Region::Lightbox)
                .lit("], { cyclic: true, type: \"image\", index: indexNr } );");
        }
        Lightbox::Fancybox3 => {
            b.line(1, "jQuery.fancybox3.open( [")
                .region(Region::Lightbox)
                .lit("], { loop: true");
            if config.uses_caption_records() {
                b.lit(", caption: function( instance, item ) { return pic_desc_")
                    .map_id()
                    .lit("[ item.index ][ Object.keys( pic_desc_")
                    .map_id()
                    .lit("[ item.index ] )[0] ]; }");
            }
            b.lit(" }, indexNr );");
        }
        Lightbox::Infobox | Lightbox::None => {}
    }
    b.line(0, "}");
}

/// Option list for slimbox, shared with the worldmap lightbox snippet
pub(crate) fn slimbox_options(config: &Configuration) -> String {
    match config.slimbox_counter.pattern() {
        Some(pattern) => format!("loop: true, counterText: \"{}\"", pattern),
        None => "loop: true".to_string(),
    }
}

/// One viewer item, shared with the worldmap lightbox snippet
pub(crate) fn lightbox_item(engine: Lightbox) -> Vec<Segment> {
    let mut b = SegmentBuilder::new();
    match engine {
        Lightbox::Slimbox2 => {
            b.lit("[\"")
                .field(Field::ImageUrl)
                .lit("\", \"")
                .field(Field::Title)
                .lit("\"], ");
        }
        Lightbox::Fancybox => {
            b.lit("{ href: \"")
                .field(Field::ImageUrl)
                .lit("\", title: \"")
                .field(Field::Title)
                .lit("\" }, ");
        }
        Lightbox::Fancybox3 => {
            b.lit("{ src: \"")
                .field(Field::ImageUrl)
                .lit("\", opts: { caption: \"")
                .field(Field::Title)
                .lit("\", thumb: \"")
                .field(Field::ThumbUrl)
                .lit("\" } }, ");
        }
        Lightbox::Infobox | Lightbox::None => {}
    }
    b.build()
}

fn pin_item(config: &Configuration) -> Vec<Segment> {
    let mut b = SegmentBuilder::new();
    b.line(1, "var loc_")
        .index()
        .lit(" = new Microsoft.Maps.Location( ")
        .field(Field::Latitude)
        .lit(", ")
        .field(Field::Longitude)
        .lit(" );")
        .line(1, "locs_")
        .map_id()
        .lit(".push( loc_")
        .index()
        .lit(" );");

    match config.pin_mode {
        PinMode::Thumbnail => {
            b.line(1, "var pin_")
                .index()
                .lit(" = geo2_thumbnail_")
                .map_id()
                .lit("( loc_")
                .index()
                .lit(", \"")
                .field(Field::Title)
                .lit("\", \"");
            if config.uses_infobox() {
                b.append(infobox::pin_description(config));
            }
            b.lit("\", \"")
                .field(Field::Caption)
                .lit("\", \"")
                .field(Field::ThumbUrl)
                .lit("\", ")
                .field(Field::Id)
                .lit(", ")
                .field(Field::GalleryId)
                .lit(", \"")
                .field(Field::AlbumId)
                .lit("\", \"")
                .field(Field::Slug)
                .lit("\", \"")
                .field(Field::PageUrl)
                .lit("\", \"")
                .field(Field::ImageUrl)
                .lit("\", ")
                .index()
                .lit(", function( pin ) {")
                .line(2, "pins_")
                .map_id()
                .lit(".push( pin );")
                .line(2, "showPins_")
                .map_id()
                .lit("();")
                .line(1, "} );");
        }
        PinMode::Pushpin => {
            b.line(1, "var pin_")
                .index()
                .lit(" = geo2_thumbnail_")
                .map_id()
                .lit("( loc_")
                .index()
                .lit(", \"")
                .field(Field::Title)
                .lit("\", \"")
                .field(Field::Caption)
                .lit("\", \"")
                .field(Field::AlbumId)
                .lit("\" );")
                .line(1, "pin_")
                .index()
                .lit(".metadata = {")
                .line(2, "title: \"")
                .field(Field::Title)
                .lit("\",")
                .line(2, "thumb_width: ")
                .field(Field::ThumbWidth)
                .lit(",")
                .line(2, "thumb_height: ")
                .field(Field::ThumbHeight)
                .lit(",")
                .line(2, "pid: ")
                .field(Field::Id)
                .lit(",")
                .line(2, "gid: ")
                .field(Field::GalleryId)
                .lit(",")
                .line(2, "aid: \"")
                .field(Field::AlbumId)
                .lit("\",")
                .line(2, "slug: \"")
                .field(Field::Slug)
                .lit("\",")
                .line(2, "pageURL: \"")
                .field(Field::PageUrl)
                .lit("\",")
                .line(2, "src: \"")
                .field(Field::ImageUrl)
                .lit("\",");
            if config.uses_infobox() {
                b.line(2, "HTMLcontent: \"")
                    .append(infobox::pin_description(config))
                    .lit("\",");
            }
            b.line(2, "picture_nr: ")
                .index()
                .line(1, "};")
                .line(1, "Microsoft.Maps.Events.addHandler( pin_")
                .index()
                .lit(", \"click\", pushpinClicked_")
                .map_id()
                .lit(" );")
                .line(1, "bringForwardOnHover_")
                .map_id()
                .lit("( pin_")
                .index()
                .lit(" );")
                .line(1, "pin_")
                .index()
                .lit(".setOptions( { enableHoverStyle: true, enableClickedStyle: false } );")
                .line(1, "pins_")
                .map_id()
                .lit(".push( pin_")
                .index()
                .lit(" );");
        }
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CaptionPosition, RouteOverlay};

    fn literal_text(segments: &[Segment]) -> String {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Literal(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn regions(segments: &[Segment]) -> Vec<Region> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Region(region) => Some(*region),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_program_regions() {
        let def = TemplateDefinition::for_config(&Configuration::default()).unwrap();
        assert_eq!(regions(&def.program), vec![Region::Pins, Region::Lightbox]);
        assert!(def.captions.item.is_empty());
        assert!(!def.lightbox.item.is_empty());
    }

    #[test]
    fn test_bottom_captions_add_caption_region() {
        let config = Configuration::default().with_fancybox3_caption(CaptionPosition::Bottom);
        let def = TemplateDefinition::for_config(&config).unwrap();
        assert_eq!(
            regions(&def.program),
            vec![Region::Pins, Region::Captions, Region::Lightbox]
        );
        assert_eq!(def.captions.separator.as_deref(), Some(", "));
    }

    #[test]
    fn test_infobox_has_no_gallery_viewer() {
        let config = Configuration::default().with_lightbox(Lightbox::Infobox);
        let def = TemplateDefinition::for_config(&config).unwrap();
        assert_eq!(regions(&def.program), vec![Region::Pins]);
        let text = literal_text(&def.program);
        assert!(text.contains("function showInfobox_"));
        assert!(!text.contains("geo2_maps_lightbox_"));
        assert!(literal_text(&def.pins.item).contains("<div id='geo2_InfoboxCustom_"));
    }

    #[test]
    fn test_pushpin_items_register_click_handler() {
        let config = Configuration::default().with_pin_mode(PinMode::Pushpin);
        let def = TemplateDefinition::for_config(&config).unwrap();
        let text = literal_text(&def.pins.item);
        assert!(text.contains(".metadata = {"));
        assert!(text.contains("Microsoft.Maps.Events.addHandler( pin_"));
        assert!(!text.contains("HTMLcontent"));
    }

    #[test]
    fn test_route_mode_loads_geoxml() {
        let config = Configuration::default().with_route(Some(RouteOverlay {
            xml_url: "https://example.com/route.kml".to_string(),
            color: "#ff0000".to_string(),
            width: 4,
        }));
        let def = TemplateDefinition::for_config(&config).unwrap();
        let text = literal_text(&def.program);
        assert!(text.contains("readFromUrl( \"https://example.com/route.kml\""));
        assert!(text.contains("strokeThickness: 4"));
        assert!(text.contains("function showInfobox_"));
    }

    #[test]
    fn test_worldmap_click_opens_page() {
        let config = Configuration::default().with_worldmap(true, false);
        let def = TemplateDefinition::for_config(&config).unwrap();
        let text = literal_text(&def.program);
        assert!(text.contains("window.location = o.target.metadata.pageURL;"));
        assert_eq!(regions(&def.program), vec![Region::Pins]);
    }

    #[test]
    fn test_worldmap_click_requests_lightbox() {
        let config = Configuration::default().with_worldmap(true, true);
        let def = TemplateDefinition::for_config(&config).unwrap();
        assert!(literal_text(&def.program).contains("geo2_maps_lightbox_ajax( o.target.metadata.gid );"));
    }

    #[test]
    fn test_invalid_configuration_builds_nothing() {
        let mut config = Configuration::default();
        config.thumb.width = 0;
        assert!(matches!(
            TemplateDefinition::for_config(&config),
            Err(ConfigurationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_entry_point_name() {
        assert_eq!(entry_point(42), "geo2Map_42");
    }
}
