//! Per-entity markup carried inside pins and caption records
//!
//! Markup lives inside double-quoted script strings, so attributes use single
//! quotes and no literal contains a line break.

use crate::config::Configuration;

use super::segment::{Field, Segment, SegmentBuilder};

/// Runtime markers the infobox script replaces once the thumbnail size is known
pub const MAX_WIDTH_MARKER: &str = "{maxWidth}";
pub const MAX_HEIGHT_MARKER: &str = "{maxHeight}";
pub const MAX_DESC_HEIGHT_MARKER: &str = "{maxDescHeight}";
pub const IMG_WIDTH_MARKER: &str = "{imgWidth}";

/// Infobox HTML shown when a pin is clicked
pub fn pin_description(config: &Configuration) -> Vec<Segment> {
    let width = config.infobox_width.as_deref().unwrap_or(MAX_WIDTH_MARKER);
    let height = config.infobox_height.as_deref().unwrap_or(MAX_HEIGHT_MARKER);
    let desc_height = config
        .infobox_height
        .as_deref()
        .unwrap_or(MAX_DESC_HEIGHT_MARKER);

    let mut b = SegmentBuilder::new();
    b.lit("<div id='geo2_InfoboxCustom_")
        .field(Field::Id)
        .lit(&format!(
            "' class='geo2_InfoboxCustom' style='max-width: {}; max-height: {};'>",
            width, height
        ))
        .lit("<img class='geo2_infobox_img' src='")
        .field(Field::ThumbUrl)
        .lit("' alt='")
        .field(Field::AltText)
        .lit("' />")
        .lit("<span class='geo2_close' onclick='closeInfobox_")
        .map_id()
        .lit("();'>&times;</span>");

    if config.infobox_title_over {
        b.lit(&format!(
            "<div class='geo2_infobox_title_wrap' style='max-width: {};'><div class='geo2_infobox_title'>",
            IMG_WIDTH_MARKER
        ));
        if config.gallery_title && !config.worldmap {
            heading(&mut b, Field::GalleryTitle);
        }
        bold_line(&mut b, Field::Title);
        b.lit("</div></div>");
        open_description(&mut b, desc_height);
    } else {
        open_description(&mut b, desc_height);
        if config.gallery_title && !config.worldmap {
            heading(&mut b, Field::GalleryTitle);
            b.field(Field::GalleryDescription).lit("<br />");
        }
        bold_line(&mut b, Field::Title);
    }
    b.field(Field::Description).lit("<br />");

    if config.gps {
        b.lit("<div class='geo2_infobox_gps'><b>GPS</b><br />");
        labelled(&mut b, "Latitude", Field::Latitude);
        labelled(&mut b, "Longitude", Field::Longitude);
        b.lit("</div>");
    }

    if config.exif && !config.worldmap {
        b.lit("<div class='geo2_infobox_exif'><b>EXIF</b><br />");
        labelled(&mut b, "Date", Field::ExifCreated);
        labelled(&mut b, "Camera", Field::ExifCamera);
        labelled(&mut b, "Lens", Field::ExifLens);
        labelled(&mut b, "Aperture", Field::ExifAperture);
        labelled(&mut b, "Focal length", Field::ExifFocalLength);
        labelled(&mut b, "Shutter speed", Field::ExifShutterSpeed);
        labelled(&mut b, "ISO", Field::ExifIso);
        b.lit("</div>");
    }

    b.lit("</div></div>");
    b.build()
}

/// One `{ "<id>": "<html>" }` record of the fancybox3 bottom captions
pub fn caption_record() -> Vec<Segment> {
    let mut b = SegmentBuilder::new();
    b.lit("{\"")
        .field(Field::Id)
        .lit("\": \"")
        .lit("<div class='geo2_caption'>");
    bold_line(&mut b, Field::Title);
    b.field(Field::Caption).lit("</div>").lit("\"}");
    b.build()
}

fn open_description(b: &mut SegmentBuilder, height: &str) {
    b.lit(&format!(
        "<div class='geo2_infobox_desc' style='max-height: {};'>",
        height
    ));
}

fn heading(b: &mut SegmentBuilder, field: Field) {
    b.lit("<h3>").lit("<b>").field(field).lit("</b>").lit("</h3>");
}

fn bold_line(b: &mut SegmentBuilder, field: Field) {
    b.lit("<b>").field(field).lit("</b>").lit("<br />");
}

fn labelled(b: &mut SegmentBuilder, label: &str, field: Field) {
    b.lit(&format!("<span class='exif-param'>{}:</span> ", label))
        .field(field)
        .lit("<br />");
}
