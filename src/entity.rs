//! Entity records supplied by the gallery store
//!
//! Every string field here is untrusted end-user text. The composer embeds
//! it verbatim between structural literals and leaves rejection to the guard.

use serde::{Deserialize, Serialize};

/// A picture (or, in worldmap mode, a gallery or album) to place on the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    pub id: u64,
    pub gallery_id: u64,
    pub album_id: Option<u64>,
    pub title: String,
    pub alt_text: String,
    pub description: String,
    pub caption: String,
    pub gallery_title: String,
    pub gallery_description: String,
    pub slug: String,
    pub page_url: String,
    pub gps: Option<Gps>,
    pub image_url: String,
    pub thumb_url: String,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub exif: Exif,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gps {
    pub latitude: f64,
    pub longitude: f64,
}

/// Camera metadata as already formatted by the extraction service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exif {
    pub created: String,
    pub camera: String,
    pub lens: String,
    pub aperture: String,
    pub focal_length: String,
    pub shutter_speed: String,
    pub iso: String,
}

impl Entity {
    /// Create an entity with an id and a position
    pub fn new(id: u64, latitude: f64, longitude: f64) -> Self {
        Entity {
            id,
            gps: Some(Gps {
                latitude,
                longitude,
            }),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the full-size and thumbnail image URLs
    pub fn with_images(mut self, image_url: &str, thumb_url: &str) -> Self {
        self.image_url = image_url.to_string();
        self.thumb_url = thumb_url.to_string();
        self
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = caption.to_string();
        self
    }

    /// Only entities with a position get a pin
    pub fn is_placed(&self) -> bool {
        self.gps.is_some()
    }
}

/// Parse an entity list from JSON
pub fn from_json(content: &str) -> Result<Vec<Entity>, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let entities = from_json(r#"[{"id": 7, "title": "Lake"}]"#).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, 7);
        assert_eq!(entities[0].title, "Lake");
        assert!(!entities[0].is_placed());
        assert_eq!(entities[0].exif, Exif::default());
    }

    #[test]
    fn test_gps_makes_entity_placed() {
        let entities = from_json(
            r#"[{"id": 1, "gps": {"latitude": 46.2, "longitude": 6.15}, "exif": {"iso": "200"}}]"#,
        )
        .unwrap();
        assert!(entities[0].is_placed());
        assert_eq!(entities[0].exif.iso, "200");
    }

    #[test]
    fn test_builder() {
        let entity = Entity::new(3, 1.5, -2.0)
            .with_title("Pier")
            .with_images("https://example.com/a.jpg", "https://example.com/t.jpg");
        assert_eq!(entity.gps.map(|g| g.longitude), Some(-2.0));
        assert_eq!(entity.thumb_url, "https://example.com/t.jpg");
    }
}
