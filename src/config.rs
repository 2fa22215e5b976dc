//! Map configuration
//!
//! A [`Configuration`] is the closed set of trusted settings that decides which
//! template the composer emits for a request. It is loaded from TOML (or built
//! with the `with_*` methods) and passed explicitly to every composer, catalog
//! and validator call; nothing reads settings from ambient state.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or checking a configuration
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown value '{value}' for setting '{setting}'")]
    UnknownVariant { setting: &'static str, value: String },
    #[error("invalid value for setting '{setting}': {reason}")]
    Invalid { setting: &'static str, reason: String },
    #[error("{channel} is not available with lightbox '{lightbox}'")]
    Unsupported {
        channel: &'static str,
        lightbox: Lightbox,
    },
}

/// An enumerated setting with a closed set of textual values
pub trait Setting: Copy + Sized + 'static {
    /// Setting name as it appears in the configuration file
    const NAME: &'static str;

    fn variants() -> &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Result<Self, ConfigurationError> {
        let wanted = value.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigurationError::UnknownVariant {
                setting: Self::NAME,
                value: value.to_string(),
            })
    }
}

/// How a placed entity is drawn on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// The entity thumbnail painted onto a canvas marker
    Thumbnail,
    /// The map SDK's native pushpin
    Pushpin,
}

impl Setting for PinMode {
    const NAME: &'static str = "pin_mode";

    fn variants() -> &'static [Self] {
        &[PinMode::Thumbnail, PinMode::Pushpin]
    }

    fn as_str(&self) -> &'static str {
        match self {
            PinMode::Thumbnail => "thumbnail",
            PinMode::Pushpin => "pushpin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbShape {
    Rect,
    Round,
}

impl Setting for ThumbShape {
    const NAME: &'static str = "thumb_shape";

    fn variants() -> &'static [Self] {
        &[ThumbShape::Rect, ThumbShape::Round]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ThumbShape::Rect => "rect",
            ThumbShape::Round => "round",
        }
    }
}

/// Which viewer opens when a pin is clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lightbox {
    Fancybox,
    Fancybox3,
    Slimbox2,
    Infobox,
    None,
}

impl Setting for Lightbox {
    const NAME: &'static str = "lightbox";

    fn variants() -> &'static [Self] {
        &[
            Lightbox::Fancybox,
            Lightbox::Fancybox3,
            Lightbox::Slimbox2,
            Lightbox::Infobox,
            Lightbox::None,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Lightbox::Fancybox => "fancybox",
            Lightbox::Fancybox3 => "fancybox3",
            Lightbox::Slimbox2 => "slimbox2",
            Lightbox::Infobox => "infobox",
            Lightbox::None => "none",
        }
    }
}

impl Lightbox {
    /// Engines that open a gallery viewer rather than a map popup
    pub fn is_gallery_viewer(&self) -> bool {
        matches!(
            self,
            Lightbox::Fancybox | Lightbox::Fancybox3 | Lightbox::Slimbox2
        )
    }
}

impl fmt::Display for Lightbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Placement of fancybox3 captions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPosition {
    No,
    Bottom,
}

impl Setting for CaptionPosition {
    const NAME: &'static str = "fancybox3_caption";

    fn variants() -> &'static [Self] {
        &[CaptionPosition::No, CaptionPosition::Bottom]
    }

    fn as_str(&self) -> &'static str {
        match self {
            CaptionPosition::No => "no",
            CaptionPosition::Bottom => "bottom",
        }
    }
}

/// Counter text shown by slimbox2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterText {
    Image,
    Photo,
    Fraction,
    None,
}

impl Setting for CounterText {
    const NAME: &'static str = "slimbox_counter";

    fn variants() -> &'static [Self] {
        &[
            CounterText::Image,
            CounterText::Photo,
            CounterText::Fraction,
            CounterText::None,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            CounterText::Image => "image",
            CounterText::Photo => "photo",
            CounterText::Fraction => "fraction",
            CounterText::None => "none",
        }
    }
}

impl CounterText {
    /// The counter pattern handed to slimbox, if any
    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            CounterText::Image => Some("Image {x} of {y}"),
            CounterText::Photo => Some("Photo {x} of {y}"),
            CounterText::Fraction => Some("{x}/{y}"),
            CounterText::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapType {
    Aerial,
    Road,
    CanvasDark,
    CanvasLight,
    Grayscale,
    OrdnanceSurvey,
}

impl Setting for MapType {
    const NAME: &'static str = "map_type";

    fn variants() -> &'static [Self] {
        &[
            MapType::Aerial,
            MapType::Road,
            MapType::CanvasDark,
            MapType::CanvasLight,
            MapType::Grayscale,
            MapType::OrdnanceSurvey,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            MapType::Aerial => "aerial",
            MapType::Road => "road",
            MapType::CanvasDark => "canvas_dark",
            MapType::CanvasLight => "canvas_light",
            MapType::Grayscale => "grayscale",
            MapType::OrdnanceSurvey => "ordnance_survey",
        }
    }
}

impl MapType {
    /// Member name of the SDK's map type enumeration
    pub fn sdk_name(&self) -> &'static str {
        match self {
            MapType::Aerial => "aerial",
            MapType::Road => "road",
            MapType::CanvasDark => "canvasDark",
            MapType::CanvasLight => "canvasLight",
            MapType::Grayscale => "grayscale",
            MapType::OrdnanceSurvey => "ordnanceSurvey",
        }
    }
}

/// Size of canvas thumbnail pins, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbSize {
    pub width: u32,
    pub height: u32,
    /// Clip radius used by round thumbnails
    pub radius: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinColors {
    pub pin: String,
    pub gallery: String,
    pub album: String,
}

/// A GeoXml route drawn underneath the pins
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    pub xml_url: String,
    pub color: String,
    pub width: u32,
}

/// Trusted settings for one map request
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub pin_mode: PinMode,
    pub thumb_shape: ThumbShape,
    pub thumb: ThumbSize,
    pub lightbox: Lightbox,
    pub fancybox3_caption: CaptionPosition,
    pub slimbox_counter: CounterText,
    pub map_type: MapType,
    /// Map SDK credentials key
    pub credentials: String,
    pub zoom: u32,
    /// Entities are galleries and albums rather than pictures
    pub worldmap: bool,
    /// In worldmap mode, clicking a pin opens the gallery lightbox
    pub open_lightbox: bool,
    pub infobox_title_over: bool,
    pub gallery_title: bool,
    pub exif: bool,
    pub gps: bool,
    /// CSS width for the infobox; `None` leaves a runtime marker
    pub infobox_width: Option<String>,
    /// CSS height for the infobox; `None` leaves a runtime marker
    pub infobox_height: Option<String>,
    pub colors: PinColors,
    pub route: Option<RouteOverlay>,
}

/// TOML structure for deserializing configurations
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfiguration {
    pin_mode: String,
    thumb_shape: String,
    lightbox: String,
    fancybox3_caption: String,
    slimbox_counter: String,
    map_type: String,
    #[serde(default)]
    credentials: String,
    zoom: u32,
    #[serde(default)]
    worldmap: bool,
    #[serde(default)]
    open_lightbox: bool,
    #[serde(default)]
    infobox_title_over: bool,
    #[serde(default)]
    gallery_title: bool,
    #[serde(default)]
    exif: bool,
    #[serde(default)]
    gps: bool,
    infobox_width: Option<String>,
    infobox_height: Option<String>,
    thumb: TomlThumb,
    colors: TomlColors,
    route: Option<TomlRoute>,
}

#[derive(Deserialize)]
struct TomlThumb {
    width: u32,
    height: u32,
    radius: u32,
}

#[derive(Deserialize)]
struct TomlColors {
    pin: String,
    gallery: String,
    album: String,
}

#[derive(Deserialize)]
struct TomlRoute {
    xml_url: String,
    #[serde(default = "default_route_color")]
    color: String,
    #[serde(default = "default_route_width")]
    width: u32,
}

fn default_route_color() -> String {
    "#0000ff".to_string()
}

fn default_route_width() -> u32 {
    3
}

/// Settings used when the site has not changed anything
const DEFAULT_CONFIGURATION: &str = r##"
pin_mode = "thumbnail"
thumb_shape = "round"
lightbox = "fancybox3"
fancybox3_caption = "no"
slimbox_counter = "image"
map_type = "aerial"
credentials = ""
zoom = 10
gallery_title = true

[thumb]
width = 100
height = 100
radius = 50

[colors]
pin = "#e81123"
gallery = "#0078d7"
album = "#2a9d8f"
"##;

/// Treat blank dimension overrides as absent
fn dimension(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Configuration {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Check settings that the type system cannot rule out
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.thumb.width == 0 || self.thumb.height == 0 {
            return Err(ConfigurationError::Invalid {
                setting: "thumb",
                reason: format!(
                    "thumbnail size {}x{} has a zero dimension",
                    self.thumb.width, self.thumb.height
                ),
            });
        }
        if self.zoom == 0 || self.zoom > 20 {
            return Err(ConfigurationError::Invalid {
                setting: "zoom",
                reason: format!("{} is outside 1..=20", self.zoom),
            });
        }
        if let Some(route) = &self.route {
            if route.xml_url.trim().is_empty() {
                return Err(ConfigurationError::Invalid {
                    setting: "route.xml_url",
                    reason: "route mode needs a GeoXml URL".to_string(),
                });
            }
            if route.width == 0 {
                return Err(ConfigurationError::Invalid {
                    setting: "route.width",
                    reason: "route line width must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Pins carry infobox markup
    pub fn uses_infobox(&self) -> bool {
        self.lightbox == Lightbox::Infobox || self.route.is_some()
    }

    /// fancybox3 bottom captions are shipped as separate records
    pub fn uses_caption_records(&self) -> bool {
        !self.worldmap
            && self.lightbox == Lightbox::Fancybox3
            && self.fancybox3_caption == CaptionPosition::Bottom
    }

    /// Set the pin rendering mode
    pub fn with_pin_mode(mut self, pin_mode: PinMode) -> Self {
        self.pin_mode = pin_mode;
        self
    }

    /// Set the lightbox engine
    pub fn with_lightbox(mut self, lightbox: Lightbox) -> Self {
        self.lightbox = lightbox;
        self
    }

    pub fn with_fancybox3_caption(mut self, position: CaptionPosition) -> Self {
        self.fancybox3_caption = position;
        self
    }

    pub fn with_thumb_shape(mut self, shape: ThumbShape) -> Self {
        self.thumb_shape = shape;
        self
    }

    /// Switch to worldmap mode
    pub fn with_worldmap(mut self, worldmap: bool, open_lightbox: bool) -> Self {
        self.worldmap = worldmap;
        self.open_lightbox = open_lightbox;
        self
    }

    /// Set explicit infobox dimensions
    pub fn with_infobox_size(mut self, width: Option<&str>, height: Option<&str>) -> Self {
        self.infobox_width = dimension(width.map(str::to_string));
        self.infobox_height = dimension(height.map(str::to_string));
        self
    }

    pub fn with_infobox_title_over(mut self, title_over: bool) -> Self {
        self.infobox_title_over = title_over;
        self
    }

    /// Toggle the EXIF and GPS blocks in the infobox
    pub fn with_details(mut self, exif: bool, gps: bool) -> Self {
        self.exif = exif;
        self.gps = gps;
        self
    }

    pub fn with_route(mut self, route: Option<RouteOverlay>) -> Self {
        self.route = route;
        self
    }

    pub fn with_credentials(mut self, credentials: &str) -> Self {
        self.credentials = credentials.to_string();
        self
    }
}

impl FromStr for Configuration {
    type Err = ConfigurationError;

    /// Load configuration from TOML string
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlConfiguration = toml::from_str(content)?;

        Ok(Configuration {
            pin_mode: PinMode::parse(&parsed.pin_mode)?,
            thumb_shape: ThumbShape::parse(&parsed.thumb_shape)?,
            thumb: ThumbSize {
                width: parsed.thumb.width,
                height: parsed.thumb.height,
                radius: parsed.thumb.radius,
            },
            lightbox: Lightbox::parse(&parsed.lightbox)?,
            fancybox3_caption: CaptionPosition::parse(&parsed.fancybox3_caption)?,
            slimbox_counter: CounterText::parse(&parsed.slimbox_counter)?,
            map_type: MapType::parse(&parsed.map_type)?,
            credentials: parsed.credentials,
            zoom: parsed.zoom,
            worldmap: parsed.worldmap,
            open_lightbox: parsed.open_lightbox,
            infobox_title_over: parsed.infobox_title_over,
            gallery_title: parsed.gallery_title,
            exif: parsed.exif,
            gps: parsed.gps,
            infobox_width: dimension(parsed.infobox_width),
            infobox_height: dimension(parsed.infobox_height),
            colors: PinColors {
                pin: parsed.colors.pin,
                gallery: parsed.colors.gallery,
                album: parsed.colors.album,
            },
            route: parsed.route.map(|r| RouteOverlay {
                xml_url: r.xml_url,
                color: r.color,
                width: r.width,
            }),
        })
    }
}

impl Default for Configuration {
    fn default() -> Self {
        DEFAULT_CONFIGURATION
            .parse()
            .expect("Default configuration should be valid TOML")
    }
}
