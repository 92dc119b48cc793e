use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::lenient;

/// The closed set of block types the editor knows how to build and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Gallery,
    Cta,
    Quote,
    List,
    Divider,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Gallery,
        BlockKind::Cta,
        BlockKind::Quote,
        BlockKind::List,
        BlockKind::Divider,
    ];

    /// Parse the wire name of a block type. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Wire name, as stored in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Gallery => "gallery",
            BlockKind::Cta => "cta",
            BlockKind::Quote => "quote",
            BlockKind::List => "list",
            BlockKind::Divider => "divider",
        }
    }

    /// Display label shown to authors.
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Text => "Text",
            BlockKind::Image => "Image",
            BlockKind::Video => "Video",
            BlockKind::Gallery => "Gallery",
            BlockKind::Cta => "Call to Action",
            BlockKind::Quote => "Quote",
            BlockKind::List => "List",
            BlockKind::Divider => "Divider",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryLayout {
    #[default]
    Grid,
    Masonry,
    Carousel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Default,
    Modern,
    Classic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    Bullet,
    Numbered,
    Checklist,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    Default,
    Minimal,
    Bordered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// `as_str` returning the serialized name, for class names and inline styles.
macro_rules! wire_names {
    ($($ty:ident { $($variant:ident => $name:literal),+ $(,)? })+) => {
        $(
            impl $ty {
                pub fn as_str(&self) -> &'static str {
                    match self {
                        $($ty::$variant => $name),+
                    }
                }
            }
        )+
    };
}

wire_names! {
    Alignment { Left => "left", Center => "center", Right => "right" }
    Size { Small => "small", Medium => "medium", Large => "large" }
    GalleryLayout { Grid => "grid", Masonry => "masonry", Carousel => "carousel" }
    CtaStyle { Primary => "primary", Secondary => "secondary", Outline => "outline" }
    QuoteStyle { Default => "default", Modern => "modern", Classic => "classic" }
    ListType { Bullet => "bullet", Numbered => "numbered", Checklist => "checklist" }
    ListStyle { Default => "default", Minimal => "minimal", Bordered => "bordered" }
    DividerStyle { Solid => "solid", Dashed => "dashed", Dotted => "dotted", Double => "double" }
}

/// Keys a config carries that this crate does not model. They are kept so a
/// load/save cycle never drops them.
pub type Extra = Map<String, Value>;

pub const DEFAULT_GALLERY_COLUMNS: u8 = 3;
pub const DEFAULT_DIVIDER_THICKNESS: u32 = 1;

/// Text blocks keep their payload in `content`; the config is usually empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient::text")]
    pub alt: String,
    #[serde(deserialize_with = "lenient::text")]
    pub caption: String,
    pub alignment: Alignment,
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub video_url: String,
    #[serde(deserialize_with = "autoplay")]
    pub autoplay: bool,
    #[serde(deserialize_with = "controls")]
    pub controls: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub caption: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            video_url: String::new(),
            autoplay: false,
            controls: true,
            caption: String::new(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub url: String,
    #[serde(deserialize_with = "lenient::text")]
    pub alt: String,
    #[serde(deserialize_with = "lenient::text")]
    pub caption: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub images: Vec<GalleryImage>,
    pub layout: GalleryLayout,
    #[serde(deserialize_with = "columns")]
    pub columns: u8,
    pub spacing: Size,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            layout: GalleryLayout::Grid,
            columns: DEFAULT_GALLERY_COLUMNS,
            spacing: Size::Medium,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub button_text: String,
    #[serde(deserialize_with = "lenient::text")]
    pub button_url: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    pub style: CtaStyle,
    pub size: Size,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self {
            button_text: "Learn more".to_string(),
            button_url: "#".to_string(),
            description: String::new(),
            style: CtaStyle::Primary,
            size: Size::Medium,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub quote: String,
    #[serde(deserialize_with = "lenient::text")]
    pub author: String,
    #[serde(deserialize_with = "lenient::text")]
    pub author_title: String,
    pub style: QuoteStyle,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListItem {
    #[serde(deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListConfig {
    pub items: Vec<ListItem>,
    pub list_type: ListType,
    pub style: ListStyle,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            items: vec![ListItem::default()],
            list_type: ListType::Bullet,
            style: ListStyle::Default,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerConfig {
    pub style: DividerStyle,
    #[serde(deserialize_with = "lenient::text")]
    pub color: String,
    #[serde(deserialize_with = "thickness")]
    pub thickness: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            style: DividerStyle::Solid,
            color: "#e5e7eb".to_string(),
            thickness: DEFAULT_DIVIDER_THICKNESS,
            extra: Extra::new(),
        }
    }
}

fn autoplay<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(lenient::flag(deserializer)?.unwrap_or(false))
}

fn controls<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(lenient::flag(deserializer)?.unwrap_or(true))
}

fn columns<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(lenient::number(deserializer)?.unwrap_or(DEFAULT_GALLERY_COLUMNS))
}

fn thickness<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(lenient::number(deserializer)?.unwrap_or(DEFAULT_DIVIDER_THICKNESS))
}

/// Type-specific configuration of a block.
///
/// The variant *is* the block's type: changing the config of a block through
/// [`crate::repository::BlockRepository::update`] replaces the whole value.
/// `Opaque` carries any type this crate does not model, or a known type whose
/// stored config could not be decoded, so that it survives a load/save cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockConfig {
    Text(TextConfig),
    Image(ImageConfig),
    Video(VideoConfig),
    Gallery(GalleryConfig),
    Cta(CtaConfig),
    Quote(QuoteConfig),
    List(ListConfig),
    Divider(DividerConfig),
    Opaque { block_type: String, config: Value },
}

impl BlockConfig {
    /// Default configuration for a freshly added block of `kind`.
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => BlockConfig::Text(TextConfig::default()),
            BlockKind::Image => BlockConfig::Image(ImageConfig::default()),
            BlockKind::Video => BlockConfig::Video(VideoConfig::default()),
            BlockKind::Gallery => BlockConfig::Gallery(GalleryConfig::default()),
            BlockKind::Cta => BlockConfig::Cta(CtaConfig::default()),
            BlockKind::Quote => BlockConfig::Quote(QuoteConfig::default()),
            BlockKind::List => BlockConfig::List(ListConfig::default()),
            BlockKind::Divider => BlockConfig::Divider(DividerConfig::default()),
        }
    }

    /// Build a config from the stored `type` string and raw `config` value.
    ///
    /// Never fails: unknown types and undecodable configs become `Opaque`.
    pub fn from_parts(block_type: &str, config: Value) -> Self {
        let Some(kind) = BlockKind::parse(block_type) else {
            return BlockConfig::Opaque {
                block_type: block_type.to_string(),
                config,
            };
        };

        // A missing config is stored as null by older documents.
        let raw = if config.is_null() {
            Value::Object(Default::default())
        } else {
            config.clone()
        };

        let decoded = match kind {
            BlockKind::Text => serde_json::from_value(raw).map(BlockConfig::Text),
            BlockKind::Image => serde_json::from_value(raw).map(BlockConfig::Image),
            BlockKind::Video => serde_json::from_value(raw).map(BlockConfig::Video),
            BlockKind::Gallery => serde_json::from_value(raw).map(BlockConfig::Gallery),
            BlockKind::Cta => serde_json::from_value(raw).map(BlockConfig::Cta),
            BlockKind::Quote => serde_json::from_value(raw).map(BlockConfig::Quote),
            BlockKind::List => serde_json::from_value(raw).map(BlockConfig::List),
            BlockKind::Divider => serde_json::from_value(raw).map(BlockConfig::Divider),
        };

        decoded.unwrap_or_else(|err| {
            tracing::warn!(block_type, error = %err, "keeping undecodable block config verbatim");
            BlockConfig::Opaque {
                block_type: block_type.to_string(),
                config,
            }
        })
    }

    /// The modelled kind, or `None` for opaque configs.
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            BlockConfig::Text(_) => Some(BlockKind::Text),
            BlockConfig::Image(_) => Some(BlockKind::Image),
            BlockConfig::Video(_) => Some(BlockKind::Video),
            BlockConfig::Gallery(_) => Some(BlockKind::Gallery),
            BlockConfig::Cta(_) => Some(BlockKind::Cta),
            BlockConfig::Quote(_) => Some(BlockKind::Quote),
            BlockConfig::List(_) => Some(BlockKind::List),
            BlockConfig::Divider(_) => Some(BlockKind::Divider),
            BlockConfig::Opaque { .. } => None,
        }
    }

    /// The `type` string written to storage.
    pub fn type_name(&self) -> &str {
        match self {
            BlockConfig::Opaque { block_type, .. } => block_type,
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    /// Serialize to the stored JSON shape.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for BlockConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockConfig::Text(c) => c.serialize(serializer),
            BlockConfig::Image(c) => c.serialize(serializer),
            BlockConfig::Video(c) => c.serialize(serializer),
            BlockConfig::Gallery(c) => c.serialize(serializer),
            BlockConfig::Cta(c) => c.serialize(serializer),
            BlockConfig::Quote(c) => c.serialize(serializer),
            BlockConfig::List(c) => c.serialize(serializer),
            BlockConfig::Divider(c) => c.serialize(serializer),
            BlockConfig::Opaque { config, .. } => config.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_known_and_unknown_kinds() {
        assert_eq!(BlockKind::parse("cta"), Some(BlockKind::Cta));
        assert_eq!(BlockKind::parse("carousel"), None);
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn image_config_uses_camel_case() {
        let config = BlockConfig::from_parts(
            "image",
            json!({"imageUrl": "/uploads/a.png", "alt": "A", "alignment": "left"}),
        );
        let BlockConfig::Image(image) = &config else {
            panic!("expected image config, got {config:?}");
        };
        assert_eq!(image.image_url, "/uploads/a.png");
        assert_eq!(image.alignment, Alignment::Left);
        assert_eq!(image.caption, "");

        let value = config.to_value();
        assert_eq!(value["imageUrl"], json!("/uploads/a.png"));
        assert!(value.get("width").is_none());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = BlockConfig::from_parts("video", json!({"videoUrl": "x.mp4"}));
        assert_eq!(
            config,
            BlockConfig::Video(VideoConfig {
                video_url: "x.mp4".into(),
                ..VideoConfig::default()
            })
        );
    }

    #[test]
    fn null_config_is_treated_as_empty() {
        let config = BlockConfig::from_parts("divider", Value::Null);
        assert_eq!(config, BlockConfig::Divider(DividerConfig::default()));
    }

    #[test]
    fn unknown_type_is_opaque() {
        let config = BlockConfig::from_parts("map", json!({"lat": 1.5}));
        assert_eq!(config.kind(), None);
        assert_eq!(config.type_name(), "map");
        assert_eq!(config.to_value(), json!({"lat": 1.5}));
    }

    #[test]
    fn undecodable_known_type_keeps_raw_config() {
        let raw = json!({"listType": "zigzag", "items": []});
        let config = BlockConfig::from_parts("list", raw.clone());
        assert_eq!(
            config,
            BlockConfig::Opaque {
                block_type: "list".into(),
                config: raw,
            }
        );
        assert_eq!(config.type_name(), "list");
    }

    #[test]
    fn wire_names_match_serde() {
        assert_eq!(ListType::Checklist.as_str(), "checklist");
        assert_eq!(
            serde_json::to_value(DividerStyle::Dashed).unwrap(),
            json!(DividerStyle::Dashed.as_str())
        );
    }

    #[test]
    fn unmodelled_keys_survive_a_round_trip() {
        let raw = json!({
            "imageUrl": "/a.png",
            "alt": "a",
            "caption": "",
            "alignment": "center",
            "link": "/promo",
            "focalPoint": {"x": 0.5, "y": 0.25}
        });
        let config = BlockConfig::from_parts("image", raw.clone());
        assert_eq!(config.kind(), Some(BlockKind::Image));
        assert_eq!(config.to_value(), raw);

        let text = BlockConfig::from_parts("text", json!({"dropCap": true}));
        assert_eq!(text.kind(), Some(BlockKind::Text));
        assert_eq!(text.to_value(), json!({"dropCap": true}));

        let gallery = json!({"images": [{"id": "1", "url": "/1.jpg", "alt": "", "caption": "", "credit": "Ann"}],
                             "layout": "grid", "columns": 3, "spacing": "medium"});
        assert_eq!(BlockConfig::from_parts("gallery", gallery.clone()).to_value(), gallery);
    }

    #[test]
    fn mistyped_scalars_keep_the_block_typed() {
        let config = BlockConfig::from_parts("divider", json!({"thickness": "2", "color": "#000"}));
        let BlockConfig::Divider(divider) = &config else {
            panic!("expected divider, got {config:?}");
        };
        assert_eq!(divider.thickness, 2);

        let config = BlockConfig::from_parts("gallery", json!({"columns": "four"}));
        let BlockConfig::Gallery(gallery) = &config else {
            panic!("expected gallery, got {config:?}");
        };
        assert_eq!(gallery.columns, DEFAULT_GALLERY_COLUMNS);

        let config = BlockConfig::from_parts("image", json!({"imageUrl": "/a.png", "width": "640px", "height": 480.0}));
        let BlockConfig::Image(image) = &config else {
            panic!("expected image, got {config:?}");
        };
        assert_eq!((image.width, image.height), (Some(640), Some(480)));

        let config = BlockConfig::from_parts("video", json!({"videoUrl": "a.mp4", "controls": "false", "caption": 7}));
        let BlockConfig::Video(video) = &config else {
            panic!("expected video, got {config:?}");
        };
        assert!(!video.controls);
        assert_eq!(video.caption, "7");
    }

    #[test]
    fn text_config_serializes_as_empty_object() {
        let config = BlockConfig::default_for(BlockKind::Text);
        assert_eq!(config.to_value(), json!({}));
    }
}
