use serde::{Deserialize, Serialize};

/// Width applied to a left/right floated image with no explicit width.
pub const FLOATING_DEFAULT_WIDTH: &str = "300px";
/// Width applied to a centered (non-floating) image with no explicit width.
pub const CENTERED_DEFAULT_WIDTH: &str = "600px";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Float {
    Left,
    Right,
    #[default]
    None,
}

impl Float {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Float::Left),
            "right" => Some(Float::Right),
            "none" | "center" => Some(Float::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Float::Left => "left",
            Float::Right => "right",
            Float::None => "none",
        }
    }

    pub fn default_width(&self) -> &'static str {
        match self {
            Float::Left | Float::Right => FLOATING_DEFAULT_WIDTH,
            Float::None => CENTERED_DEFAULT_WIDTH,
        }
    }
}

/// An image embedded in rich text that may float beside the surrounding copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatImage {
    pub src: String,
    pub alt: String,
    pub float: Float,
    /// Explicit CSS width; `None` means the float's default applies.
    pub width: Option<String>,
}

impl FloatImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            float: Float::None,
            width: None,
        }
    }

    /// The width actually laid out: explicit if set, otherwise the float default.
    pub fn effective_width(&self) -> &str {
        self.width.as_deref().unwrap_or(self.float.default_width())
    }

    /// Change float state. An explicit width is kept.
    pub fn set_float(&mut self, float: Float) {
        self.float = float;
    }

    /// Set an explicit width; a blank value clears it back to the default.
    pub fn set_width(&mut self, width: &str) {
        let width = width.trim();
        self.width = if width.is_empty() {
            None
        } else if width.bytes().all(|b| b.is_ascii_digit()) {
            Some(format!("{width}px"))
        } else {
            Some(width.to_string())
        };
    }

    /// Inline style for this node.
    pub fn inline_style(&self) -> String {
        let width = self.effective_width();
        match self.float {
            Float::Left => format!(
                "float: left; margin: 0 1rem 1rem 0; width: {width}; max-width: 100%; height: auto;"
            ),
            Float::Right => format!(
                "float: right; margin: 0 0 1rem 1rem; width: {width}; max-width: 100%; height: auto;"
            ),
            Float::None => format!(
                "display: block; float: none; margin: 0 auto 1rem; width: {width}; max-width: 100%; height: auto;"
            ),
        }
    }
}
