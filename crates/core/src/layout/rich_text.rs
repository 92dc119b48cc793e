//! Locating and rewriting FloatImage nodes inside a text block's HTML.
//!
//! A node is an `<img>` tag. Its float state lives in `data-float`, an
//! explicit width in `data-width` (older content used a `width` attribute
//! or a `width:` declaration in `style`). Rewriting always regenerates
//! `style` from the node, so the markup carries the shared layout rules.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::float_image::{Float, FloatImage};
use super::HEADING_CLEAR_STYLE;

#[allow(clippy::expect_used)]
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*?)\s*/?>").expect("valid img regex"));

#[allow(clippy::expect_used)]
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

#[allow(clippy::expect_used)]
static HEADING_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h([1-6])\b([^>]*)>").expect("valid heading regex"));

#[allow(clippy::expect_used)]
static STYLE_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*width\s*:\s*([^;]+)").expect("valid width regex"));

#[allow(clippy::expect_used)]
static STYLE_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*float\s*:\s*([a-z]+)").expect("valid float regex"));

#[allow(clippy::expect_used)]
static STYLE_CLEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bclear\s*:\s*([a-z-]+)").expect("valid clear regex"));

/// Attributes owned by the layout contract; everything else is carried through.
const MANAGED: &[&str] = &["src", "alt", "style", "width", "data-float", "data-width"];

/// A parsed `<img>` tag: the node plus the attributes the contract leaves alone.
struct ImageTag {
    image: FloatImage,
    passthrough: Vec<(String, Option<String>)>,
}

impl ImageTag {
    fn parse(attributes: &str) -> Self {
        let mut src = String::new();
        let mut alt = String::new();
        let mut float = None;
        let mut has_data_float = false;
        let mut style_float = None;
        let mut data_width = None;
        let mut style_width = None;
        let mut attr_width = None;
        let mut passthrough = Vec::new();

        for caps in ATTRIBUTE.captures_iter(attributes) {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()));

            match (name.as_str(), value) {
                ("src", Some(v)) => src = v,
                ("alt", Some(v)) => alt = v,
                ("data-float", Some(v)) => {
                    has_data_float = true;
                    float = Float::parse(&v);
                }
                ("data-width", Some(v)) => data_width = Some(v),
                ("style", Some(v)) => {
                    style_width = STYLE_WIDTH
                        .captures(&v)
                        .map(|c| c[1].trim().to_string());
                    style_float = STYLE_FLOAT.captures(&v).and_then(|c| Float::parse(&c[1]));
                }
                ("width", Some(v)) => attr_width = Some(v),
                (other, value) if !MANAGED.contains(&other) => {
                    passthrough.push((other.to_string(), value));
                }
                _ => {}
            }
        }

        // Once a node carries data-float its style is generated output and
        // only data-width records an explicit width.
        let (float, width) = if has_data_float {
            (float, data_width)
        } else {
            (style_float, data_width.or(style_width).or(attr_width))
        };

        let mut image = FloatImage::new(src, alt);
        image.set_float(float.unwrap_or_default());
        if let Some(width) = width {
            image.set_width(&width);
        }

        Self { image, passthrough }
    }

    fn to_html(&self) -> String {
        let image = &self.image;
        let mut html = format!(
            "<img src=\"{}\" alt=\"{}\" data-float=\"{}\"",
            escape_attr(&image.src),
            escape_attr(&image.alt),
            image.float.as_str()
        );
        if let Some(width) = &image.width {
            html.push_str(&format!(" data-width=\"{}\"", escape_attr(width)));
        }
        html.push_str(&format!(" style=\"{}\"", image.inline_style()));
        for (name, value) in &self.passthrough {
            match value {
                Some(v) => html.push_str(&format!(" {name}=\"{}\"", escape_attr(v))),
                None => html.push_str(&format!(" {name}")),
            }
        }
        html.push('>');
        html
    }
}

/// Every FloatImage node in document order.
pub fn float_images(html: &str) -> Vec<FloatImage> {
    IMG_TAG
        .captures_iter(html)
        .map(|caps| ImageTag::parse(&caps[1]).image)
        .collect()
}

/// Rewrite each FloatImage node through `edit`, which receives the node's
/// index among the images of `html`. Non-image markup is left untouched.
pub fn rewrite_float_images<F>(html: &str, mut edit: F) -> String
where
    F: FnMut(usize, &mut FloatImage),
{
    let mut index = 0;
    IMG_TAG
        .replace_all(html, |caps: &Captures| {
            let mut tag = ImageTag::parse(&caps[1]);
            edit(index, &mut tag.image);
            index += 1;
            tag.to_html()
        })
        .into_owned()
}

/// Resolve every node's float and width into inline layout styles.
pub fn apply_float_layout(html: &str) -> String {
    rewrite_float_images(html, |_, _| {})
}

/// Force every heading to clear preceding floats.
pub fn clear_headings(html: &str) -> String {
    HEADING_OPEN
        .replace_all(html, |caps: &Captures| {
            let level = &caps[1];
            let attributes = &caps[2];
            if let Some(clear) = STYLE_CLEAR.captures(attributes) {
                if clear[1].eq_ignore_ascii_case("both") {
                    caps[0].to_string()
                } else {
                    let attributes = STYLE_CLEAR.replace(attributes, "clear: both");
                    format!("<h{level}{attributes}>")
                }
            } else if let Some(pos) = attributes.find("style=\"") {
                let (head, tail) = attributes.split_at(pos + "style=\"".len());
                format!("<h{level}{head}{HEADING_CLEAR_STYLE} {tail}>")
            } else {
                format!("<h{level} style=\"{HEADING_CLEAR_STYLE}\"{attributes}>")
            }
        })
        .into_owned()
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
