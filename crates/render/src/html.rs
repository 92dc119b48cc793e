//! Escaping and sanitization helpers.

use std::sync::LazyLock;

use ammonia::Builder;

/// Sanitizer for rich text: ammonia's defaults plus the attributes the
/// floating-image layout reads.
static RICH_TEXT: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder.add_tag_attributes("img", &["data-float", "data-width", "style", "loading"]);
    builder
});

/// Escape text for use in element content or a quoted attribute.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Sanitize author-supplied rich HTML.
pub fn sanitize_rich_text(input: &str) -> String {
    RICH_TEXT.clean(input).to_string()
}

/// Sanitize short inline text (list items and the like).
pub fn sanitize_inline(input: &str) -> String {
    ammonia::clean(input)
}

/// Links may point at http(s), mail/phone handlers, or stay on-site.
/// Protocol-relative `//host` links leave the site and are refused.
pub fn is_safe_link(url: &str) -> bool {
    let url = url.trim();
    if url.starts_with("//") || url.starts_with("/\\") {
        return false;
    }
    ["https://", "http://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Accept simple CSS color values (`#hex`, names, `rgb(...)`/`hsl(...)`).
pub fn is_safe_color(color: &str) -> bool {
    !color.is_empty()
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "#(),.% ".contains(c))
}
