//! Floating-image layout contract shared by the editing surface and the
//! public renderer. Both sides must produce identical styles for the same
//! node, so every style string is built here.

pub mod float_image;
pub mod rich_text;

pub use float_image::{Float, FloatImage, CENTERED_DEFAULT_WIDTH, FLOATING_DEFAULT_WIDTH};
pub use rich_text::{apply_float_layout, clear_headings, float_images, rewrite_float_images};

/// Inline style forcing a heading below any preceding float.
pub const HEADING_CLEAR_STYLE: &str = "clear: both;";

/// Trailing element emitted after the full block sequence.
pub const CLEARFIX_HTML: &str = r#"<div class="clearfix" style="clear: both;"></div>"#;

/// Stylesheet for hosts that prefer class/attribute rules over inline styles.
pub const FLOAT_LAYOUT_CSS: &str = r#".rich-text img[data-float="left"] { float: left; margin: 0 1rem 1rem 0; max-width: 100%; height: auto; }
.rich-text img[data-float="right"] { float: right; margin: 0 0 1rem 1rem; max-width: 100%; height: auto; }
.rich-text img[data-float="none"] { display: block; float: none; margin: 0 auto 1rem; max-width: 100%; height: auto; }
.rich-text h1, .rich-text h2, .rich-text h3, .rich-text h4, .rich-text h5, .rich-text h6 { clear: both; }
.page-content::after { content: ""; display: table; clear: both; }
"#;
