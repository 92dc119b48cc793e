use blockpage_core::layout::CLEARFIX_HTML;
use blockpage_core::{Block, BlockConfig, ContentDocument};

use crate::blocks::{render_fallback, RenderBlock};
use crate::html::html_escape;
use crate::media::MediaResolver;

/// Turns a [`ContentDocument`] into display markup.
#[derive(Debug, Clone)]
pub struct Renderer {
    media: MediaResolver,
}

/// Output of a single block: its fragments plus the element they sit in.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub block_id: String,
    pub block_type: String,
    pub fragments: Vec<String>,
    pub container: Option<String>,
}

impl RenderedBlock {
    pub fn to_html(&self) -> String {
        let inner = self.fragments.concat();
        let inner = match &self.container {
            Some(open) => format!("{open}{inner}</div>"),
            None => inner,
        };
        format!(
            "<section class=\"content-block content-block--{ty}\" data-block-id=\"{id}\">{inner}</section>",
            ty = html_escape(&self.block_type),
            id = html_escape(&self.block_id),
        )
    }
}

/// A rendered page, blocks in display sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPage {
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedPage {
    /// Every fragment of every block, flattened in display order.
    pub fn fragments(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|b| b.fragments.iter().map(String::as_str))
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"page-content\">");
        for block in &self.blocks {
            html.push_str(&block.to_html());
        }
        html.push_str(CLEARFIX_HTML);
        html.push_str("</div>");
        html
    }
}

impl Renderer {
    pub fn new(media: MediaResolver) -> Self {
        Self { media }
    }

    pub fn media(&self) -> &MediaResolver {
        &self.media
    }

    /// Render the active blocks of `document` in `order` sequence.
    ///
    /// Blocks that produce no fragments (an image without a URL, an empty
    /// list) are omitted entirely.
    pub fn render(&self, document: &ContentDocument) -> RenderedPage {
        let blocks: Vec<RenderedBlock> = document
            .display_blocks()
            .into_iter()
            .filter_map(|block| self.render_block(block))
            .collect();
        tracing::debug!(
            total = document.blocks.len(),
            rendered = blocks.len(),
            "rendered page"
        );
        RenderedPage { blocks }
    }

    /// Render one block regardless of its visibility flag.
    pub fn render_block(&self, block: &Block) -> Option<RenderedBlock> {
        let (fragments, container) = match &block.config {
            BlockConfig::Text(c) => self.dispatch(c, block),
            BlockConfig::Image(c) => self.dispatch(c, block),
            BlockConfig::Video(c) => self.dispatch(c, block),
            BlockConfig::Gallery(c) => self.dispatch(c, block),
            BlockConfig::Cta(c) => self.dispatch(c, block),
            BlockConfig::Quote(c) => self.dispatch(c, block),
            BlockConfig::List(c) => self.dispatch(c, block),
            BlockConfig::Divider(c) => self.dispatch(c, block),
            BlockConfig::Opaque { config, .. } => (render_fallback(block, config), None),
        };
        if fragments.is_empty() {
            return None;
        }
        Some(RenderedBlock {
            block_id: block.id.clone(),
            block_type: block.block_type().to_string(),
            fragments,
            container,
        })
    }

    fn dispatch<R: RenderBlock>(&self, config: &R, block: &Block) -> (Vec<String>, Option<String>) {
        (config.render(block, &self.media), config.container())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(MediaResolver::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use blockpage_core::normalize;
    use serde_json::json;

    fn renderer() -> Renderer {
        Renderer::new(MediaResolver::new("https://cdn.example.com"))
    }

    fn document(blocks: serde_json::Value) -> ContentDocument {
        normalize(&json!({ "blocks": blocks }).to_string())
    }

    #[test]
    fn legacy_html_renders_through_normalizer() {
        let page = renderer().render(&normalize("<p>Hello</p>"));
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].block_id, "legacy-content");
        let html = page.to_html();
        assert!(html.contains("<p>Hello</p>"), "{html}");
        assert!(html.starts_with("<div class=\"page-content\">"));
        assert!(html.ends_with(&format!("{CLEARFIX_HTML}</div>")));
    }

    #[test]
    fn skips_inactive_blocks_and_sorts_by_order() {
        let doc = document(json!([
            {"id": "c", "type": "text", "content": "<p>C</p>", "order": 2},
            {"id": "hidden", "type": "text", "content": "<p>H</p>", "order": 0, "isActive": false},
            {"id": "a", "type": "text", "content": "<p>A</p>", "order": 1},
        ]));
        let page = renderer().render(&doc);
        let ids: Vec<&str> = page.blocks.iter().map(|b| b.block_id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert!(!page.to_html().contains("<p>H</p>"));
    }

    #[test]
    fn gallery_fragments_are_absolute() {
        let doc = document(json!([{
            "id": "g",
            "type": "gallery",
            "order": 0,
            "config": {
                "images": [
                    {"id": "1", "url": "/uploads/1.jpg", "alt": "one"},
                    {"id": "2", "url": "uploads/2.jpg", "alt": "two"},
                    {"id": "3", "url": "https://other.example.com/3.jpg", "alt": "three"}
                ],
                "columns": 9
            }
        }]));
        let page = renderer().render(&doc);
        let fragments = page.fragments();
        assert_eq!(fragments.len(), 3);
        assert!(fragments[0].contains("https://cdn.example.com/uploads/1.jpg"));
        assert!(fragments[1].contains("https://cdn.example.com/uploads/2.jpg"));
        assert!(fragments[2].contains("https://other.example.com/3.jpg"));
        let container = page.blocks[0].container.as_deref().unwrap();
        assert!(container.contains("repeat(6, minmax(0, 1fr))"), "{container}");
    }

    #[test]
    fn short_youtube_link_embeds() {
        let doc = document(json!([{
            "id": "v", "type": "video", "order": 0,
            "config": {"videoUrl": "https://youtu.be/abc123"}
        }]));
        let html = renderer().render(&doc).to_html();
        assert!(html.contains(r#"src="https://www.youtube.com/embed/abc123""#), "{html}");
    }

    #[test]
    fn float_defaults_follow_layout_contract() {
        let doc = document(json!([{
            "id": "t", "type": "text", "order": 0,
            "content": r#"<img src="/a.png" alt="a" data-float="left"><img src="/b.png" alt="b" data-float="none">"#
        }]));
        let html = renderer().render(&doc).to_html();
        assert!(html.contains("float: left; margin: 0 1rem 1rem 0; width: 300px;"), "{html}");
        assert!(html.contains("margin: 0 auto 1rem; width: 600px;"), "{html}");
    }

    #[test]
    fn unknown_type_uses_fallback() {
        let doc = document(json!([{
            "id": "m", "type": "map", "order": 0, "config": {"zoom": 4}
        }]));
        let page = renderer().render(&doc);
        assert_eq!(page.blocks[0].block_type, "map");
        assert!(page.to_html().contains(r#"class="block-fallback" data-block-type="map""#));
    }

    #[test]
    fn empty_blocks_are_omitted() {
        let doc = document(json!([
            {"id": "i", "type": "image", "order": 0},
            {"id": "d", "type": "divider", "order": 1}
        ]));
        let page = renderer().render(&doc);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].block_type, "divider");
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = document(json!([
            {"id": "q", "type": "quote", "order": 0, "config": {"quote": "Hi", "author": "Me"}},
            {"id": "l", "type": "list", "order": 1, "config": {"items": [{"text": "x"}]}}
        ]));
        let r = renderer();
        assert_eq!(r.render(&doc).to_html(), r.render(&doc).to_html());
    }

    #[test]
    fn block_wrapper_carries_id_and_type() {
        let doc = document(json!([{"id": "x\"y", "type": "divider", "order": 0}]));
        let html = renderer().render(&doc).to_html();
        assert!(html.contains(r#"<section class="content-block content-block--divider" data-block-id="x&quot;y">"#), "{html}");
    }
}
