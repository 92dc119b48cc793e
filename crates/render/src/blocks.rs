//! Per-type block renderers.
//!
//! Each config type renders itself into zero or more markup fragments. The
//! engine picks the implementation from the config variant; anything it
//! cannot type goes through [`render_fallback`].

use blockpage_core::document::config::{
    CtaConfig, DividerConfig, GalleryConfig, ImageConfig, ListConfig, ListType, QuoteConfig,
    Size, TextConfig, VideoConfig,
};
use blockpage_core::layout::{clear_headings, rewrite_float_images};
use blockpage_core::{Block, BlockKind};
use serde_json::Value;

use crate::html::{html_escape, is_safe_color, is_safe_link, sanitize_inline, sanitize_rich_text};
use crate::media::MediaResolver;
use crate::video::VideoSource;

pub trait RenderBlock {
    fn render(&self, block: &Block, media: &MediaResolver) -> Vec<String>;

    /// Element wrapping this block's fragments, if any.
    fn container(&self) -> Option<String> {
        None
    }
}

impl RenderBlock for TextConfig {
    fn render(&self, block: &Block, media: &MediaResolver) -> Vec<String> {
        let content = block.content.as_deref().unwrap_or_default();
        if content.trim().is_empty() {
            return Vec::new();
        }
        let clean = sanitize_rich_text(content);
        let laid_out = rewrite_float_images(&clean, |_, image| {
            image.src = media.resolve(&image.src);
        });
        vec![clear_headings(&laid_out)]
    }

    fn container(&self) -> Option<String> {
        Some(r#"<div class="rich-text">"#.to_string())
    }
}

impl RenderBlock for ImageConfig {
    fn render(&self, _block: &Block, media: &MediaResolver) -> Vec<String> {
        if self.image_url.trim().is_empty() {
            return Vec::new();
        }
        let mut img = format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\"",
            html_escape(&media.resolve(&self.image_url)),
            html_escape(&self.alt)
        );
        if let Some(width) = self.width {
            img.push_str(&format!(" width=\"{width}\""));
        }
        if let Some(height) = self.height {
            img.push_str(&format!(" height=\"{height}\""));
        }
        img.push('>');

        vec![format!(
            "<figure class=\"image-block image-align-{}\">{img}{}</figure>",
            self.alignment.as_str(),
            figcaption(&self.caption)
        )]
    }
}

impl RenderBlock for VideoConfig {
    fn render(&self, block: &Block, media: &MediaResolver) -> Vec<String> {
        if self.video_url.trim().is_empty() {
            return Vec::new();
        }
        let source = VideoSource::classify(&self.video_url);
        let player = match source.embed_url() {
            Some(mut src) => {
                if self.autoplay {
                    src.push_str("?autoplay=1&mute=1");
                }
                let title = block.title.as_deref().unwrap_or("Video");
                format!(
                    "<div class=\"video-embed\"><iframe src=\"{}\" title=\"{}\" frameborder=\"0\" \
                     allow=\"accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture\" \
                     allowfullscreen></iframe></div>",
                    html_escape(&src),
                    html_escape(title)
                )
            }
            None => {
                let mut flags = String::new();
                if self.controls {
                    flags.push_str(" controls");
                }
                if self.autoplay {
                    flags.push_str(" autoplay muted playsinline");
                }
                format!(
                    "<video src=\"{}\"{flags}></video>",
                    html_escape(&media.resolve(&self.video_url))
                )
            }
        };

        let caption = if self.caption.is_empty() {
            String::new()
        } else {
            format!("<p class=\"video-caption\">{}</p>", html_escape(&self.caption))
        };
        vec![format!("{player}{caption}")]
    }
}

impl RenderBlock for GalleryConfig {
    fn render(&self, _block: &Block, media: &MediaResolver) -> Vec<String> {
        self.images
            .iter()
            .map(|image| {
                format!(
                    "<figure class=\"gallery-item\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\">{}</figure>",
                    html_escape(&media.resolve(&image.url)),
                    html_escape(&image.alt),
                    figcaption(&image.caption)
                )
            })
            .collect()
    }

    fn container(&self) -> Option<String> {
        let gap = match self.spacing {
            Size::Small => "0.5rem",
            Size::Medium => "1rem",
            Size::Large => "2rem",
        };
        let columns = self.columns.clamp(1, 6);
        Some(format!(
            "<div class=\"gallery gallery-{}\" style=\"display: grid; \
             grid-template-columns: repeat({columns}, minmax(0, 1fr)); gap: {gap};\">",
            self.layout.as_str()
        ))
    }
}

impl RenderBlock for CtaConfig {
    fn render(&self, block: &Block, _media: &MediaResolver) -> Vec<String> {
        let mut html = format!(
            "<div class=\"cta cta-{} cta-{}\">",
            self.style.as_str(),
            self.size.as_str()
        );
        if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
            html.push_str(&format!("<h3 class=\"cta-title\">{}</h3>", html_escape(title)));
        }
        if !self.description.is_empty() {
            html.push_str(&format!(
                "<p class=\"cta-description\">{}</p>",
                html_escape(&self.description)
            ));
        }
        let href = if is_safe_link(&self.button_url) {
            self.button_url.trim()
        } else {
            "#"
        };
        html.push_str(&format!(
            "<a class=\"cta-button\" href=\"{}\">{}</a></div>",
            html_escape(href),
            html_escape(&self.button_text)
        ));
        vec![html]
    }
}

impl RenderBlock for QuoteConfig {
    fn render(&self, _block: &Block, _media: &MediaResolver) -> Vec<String> {
        if self.quote.trim().is_empty() {
            return Vec::new();
        }
        let mut html = format!(
            "<blockquote class=\"quote quote-{}\"><p>{}</p>",
            self.style.as_str(),
            html_escape(&self.quote)
        );
        if !self.author.is_empty() {
            html.push_str(&format!("<footer><cite>{}</cite>", html_escape(&self.author)));
            if !self.author_title.is_empty() {
                html.push_str(&format!(
                    "<span class=\"author-title\">, {}</span>",
                    html_escape(&self.author_title)
                ));
            }
            html.push_str("</footer>");
        }
        html.push_str("</blockquote>");
        vec![html]
    }
}

impl RenderBlock for ListConfig {
    fn render(&self, _block: &Block, _media: &MediaResolver) -> Vec<String> {
        let items: Vec<&str> = self
            .items
            .iter()
            .map(|item| item.text.as_str())
            .filter(|text| !text.trim().is_empty())
            .collect();
        if items.is_empty() {
            return Vec::new();
        }

        let (tag, marker) = match self.list_type {
            ListType::Numbered => ("ol", ""),
            ListType::Bullet => ("ul", ""),
            ListType::Checklist => ("ul", "<input type=\"checkbox\" disabled> "),
        };
        let mut html = format!(
            "<{tag} class=\"list list-{} list-{}\">",
            self.list_type.as_str(),
            self.style.as_str()
        );
        for text in items {
            html.push_str(&format!("<li>{marker}{}</li>", sanitize_inline(text)));
        }
        html.push_str(&format!("</{tag}>"));
        vec![html]
    }
}

impl RenderBlock for DividerConfig {
    fn render(&self, _block: &Block, _media: &MediaResolver) -> Vec<String> {
        let color = if is_safe_color(&self.color) {
            self.color.as_str()
        } else {
            "currentColor"
        };
        vec![format!(
            "<hr class=\"divider divider-{style}\" style=\"border: 0; border-top: {thickness}px {style} {color}; margin: 2rem 0;\">",
            style = self.style.as_str(),
            thickness = self.thickness.clamp(1, 20),
        )]
    }
}

/// Generic rendering for unknown types and undecodable configs: the
/// sanitized content if there is any, otherwise the raw config of an unknown
/// type. A known type whose config could not be decoded shows content only.
pub fn render_fallback(block: &Block, config: &Value) -> Vec<String> {
    tracing::debug!(id = %block.id, block_type = block.block_type(), "rendering block through fallback");
    let known = BlockKind::parse(block.block_type()).is_some();
    let body = match block.content.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(content) => sanitize_rich_text(content),
        None if known => {
            tracing::warn!(id = %block.id, block_type = block.block_type(), "undecodable block config not rendered");
            return Vec::new();
        }
        None if config.is_null() || config.as_object().is_some_and(|m| m.is_empty()) => {
            return Vec::new();
        }
        None => format!(
            "<pre class=\"block-config\">{}</pre>",
            html_escape(&serde_json::to_string_pretty(config).unwrap_or_default())
        ),
    };
    vec![format!(
        "<div class=\"block-fallback\" data-block-type=\"{}\">{body}</div>",
        html_escape(block.block_type())
    )]
}

fn figcaption(caption: &str) -> String {
    if caption.is_empty() {
        String::new()
    } else {
        format!("<figcaption>{}</figcaption>", html_escape(caption))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpage_core::document::config::{
        Alignment, BlockConfig, GalleryImage, ListItem, QuoteStyle,
    };
    use serde_json::json;

    fn block(config: BlockConfig) -> Block {
        Block {
            id: "b1".into(),
            title: None,
            content: Some(String::new()),
            config,
            order: 0,
            is_active: true,
        }
    }

    fn media() -> MediaResolver {
        MediaResolver::new("https://cdn.example.com")
    }

    fn item(text: &str) -> ListItem {
        ListItem {
            text: text.to_string(),
            ..ListItem::default()
        }
    }

    #[test]
    fn image_with_caption_and_relative_url() {
        let config = ImageConfig {
            image_url: "/uploads/hero.jpg".into(),
            alt: "Hero".into(),
            caption: "A <b>bold</b> caption".into(),
            alignment: Alignment::Left,
            width: Some(800),
            ..ImageConfig::default()
        };
        let html = config.render(&block(BlockConfig::Image(config.clone())), &media()).concat();
        assert!(html.contains(r#"src="https://cdn.example.com/uploads/hero.jpg""#));
        assert!(html.contains(r#"alt="Hero""#));
        assert!(html.contains(r#"width="800""#));
        assert!(html.contains("image-align-left"));
        assert!(html.contains("<figcaption>A &lt;b&gt;bold&lt;/b&gt; caption</figcaption>"));
    }

    #[test]
    fn image_without_url_renders_nothing() {
        let config = ImageConfig::default();
        assert!(config.render(&block(BlockConfig::Image(config.clone())), &media()).is_empty());
    }

    #[test]
    fn youtube_video_becomes_iframe() {
        let config = VideoConfig {
            video_url: "https://youtu.be/abc123".into(),
            ..VideoConfig::default()
        };
        let html = config.render(&block(BlockConfig::Video(config.clone())), &media()).concat();
        assert!(html.contains(r#"<iframe src="https://www.youtube.com/embed/abc123""#), "{html}");
    }

    #[test]
    fn native_video_keeps_url_and_flags() {
        let config = VideoConfig {
            video_url: "/uploads/clip.mp4".into(),
            autoplay: true,
            controls: false,
            caption: "Clip".into(),
            ..VideoConfig::default()
        };
        let html = config.render(&block(BlockConfig::Video(config.clone())), &media()).concat();
        assert!(html.contains(r#"<video src="https://cdn.example.com/uploads/clip.mp4" autoplay muted playsinline>"#), "{html}");
        assert!(!html.contains("controls"));
        assert!(html.contains(r#"<p class="video-caption">Clip</p>"#));
    }

    #[test]
    fn gallery_emits_one_fragment_per_image() {
        let config = GalleryConfig {
            images: (1..=3)
                .map(|i| GalleryImage {
                    id: i.to_string(),
                    url: format!("/uploads/{i}.jpg"),
                    alt: format!("Image {i}"),
                    ..GalleryImage::default()
                })
                .collect(),
            ..GalleryConfig::default()
        };
        let fragments = config.render(&block(BlockConfig::Gallery(config.clone())), &media());
        assert_eq!(fragments.len(), 3);
        for (i, fragment) in fragments.iter().enumerate() {
            let expected = format!("src=\"https://cdn.example.com/uploads/{}.jpg\"", i + 1);
            assert!(fragment.contains(&expected), "{fragment}");
        }
        assert!(config.container().unwrap().contains("repeat(3, minmax(0, 1fr))"));
    }

    #[test]
    fn cta_rejects_script_links() {
        let config = CtaConfig {
            button_text: "Go".into(),
            button_url: "javascript:alert(1)".into(),
            description: "Now".into(),
            ..CtaConfig::default()
        };
        let mut cta = block(BlockConfig::Cta(config.clone()));
        cta.title = Some("Join".into());
        let html = config.render(&cta, &media()).concat();
        assert!(html.contains(r##"href="#""##), "{html}");
        assert!(html.contains(r#"<h3 class="cta-title">Join</h3>"#));
        assert!(html.contains(r#"<p class="cta-description">Now</p>"#));
    }

    #[test]
    fn quote_with_attribution() {
        let config = QuoteConfig {
            quote: "Less is more.".into(),
            author: "Mies".into(),
            author_title: "Architect".into(),
            style: QuoteStyle::Modern,
            ..QuoteConfig::default()
        };
        let html = config.render(&block(BlockConfig::Quote(config.clone())), &media()).concat();
        assert_eq!(
            html,
            "<blockquote class=\"quote quote-modern\"><p>Less is more.</p><footer><cite>Mies</cite>\
             <span class=\"author-title\">, Architect</span></footer></blockquote>"
        );
    }

    #[test]
    fn list_types() {
        let items = vec![
            item("One"),
            item("  "),
            item("Two"),
        ];
        let numbered = ListConfig {
            items: items.clone(),
            list_type: ListType::Numbered,
            ..ListConfig::default()
        };
        let html = numbered.render(&block(BlockConfig::List(numbered.clone())), &media()).concat();
        assert!(html.starts_with("<ol"));
        assert_eq!(html.matches("<li>").count(), 2);

        let checklist = ListConfig {
            items,
            list_type: ListType::Checklist,
            ..ListConfig::default()
        };
        let html = checklist.render(&block(BlockConfig::List(checklist.clone())), &media()).concat();
        assert!(html.starts_with("<ul"));
        assert!(html.contains(r#"<li><input type="checkbox" disabled> One</li>"#));
    }

    #[test]
    fn divider_uses_style_color_and_thickness() {
        let config = DividerConfig {
            thickness: 3,
            ..DividerConfig::default()
        };
        let html = config.render(&block(BlockConfig::Divider(config.clone())), &media()).concat();
        assert!(html.contains("border-top: 3px solid #e5e7eb;"), "{html}");

        let hostile = DividerConfig {
            color: "red; background: url(x)".into(),
            ..DividerConfig::default()
        };
        let html = hostile.render(&block(BlockConfig::Divider(hostile.clone())), &media()).concat();
        assert!(html.contains("currentColor"));
    }

    #[test]
    fn text_resolves_float_images_and_headings() {
        let mut text = block(BlockConfig::Text(TextConfig::default()));
        text.content = Some(
            r#"<img src="/uploads/a.png" alt="a" data-float="left"><p>Copy</p><h2>Next</h2>"#.into(),
        );
        let html = TextConfig::default().render(&text, &media()).concat();
        assert!(html.contains(r#"src="https://cdn.example.com/uploads/a.png""#), "{html}");
        assert!(html.contains("float: left;"));
        assert!(html.contains("width: 300px;"));
        assert!(html.contains(r#"<h2 style="clear: both;">Next</h2>"#));
    }

    #[test]
    fn fallback_prefers_content_then_config() {
        let mut unknown = block(BlockConfig::Opaque {
            block_type: "map".into(),
            config: json!({"lat": 1}),
        });
        let html = render_fallback(&unknown, &json!({"lat": 1})).concat();
        assert!(html.contains(r#"data-block-type="map""#));
        assert!(html.contains("&quot;lat&quot;: 1"));

        unknown.content = Some("<p>Where we are</p>".into());
        let html = render_fallback(&unknown, &json!({"lat": 1})).concat();
        assert!(html.contains("<p>Where we are</p>"));
        assert!(!html.contains("<pre"));

        unknown.content = None;
        assert!(render_fallback(&unknown, &json!({})).is_empty());
    }

    #[test]
    fn undecodable_known_type_never_prints_its_config() {
        let raw = json!({"listType": "zigzag", "items": [{"text": "secret"}]});
        let mut list = block(BlockConfig::from_parts("list", raw.clone()));
        list.content = None;
        assert!(render_fallback(&list, &raw).is_empty());
    }

    #[test]
    fn mistyped_numbers_still_render_typed() {
        let config = BlockConfig::from_parts("divider", json!({"thickness": "2", "style": "dashed"}));
        let BlockConfig::Divider(divider) = &config else {
            panic!("expected divider, got {config:?}");
        };
        let html = divider.render(&block(config.clone()), &media()).concat();
        assert!(html.contains("border-top: 2px dashed #e5e7eb;"), "{html}");
        assert!(!html.contains("<pre"));
    }
}
