//! Video URL classification.
//!
//! Matching is by substring, so unusual hosts or malformed URLs simply fall
//! through to a native `<video>` element.

const YOUTUBE_WATCH: &str = "youtube.com/watch?v=";
const YOUTUBE_EMBED: &str = "youtube.com/embed/";
const YOUTUBE_SHORT: &str = "youtu.be/";
const VIMEO_PLAYER: &str = "player.vimeo.com/video/";
const VIMEO: &str = "vimeo.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube(String),
    Vimeo(String),
    Native(String),
}

impl VideoSource {
    pub fn classify(url: &str) -> Self {
        let url = url.trim();

        let youtube = after(url, YOUTUBE_WATCH)
            .or_else(|| after(url, YOUTUBE_EMBED))
            .or_else(|| after(url, YOUTUBE_SHORT))
            .map(|rest| take_id(rest, &['&', '#', '?', '/']));
        if let Some(id) = youtube.filter(|id| !id.is_empty()) {
            return VideoSource::YouTube(id.to_string());
        }

        let vimeo = after(url, VIMEO_PLAYER)
            .or_else(|| after(url, VIMEO))
            .map(|rest| take_id(rest, &['?', '#', '/']));
        if let Some(id) = vimeo.filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())) {
            return VideoSource::Vimeo(id.to_string());
        }

        VideoSource::Native(url.to_string())
    }

    /// Player URL for hosted videos; `None` for native files.
    pub fn embed_url(&self) -> Option<String> {
        match self {
            VideoSource::YouTube(id) => Some(format!("https://www.youtube.com/embed/{id}")),
            VideoSource::Vimeo(id) => Some(format!("https://player.vimeo.com/video/{id}")),
            VideoSource::Native(_) => None,
        }
    }
}

fn after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    url.find(marker).map(|pos| &url[pos + marker.len()..])
}

fn take_id<'a>(rest: &'a str, stops: &[char]) -> &'a str {
    rest.split(|c| stops.contains(&c)).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_watch_url() {
        let source = VideoSource::classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s");
        assert_eq!(source, VideoSource::YouTube("dQw4w9WgXcQ".into()));
        assert_eq!(
            source.embed_url().unwrap(),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn youtube_short_url() {
        let source = VideoSource::classify("https://youtu.be/abc123");
        assert_eq!(
            source.embed_url().as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
    }

    #[test]
    fn vimeo_urls() {
        assert_eq!(
            VideoSource::classify("https://vimeo.com/76979871").embed_url().as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
        assert_eq!(
            VideoSource::classify("https://player.vimeo.com/video/123?h=x"),
            VideoSource::Vimeo("123".into())
        );
    }

    #[test]
    fn vimeo_non_video_paths_fall_through() {
        let url = "https://vimeo.com/channels/staffpicks";
        assert_eq!(VideoSource::classify(url), VideoSource::Native(url.into()));
    }

    #[test]
    fn other_urls_are_native() {
        assert_eq!(
            VideoSource::classify("/uploads/clip.mp4"),
            VideoSource::Native("/uploads/clip.mp4".into())
        );
        assert_eq!(
            VideoSource::classify("https://youtube.com/watch?v="),
            VideoSource::Native("https://youtube.com/watch?v=".into())
        );
    }
}
