use formation_model::ContentItem;

pub const HLS_MIME: &str = "application/x-mpegURL";
pub const MP4_MIME: &str = "video/mp4";

/// Media type for a stream URL. HLS playlists are recognised by their
/// `.m3u8` suffix; everything else, including a missing URL, is MP4.
pub fn mime_for(url: Option<&str>) -> &'static str {
    match url {
        Some(url) if url.contains(".m3u8") => HLS_MIME,
        _ => MP4_MIME,
    }
}

/// A stream handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub url: String,
    pub mime_type: &'static str,
}

impl MediaSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let mime_type = mime_for(Some(&url));
        Self { url, mime_type }
    }

    /// Source for the item's playable stream, if it has one.
    pub fn for_item(item: &ContentItem) -> Option<Self> {
        item.playable_url().map(Self::new)
    }

    pub fn is_hls(&self) -> bool {
        self.mime_type == HLS_MIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_hls() {
        let source =
            MediaSource::new("https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8");
        assert!(source.is_hls());
        assert_eq!(MediaSource::new("https://cdn/a.mp4").mime_type, MP4_MIME);
        assert_eq!(mime_for(None), MP4_MIME);
    }
}
