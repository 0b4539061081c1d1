use url::Url;

/// Playback strategy for a raw demo-video source string.
///
/// A source is either a hosted video we can hand off as an embed URL, a
/// direct media file played natively, or unplayable. Classification is
/// total: malformed input never produces an error, it falls back to the
/// file-path branch the same way a relative path does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Embed(EmbedSource),
    NativeFile(NativeSource),
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSource {
    pub url: String,
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeSource {
    pub path: String,
    pub mime: MimeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Mp4,
    Webm,
    Ogg,
}

impl MimeType {
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Mp4 => "video/mp4",
            MimeType::Webm => "video/webm",
            MimeType::Ogg => "video/ogg",
        }
    }

    /// Extension-based guess. Unknown or missing extensions default to mp4.
    fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.ends_with(".webm") {
            MimeType::Webm
        } else if lower.ends_with(".ogv") || lower.ends_with(".ogg") {
            MimeType::Ogg
        } else {
            MimeType::Mp4
        }
    }
}

pub fn resolve(raw: &str) -> SourceKind {
    let Ok(parsed) = Url::parse(raw) else {
        // Not an absolute URL: treat it as a file path, passed through
        // unmodified.
        return native(raw);
    };

    let Some(host) = parsed.host_str() else {
        return native(raw);
    };
    let host = host.to_lowercase();

    if host.contains("youtu.be") {
        let id = parsed
            .path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        if id.is_empty() {
            return SourceKind::Invalid;
        }
        return embed(id);
    }

    if host.contains("youtube.com") {
        let mut id = String::new();
        for (key, value) in parsed.query_pairs() {
            if key == "v" {
                id = value.into_owned();
                break;
            }
        }
        if id.is_empty() {
            return SourceKind::Invalid;
        }
        return embed(&id);
    }

    // Any other host: self-hosted absolute video URL, played natively.
    native(raw)
}

fn native(path: &str) -> SourceKind {
    SourceKind::NativeFile(NativeSource {
        path: path.to_string(),
        mime: MimeType::from_path(path),
    })
}

fn embed(id: &str) -> SourceKind {
    SourceKind::Embed(EmbedSource {
        url: format!("https://www.youtube.com/embed/{id}?autoplay=1&rel=0"),
        video_id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_native(raw: &str) -> NativeSource {
        match resolve(raw) {
            SourceKind::NativeFile(source) => source,
            other => panic!("expected native classification, got {other:?}"),
        }
    }

    fn expect_embed(raw: &str) -> EmbedSource {
        match resolve(raw) {
            SourceKind::Embed(source) => source,
            other => panic!("expected embed classification, got {other:?}"),
        }
    }

    #[test]
    fn relative_path_passes_through_unchanged() {
        let source = expect_native("videos/demo.mp4");
        assert_eq!(source.path, "videos/demo.mp4");
        assert_eq!(source.mime, MimeType::Mp4);
    }

    #[test]
    fn short_link_host_extracts_path_segment() {
        let source = expect_embed("https://youtu.be/abc123");
        assert_eq!(source.video_id, "abc123");
        assert_eq!(
            source.url,
            "https://www.youtube.com/embed/abc123?autoplay=1&rel=0"
        );
    }

    #[test]
    fn watch_url_extracts_v_parameter() {
        let source = expect_embed("https://www.youtube.com/watch?v=abc123&t=42");
        assert_eq!(source.video_id, "abc123");
        assert!(source.url.contains("autoplay=1"));
    }

    #[test]
    fn short_link_without_segment_is_invalid() {
        assert_eq!(resolve("https://youtu.be/"), SourceKind::Invalid);
    }

    #[test]
    fn watch_url_without_v_is_invalid() {
        assert_eq!(
            resolve("https://www.youtube.com/playlist?list=xyz"),
            SourceKind::Invalid
        );
        assert_eq!(
            resolve("https://www.youtube.com/watch?v="),
            SourceKind::Invalid
        );
    }

    #[test]
    fn other_hosts_keep_the_original_string() {
        let source = expect_native("https://example.com/media/clip.webm?sig=1");
        assert_eq!(source.path, "https://example.com/media/clip.webm?sig=1");
    }

    #[test]
    fn mime_inference_from_extension() {
        assert_eq!(expect_native("clip.webm").mime, MimeType::Webm);
        assert_eq!(expect_native("clip.OGV").mime, MimeType::Ogg);
        assert_eq!(expect_native("clip.ogg").mime, MimeType::Ogg);
        assert_eq!(expect_native("clip.mp4").mime, MimeType::Mp4);
        assert_eq!(expect_native("clip").mime, MimeType::Mp4);
        assert_eq!(expect_native("clip.avi").mime, MimeType::Mp4);
    }

    #[test]
    fn hostless_absolute_urls_fall_back_to_native() {
        let source = expect_native("file:///home/user/demo.ogv");
        assert_eq!(source.path, "file:///home/user/demo.ogv");
        assert_eq!(source.mime, MimeType::Ogg);
    }
}
