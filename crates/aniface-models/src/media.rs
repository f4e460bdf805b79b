//! Media-kind classification from file extensions.
//!
//! The pipeline decides how to process an input purely from the locator's
//! file extension: `.gif` gets the GIF frame strategy, the known video
//! extensions get the ffmpeg strategy, and anything else with an extension
//! is treated as a still image. A locator with no extension is invalid.

use std::path::Path;

/// File extensions the pipeline treats as video input.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "flv", "mkv", "webm"];

/// How a media locator will be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Single still image, scanned directly with no frame materialization.
    Image,
    /// Animated GIF, decoded frame-by-frame with a sampling stride.
    Gif,
    /// Video file, frames extracted by an external ffmpeg process.
    Video,
}

impl MediaKind {
    /// Classify a locator by its file extension.
    ///
    /// Extensions are matched as given (lowercase). Returns `None` when the
    /// locator carries no extension at all, which callers must reject.
    pub fn classify(locator: &str) -> Option<MediaKind> {
        let ext = extension(locator)?;
        if ext == "gif" {
            return Some(MediaKind::Gif);
        }
        if VIDEO_EXTENSIONS.contains(&ext) {
            return Some(MediaKind::Video);
        }
        Some(MediaKind::Image)
    }
}

/// File extension of a locator (path or URL), without the leading dot.
pub fn extension(locator: &str) -> Option<&str> {
    Path::new(locator).extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_gif() {
        assert_eq!(MediaKind::classify("clip.gif"), Some(MediaKind::Gif));
        assert_eq!(
            MediaKind::classify("https://example.com/art/clip.gif"),
            Some(MediaKind::Gif)
        );
    }

    #[test]
    fn test_classify_video() {
        for ext in VIDEO_EXTENSIONS {
            let locator = format!("movie.{ext}");
            assert_eq!(MediaKind::classify(&locator), Some(MediaKind::Video));
        }
    }

    #[test]
    fn test_classify_image_fallthrough() {
        assert_eq!(MediaKind::classify("art.png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::classify("art.jpg"), Some(MediaKind::Image));
        // Unknown extensions fall through to the still-image strategy.
        assert_eq!(MediaKind::classify("art.xyz"), Some(MediaKind::Image));
    }

    #[test]
    fn test_classify_no_extension() {
        assert_eq!(MediaKind::classify("noextension"), None);
        assert_eq!(MediaKind::classify(""), None);
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a/b/c.mp4"), Some("mp4"));
        assert_eq!(extension("https://host/x.webm"), Some("webm"));
        assert_eq!(extension("plain"), None);
    }
}
