//! YouTube video identifiers.
//!
//! Pulls the 11-character video ID out of the link formats people paste into
//! chats and forms: watch URLs, youtu.be short links, embed paths and the
//! privacy-enhanced youtube-nocookie.com domain.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?:https?://)?
        (?:(?:www|m)\.)?
        (?:youtube|youtu|youtube-nocookie)\.(?:com|be)/
        (?:watch\?v=|embed/|v/|shorts/|live/|.+\?v=)?
        ([^&=%?]{11})
        ",
    )
    .expect("Invalid regex")
});

/// Opaque 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the video ID from a YouTube URL.
///
/// Returns `None` when the text matches none of the recognised link shapes.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    VIDEO_ID_REGEX
        .captures(input.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}

/// Cheap check used to ignore chat messages that are clearly not links.
pub fn looks_like_youtube_url(input: &str) -> bool {
    input.contains("youtube") || input.contains("youtu.be")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(input: &str) -> Option<String> {
        extract_video_id(input).map(|v| v.to_string())
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("https://m.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_query_parameters_after_id_ignored() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("https://youtu.be/dQw4w9WgXcQ?si=abcdef"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_id_after_other_path_with_v_param() {
        assert_eq!(
            id("https://www.youtube.com/attribution_link?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_non_matching_input() {
        assert_eq!(id("not a url"), None);
        assert_eq!(id(""), None);
        assert_eq!(id("https://vimeo.com/123456789012"), None);
        assert_eq!(id("https://youtu.be/short"), None);
        assert_eq!(id("check this https://youtu.be/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_looks_like_youtube_url() {
        assert!(looks_like_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(looks_like_youtube_url("see youtube.com/watch"));
        assert!(!looks_like_youtube_url("hello there"));
    }

    #[test]
    fn test_watch_url() {
        let video = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
