use regex::Regex;
use std::sync::LazyLock;

/// Marker path segment of a playback page.
pub const WATCH_SEGMENT: &str = "/watch/";

/// Numeric video id following "/watch/".
static RE_VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/watch/(\d+)").unwrap());

/// Extract the video id from a playback URL.
///
/// # Example
/// ```
/// assert_eq!(
///     shichou_parse::video_id("https://www.netflix.com/watch/80057281?trackId=1"),
///     Some("80057281")
/// );
/// ```
pub fn video_id(url: &str) -> Option<&str> {
    RE_VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether the URL points at a playback page.
pub fn is_watch_url(url: &str) -> bool {
    url.contains(WATCH_SEGMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id() {
        assert_eq!(video_id("https://www.netflix.com/watch/81564905"), Some("81564905"));
        assert_eq!(video_id("https://www.netflix.com/title/81564905"), None);
        assert_eq!(video_id("https://www.netflix.com/watch/abc"), None);
    }

    #[test]
    fn test_is_watch_url() {
        assert!(is_watch_url("https://www.netflix.com/watch/81564905"));
        assert!(!is_watch_url("https://www.netflix.com/browse"));
    }
}
