use std::fmt;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use url::Url;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("video ID pattern is valid"));

/// An 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accept `candidate` only if it is exactly a video ID, nothing looser
    pub fn parse(candidate: &str) -> Option<Self> {
        VIDEO_ID_RE
            .is_match(candidate)
            .then(|| VideoId(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

enum HostKind {
    YouTube,
    ShortLink,
}

fn classify_host(host: &str) -> Option<HostKind> {
    let host = host.to_ascii_lowercase();
    if host == "youtube.com" || host.ends_with(".youtube.com") {
        Some(HostKind::YouTube)
    } else if host == "youtu.be" || host == "www.youtu.be" {
        Some(HostKind::ShortLink)
    } else {
        None
    }
}

/// Extract video ID from the supported YouTube URL formats:
///
/// - `https://www.youtube.com/watch?v=ID`
/// - `https://youtu.be/ID`
/// - `https://www.youtube.com/shorts/ID`
/// - `https://www.youtube.com/embed/ID`
///
/// Extra query parameters and trailing path segments are ignored. Malformed URLs
/// and other hosts yield `None`.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let url = match Url::parse(input.trim()) {
        Ok(url) => url,
        Err(e) => {
            debug!("Unparseable URL {input:?}: {e}");
            return None;
        }
    };

    let kind = classify_host(url.host_str()?)?;
    let mut segments = url.path().trim_matches('/').split('/');

    match kind {
        HostKind::YouTube => {
            let from_query = url
                .query_pairs()
                .find(|(k, v)| k == "v" && !v.is_empty())
                .and_then(|(_, v)| VideoId::parse(&v));
            if from_query.is_some() {
                return from_query;
            }

            match (segments.next(), segments.next()) {
                (Some("shorts" | "embed"), Some(candidate)) => VideoId::parse(candidate),
                _ => None,
            }
        }
        HostKind::ShortLink => segments.next().and_then(VideoId::parse),
    }
}
