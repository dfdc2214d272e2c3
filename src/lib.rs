pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod video_id;
pub mod youtube;

#[cfg(test)]
mod fake;

use serde::{Deserialize, Serialize};

pub use error::TranscriptError;
pub use video_id::{VideoId, extract_video_id};

/// Languages tried when the caller supplies none
pub const DEFAULT_LANGUAGES: &[&str] = &["en"];

/// Value of the `source` field in every response
pub const SOURCE_YOUTUBE: &str = "youtube";

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Response payload for a resolved transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub source: String,
    pub language: Option<String>,
    pub transcript: String,
}

impl TranscriptResult {
    pub fn youtube(language: Option<String>, transcript: String) -> Self {
        Self {
            source: SOURCE_YOUTUBE.to_string(),
            language,
            transcript,
        }
    }
}

/// Parse a comma-separated `languages` value into an ordered preference list.
///
/// Entries are trimmed and empty entries dropped; order and duplicates are kept
/// as given since the list is a priority order.
pub fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
