use std::fmt;

use async_trait::async_trait;

use crate::{Segment, VideoId};

/// How a caption track was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Manual,
    Generated,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Manual => write!(f, "manual"),
            TrackKind::Generated => write!(f, "auto-generated"),
        }
    }
}

/// A caption track as listed by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTrack {
    pub language_code: String,
    pub language_name: String,
    pub kind: TrackKind,
    /// Provider-specific locator used by `fetch_track`
    pub handle: String,
}

impl TranscriptTrack {
    pub fn is_manual(&self) -> bool {
        self.kind == TrackKind::Manual
    }

    pub fn is_generated(&self) -> bool {
        self.kind == TrackKind::Generated
    }

    fn matches_language(&self, language: &str) -> bool {
        self.language_code.eq_ignore_ascii_case(language)
    }
}

/// Segments returned by the secondary fetch pathway
#[derive(Debug, Clone, PartialEq)]
pub struct DirectTranscript {
    pub segments: Vec<Segment>,
    /// Language the provider reports for the segments, if any
    pub language: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("transcripts are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error("video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("no transcript found for video {video_id} in languages [{}]", .languages.join(", "))]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("request blocked by YouTube (captcha or bot check)")]
    Blocked,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether this error means "nothing to fetch" rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProviderError::TranscriptsDisabled { .. }
                | ProviderError::VideoUnavailable { .. }
                | ProviderError::NoTranscriptFound { .. }
        )
    }
}

/// Source of caption tracks and their segments
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// List every caption track available for a video, in provider order
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TranscriptTrack>, ProviderError>;

    /// Fetch the segments of one listed track
    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<Segment>, ProviderError>;

    /// Fetch segments without listing first; used when listing is unsupported
    async fn direct_fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<DirectTranscript, ProviderError>;
}

/// First manually created track in `language`
pub fn find_manual<'a>(tracks: &'a [TranscriptTrack], language: &str) -> Option<&'a TranscriptTrack> {
    tracks
        .iter()
        .find(|t| t.is_manual() && t.matches_language(language))
}

/// First auto-generated track in `language`
pub fn find_generated<'a>(tracks: &'a [TranscriptTrack], language: &str) -> Option<&'a TranscriptTrack> {
    tracks
        .iter()
        .find(|t| t.is_generated() && t.matches_language(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(language: &str, kind: TrackKind, handle: &str) -> TranscriptTrack {
        TranscriptTrack {
            language_code: language.to_string(),
            language_name: language.to_string(),
            kind,
            handle: handle.to_string(),
        }
    }

    #[test]
    fn test_find_manual() {
        let tracks = vec![
            track("en", TrackKind::Generated, "a"),
            track("en", TrackKind::Manual, "b"),
            track("en", TrackKind::Manual, "c"),
        ];
        assert_eq!(find_manual(&tracks, "en").map(|t| t.handle.as_str()), Some("b"));
        assert!(find_manual(&tracks, "de").is_none());
    }

    #[test]
    fn test_find_generated() {
        let tracks = vec![track("es", TrackKind::Manual, "a"), track("es", TrackKind::Generated, "b")];
        assert_eq!(find_generated(&tracks, "es").map(|t| t.handle.as_str()), Some("b"));
        assert!(find_generated(&tracks, "en").is_none());
    }

    #[test]
    fn test_language_match_ignores_case() {
        let tracks = vec![track("pt-BR", TrackKind::Manual, "a")];
        assert!(find_manual(&tracks, "pt-br").is_some());
        assert!(find_manual(&tracks, "pt").is_none());
    }

    #[test]
    fn test_not_found_classification() {
        let disabled = ProviderError::TranscriptsDisabled {
            video_id: "dQw4w9WgXcQ".to_string(),
        };
        assert!(disabled.is_not_found());
        assert!(!ProviderError::Blocked.is_not_found());
        assert!(!ProviderError::Malformed("bad json".to_string()).is_not_found());
    }

    #[test]
    fn test_no_transcript_found_message() {
        let err = ProviderError::NoTranscriptFound {
            video_id: "dQw4w9WgXcQ".to_string(),
            languages: vec!["en".to_string(), "es".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no transcript found for video dQw4w9WgXcQ in languages [en, es]"
        );
    }

    #[test]
    fn test_track_kind_display() {
        assert_eq!(TrackKind::Manual.to_string(), "manual");
        assert_eq!(TrackKind::Generated.to_string(), "auto-generated");
    }
}
