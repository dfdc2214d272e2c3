//! In-memory provider for resolver and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{DirectTranscript, ProviderError, TrackKind, TranscriptProvider, TranscriptTrack};
use crate::{Segment, VideoId};

#[derive(Default)]
pub(crate) struct FakeProvider {
    tracks: Vec<TranscriptTrack>,
    listing_fails: bool,
    segments: HashMap<String, Vec<Segment>>,
    direct: Option<DirectTranscript>,
    direct_fault: bool,
    fetched: Mutex<Vec<String>>,
    direct_calls: Mutex<usize>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push_track(&mut self, language: &str, kind: TrackKind) -> String {
        let handle = format!("{language}-{kind}-{}", self.tracks.len());
        self.tracks.push(TranscriptTrack {
            language_code: language.to_string(),
            language_name: language.to_string(),
            kind,
            handle: handle.clone(),
        });
        handle
    }

    /// A track whose fetch yields one segment per text
    pub(crate) fn with_track(mut self, language: &str, kind: TrackKind, texts: &[&str]) -> Self {
        let handle = self.push_track(language, kind);
        let segments = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Segment::new(*t, i as f64, 1.0))
            .collect();
        self.segments.insert(handle, segments);
        self
    }

    /// A listed track whose fetch always errors
    pub(crate) fn with_broken_track(mut self, language: &str, kind: TrackKind) -> Self {
        self.push_track(language, kind);
        self
    }

    pub(crate) fn with_listing_failure(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub(crate) fn with_direct(mut self, texts: &[&str], language: Option<&str>) -> Self {
        self.direct = Some(DirectTranscript {
            segments: texts.iter().map(|t| Segment::new(*t, 0.0, 1.0)).collect(),
            language: language.map(str::to_string),
        });
        self
    }

    pub(crate) fn with_direct_fault(mut self) -> Self {
        self.direct_fault = true;
        self
    }

    /// Handles of every track fetched so far, in order
    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub(crate) fn direct_calls(&self) -> usize {
        *self.direct_calls.lock().unwrap()
    }
}

#[async_trait]
impl TranscriptProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TranscriptTrack>, ProviderError> {
        if self.listing_fails {
            return Err(ProviderError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }
        Ok(self.tracks.clone())
    }

    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<Segment>, ProviderError> {
        self.fetched.lock().unwrap().push(track.handle.clone());
        self.segments
            .get(&track.handle)
            .cloned()
            .ok_or_else(|| ProviderError::Malformed(format!("no caption body for {}", track.handle)))
    }

    async fn direct_fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<DirectTranscript, ProviderError> {
        *self.direct_calls.lock().unwrap() += 1;
        if self.direct_fault {
            return Err(ProviderError::Malformed("timedtext body is not XML".to_string()));
        }
        self.direct.clone().ok_or_else(|| ProviderError::NoTranscriptFound {
            video_id: video_id.to_string(),
            languages: languages.to_vec(),
        })
    }
}
