//! Track selection for a video.
//!
//! The fallback order is an explicit list of strategies. `plan` expands them into an
//! ordered candidate list against the listed tracks; `resolve` fetches candidates in
//! that order and returns the first one yielding text. When listing itself fails, a
//! single direct fetch in the preferred languages is attempted instead.

use log::{debug, info, warn};

use crate::output::render_text;
use crate::provider::{ProviderError, TranscriptProvider, TranscriptTrack, find_generated, find_manual};
use crate::{DEFAULT_LANGUAGES, TranscriptError, TranscriptResult, VideoId};

/// One step of the track selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Manual track, scanning preferred languages in order
    ManualPreferred,
    /// Auto-generated track, scanning preferred languages in order
    GeneratedPreferred,
    /// Any manual track, provider order
    AnyManual,
    /// Any auto-generated track, provider order
    AnyGenerated,
}

impl Strategy {
    pub const ORDER: [Strategy; 4] = [
        Strategy::ManualPreferred,
        Strategy::GeneratedPreferred,
        Strategy::AnyManual,
        Strategy::AnyGenerated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ManualPreferred => "manual-in-language",
            Strategy::GeneratedPreferred => "generated-in-language",
            Strategy::AnyManual => "any-manual",
            Strategy::AnyGenerated => "any-generated",
        }
    }

    /// Tracks this strategy would try, best first
    pub fn candidates<'a>(&self, tracks: &'a [TranscriptTrack], languages: &[String]) -> Vec<&'a TranscriptTrack> {
        match self {
            Strategy::ManualPreferred => languages.iter().filter_map(|l| find_manual(tracks, l)).collect(),
            Strategy::GeneratedPreferred => languages.iter().filter_map(|l| find_generated(tracks, l)).collect(),
            Strategy::AnyManual => tracks.iter().filter(|t| t.is_manual()).collect(),
            Strategy::AnyGenerated => tracks.iter().filter(|t| t.is_generated()).collect(),
        }
    }
}

/// Every candidate track in the order it should be tried, each track at most once
pub fn plan<'a>(tracks: &'a [TranscriptTrack], languages: &[String]) -> Vec<(Strategy, &'a TranscriptTrack)> {
    let mut planned: Vec<(Strategy, &TranscriptTrack)> = Vec::new();
    for strategy in Strategy::ORDER {
        for track in strategy.candidates(tracks, languages) {
            if !planned.iter().any(|(_, seen)| std::ptr::eq(*seen, track)) {
                planned.push((strategy, track));
            }
        }
    }
    planned
}

/// The preference list actually used: the caller's, or the default when empty
pub fn effective_languages(languages: &[String]) -> Vec<String> {
    if languages.is_empty() {
        DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect()
    } else {
        languages.to_vec()
    }
}

/// Pick one transcript for `video_id` following the selection policy
pub async fn resolve<P>(
    provider: &P,
    video_id: &VideoId,
    languages: &[String],
) -> Result<TranscriptResult, TranscriptError>
where
    P: TranscriptProvider + ?Sized,
{
    let languages = effective_languages(languages);

    let tracks = match provider.list_tracks(video_id).await {
        Ok(tracks) => tracks,
        Err(e) => {
            info!("Listing tracks for {video_id} via {} failed: {e}", provider.name());
            return resolve_direct(provider, video_id, &languages, e).await;
        }
    };
    debug!("Video {video_id} has {} caption track(s)", tracks.len());

    for (strategy, track) in plan(&tracks, &languages) {
        debug!(
            "Trying {} track lang={} ({})",
            track.kind,
            track.language_code,
            strategy.name()
        );
        match provider.fetch_track(track).await {
            Ok(segments) => {
                let transcript = render_text(&segments);
                if transcript.is_empty() {
                    debug!("Track lang={} has no text, skipping", track.language_code);
                    continue;
                }
                return Ok(TranscriptResult::youtube(Some(track.language_code.clone()), transcript));
            }
            Err(e) => debug!("Fetching track lang={} failed: {e}", track.language_code),
        }
    }

    Err(TranscriptError::NotFound {
        video_id: video_id.to_string(),
        tried: Strategy::ORDER.iter().map(Strategy::name).collect(),
        detail: tracks.is_empty().then(|| "video lists no caption tracks".to_string()),
    })
}

async fn resolve_direct<P>(
    provider: &P,
    video_id: &VideoId,
    languages: &[String],
    list_err: ProviderError,
) -> Result<TranscriptResult, TranscriptError>
where
    P: TranscriptProvider + ?Sized,
{
    let not_found = |detail: String| TranscriptError::NotFound {
        video_id: video_id.to_string(),
        tried: vec!["list-tracks", "direct-fetch"],
        detail: Some(detail),
    };

    match provider.direct_fetch(video_id, languages).await {
        Ok(direct) => {
            let transcript = render_text(&direct.segments);
            if transcript.is_empty() {
                return Err(not_found(format!("{list_err}; direct fetch returned no text")));
            }
            let language = direct.language.or_else(|| languages.first().cloned());
            Ok(TranscriptResult::youtube(language, transcript))
        }
        Err(e) if e.is_not_found() => Err(not_found(format!("{list_err}; {e}"))),
        Err(e) => {
            warn!("Direct fetch for {video_id} failed: {e}");
            Err(TranscriptError::Internal(format!(
                "listing failed: {list_err}; direct fetch failed: {e}"
            )))
        }
    }
}
