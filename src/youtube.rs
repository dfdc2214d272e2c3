use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::provider::{DirectTranscript, ProviderError, TrackKind, TranscriptProvider, TranscriptTrack};
use crate::{Segment, VideoId};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const WATCH_PATH: &str = "/watch";
const PLAYER_PATH: &str = "/youtubei/v1/player";
const TIMEDTEXT_PATH: &str = "/api/timedtext";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> String {
        if let Some(ref simple) = self.simple_text {
            return simple.clone();
        }
        self.runs
            .as_ref()
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl From<CaptionTrack> for TranscriptTrack {
    fn from(track: CaptionTrack) -> Self {
        let kind = match track.kind.as_deref() {
            Some("asr") => TrackKind::Generated,
            _ => TrackKind::Manual,
        };
        TranscriptTrack {
            language_name: track.name.map(|n| n.text()).unwrap_or_else(|| track.language_code.clone()),
            language_code: track.language_code,
            kind,
            handle: track.base_url.replace("&fmt=srv3", ""),
        }
    }
}

/// Caption provider backed by YouTube's InnerTube player API
pub struct YoutubeProvider {
    client: reqwest::Client,
    user_agent: String,
    base_url: String,
}

impl YoutubeProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the watch page, player and timedtext requests at another host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let body = self
            .client
            .get(url)
            .query(query)
            .header("User-Agent", &self.user_agent)
            .header("Accept-Language", "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    async fn fetch_player_response(&self, video_id: &VideoId) -> Result<InnerTubePlayerResponse, ProviderError> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        debug!("Fetching watch page for {video_id}");
        let page_html = self.get_text(&self.endpoint(WATCH_PATH), &[("v", video_id.as_str())]).await?;

        if page_html.contains("class=\"g-recaptcha\"") {
            return Err(ProviderError::Blocked);
        }

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": "en",
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp = self
            .client
            .post(self.endpoint(PLAYER_PATH))
            .query(&[("key", api_key.as_str()), ("prettyPrint", "false")])
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        serde_json::from_str(&resp).map_err(|e| ProviderError::Malformed(format!("player response: {e}")))
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeProvider {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TranscriptTrack>, ProviderError> {
        let resp = self.fetch_player_response(video_id).await?;
        caption_tracks(video_id, resp)
    }

    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<Segment>, ProviderError> {
        debug!(
            "Fetching caption track {} (lang={}, {})",
            track.language_name, track.language_code, track.kind
        );
        let caption_xml = self.get_text(&track.handle, &[]).await?;
        parse_caption_xml(&caption_xml)
    }

    async fn direct_fetch(&self, video_id: &VideoId, languages: &[String]) -> Result<DirectTranscript, ProviderError> {
        let url = self.endpoint(TIMEDTEXT_PATH);
        let mut last_fault = None;

        for lang in languages {
            for kind in [None, Some("asr")] {
                let mut query = vec![("v", video_id.as_str()), ("lang", lang.as_str())];
                if let Some(kind) = kind {
                    query.push(("kind", kind));
                }
                debug!("Direct timedtext fetch for {video_id}: lang={lang} kind={kind:?}");

                let segments = match self.get_text(&url, &query).await {
                    Ok(xml) => parse_caption_xml(&xml),
                    Err(e) => Err(e),
                };
                match segments {
                    Ok(segments) if !segments.is_empty() => {
                        return Ok(DirectTranscript {
                            segments,
                            language: Some(lang.clone()),
                        });
                    }
                    Ok(_) => {}
                    Err(e) => {
                        debug!("Timedtext lang={lang} kind={kind:?} failed: {e}");
                        last_fault = Some(e);
                    }
                }
            }
        }

        // a fault in any attempt is reported instead of NoTranscriptFound
        match last_fault {
            Some(e) => Err(e),
            None => Err(ProviderError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }),
        }
    }
}

fn caption_tracks(video_id: &VideoId, resp: InnerTubePlayerResponse) -> Result<Vec<TranscriptTrack>, ProviderError> {
    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if !tracks.is_empty() {
        return Ok(tracks.into_iter().map(TranscriptTrack::from).collect());
    }

    match resp.playability_status {
        Some(PlayabilityStatus {
            status: Some(status),
            reason,
        }) if status != "OK" => Err(ProviderError::VideoUnavailable {
            video_id: video_id.to_string(),
            reason: reason.unwrap_or(status),
        }),
        _ => Err(ProviderError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        }),
    }
}

fn extract_api_key(html: &str) -> Result<String, ProviderError> {
    let patterns = [
        r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#,
        // Fallback: try the newer pattern
        r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#,
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }

    Err(ProviderError::Malformed(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>, ProviderError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                // Some tracks omit `dur` on the final cue
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                // an empty cue leaves these set; whitespace after it is not cue text
                current_start = None;
                current_dur = None;
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.trim().is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: dur,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ProviderError::Malformed(format!("caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
