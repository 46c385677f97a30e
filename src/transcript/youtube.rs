use super::Platform;
use crate::error::ImportError;
use crate::json_span::balanced_span;
use crate::url_to_text::fetchers::Fetcher;
use html_escape::decode_html_entities;
use log::{debug, warn};
use reqwest::Url;
use scraper::{Html, Selector};
use serde::Deserialize;

const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub vss_id: Option<String>,
}

impl CaptionTrack {
    fn is_english(&self) -> bool {
        let code = self.language_code.to_lowercase();
        code == "en"
            || code.starts_with("en-")
            || self
                .vss_id
                .as_deref()
                .map(|id| id.to_lowercase())
                .is_some_and(|id| id == ".en" || id == "a.en" || id.starts_with(".en.") || id.starts_with("a.en."))
    }
}

/// Retrieve the caption transcript of a YouTube video.
pub(crate) async fn fetch_transcript(fetcher: &dyn Fetcher, url: &str) -> Result<String, ImportError> {
    let watch_url = watch_url(url);
    debug!("Fetching YouTube watch page {}", watch_url);
    let page = fetcher.fetch(&watch_url).await?;

    let tracks = caption_tracks(&page);
    debug!("Found {} caption tracks", tracks.len());
    let track = select_track(&tracks).ok_or_else(|| ImportError::Transcript {
        platform: Platform::Youtube,
        url: url.to_string(),
        message: "the video has no caption tracks".to_string(),
    })?;

    let document = fetcher.fetch(&track.base_url).await?;
    let segments = caption_segments(&document);
    if segments.is_empty() {
        return Err(ImportError::Transcript {
            platform: Platform::Youtube,
            url: url.to_string(),
            message: "the caption track is empty".to_string(),
        });
    }

    Ok(segments.join(" "))
}

/// Canonical watch URL for any of the common YouTube link shapes.
pub(crate) fn watch_url(url: &str) -> String {
    match video_id(url) {
        Some(id) => format!("https://www.youtube.com/watch?v={id}"),
        None => url.to_string(),
    }
}

pub(crate) fn video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let id = if host == "youtu.be" || host.ends_with(".youtu.be") {
        segments.next().map(str::to_string)
    } else {
        match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    };
    id.filter(|id| !id.is_empty())
}

/// Caption track list embedded in the watch page's player response.
pub(crate) fn caption_tracks(page: &str) -> Vec<CaptionTrack> {
    let Some(marker) = page.find(CAPTION_TRACKS_MARKER) else {
        return Vec::new();
    };
    let after = &page[marker + CAPTION_TRACKS_MARKER.len()..];
    let Some((_, array)) = balanced_span(after, '[', ']') else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<CaptionTrack>>(array) {
        Ok(tracks) => tracks,
        Err(e) => {
            warn!("Could not parse YouTube caption tracks: {}", e);
            Vec::new()
        }
    }
}

/// English if available, otherwise whatever comes first.
pub(crate) fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|track| track.is_english())
        .or_else(|| tracks.first())
}

/// Text segments of a caption document, in document order.
///
/// Handles both the legacy `<text>` format and the newer `<p>` format.
pub(crate) fn caption_segments(document: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(document);
    let Ok(selector) = Selector::parse("text, p") else {
        return Vec::new();
    };

    fragment
        .select(&selector)
        .map(|element| {
            let raw = element.text().collect::<String>();
            // caption text arrives entity-encoded a second time
            let decoded = decode_html_entities(&raw).into_owned();
            decoded.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .filter(|segment| !segment.is_empty())
        .collect()
}
