//! Data structures shared across the resolver
//!
//! Organized by pipeline stage:
//! - **Search**: catalog hits and the filters used to pick one
//! - **Player**: translators and the per-title player handle
//! - **Streams**: raw quality payloads and the normalized quality map
//! - **Responses**: the JSON bodies returned to callers

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Search Models
// =============================================================================

/// Path segment the catalog uses for series permalinks
pub const SERIES_PATH_MARKER: &str = "/series/";

/// Path segment the catalog uses for movie permalinks
pub const MOVIE_PATH_MARKER: &str = "/films/";

/// One catalog search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    /// Catalog permalink; its path tells movies from series
    pub url: String,
    /// Free-text metadata line, usually "2014, USA, Sci-Fi"
    pub info_snippet: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        info_snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            info_snippet: info_snippet.into(),
        }
    }

    /// Whether the permalink points into the series section
    pub fn is_series_link(&self) -> bool {
        self.url.contains(SERIES_PATH_MARKER)
    }

    /// Whether the permalink points into the movies section
    pub fn is_movie_link(&self) -> bool {
        self.url.contains(MOVIE_PATH_MARKER)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.url)
    }
}

/// Content type filter for disambiguation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Parse a caller-supplied type string; "tv" is accepted for series.
    /// Anything unrecognized means "no filter".
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "film" | "films" => Some(ContentKind::Movie),
            "series" | "tv" => Some(ContentKind::Series),
            _ => None,
        }
    }

    /// Permalink path segment for this kind
    pub fn path_marker(&self) -> &'static str {
        match self {
            ContentKind::Movie => MOVIE_PATH_MARKER,
            ContentKind::Series => SERIES_PATH_MARKER,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Movie => write!(f, "movie"),
            ContentKind::Series => write!(f, "series"),
        }
    }
}

/// Narrowing signals applied to search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub kind: Option<ContentKind>,
    pub year: Option<String>,
    pub index: usize,
}

/// Everything a caller can ask of `resolve`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub query: String,
    pub filters: SearchFilters,
    pub season: u32,
    pub episode: u32,
    pub translator_id: Option<u32>,
}

impl ResolveRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: SearchFilters::default(),
            season: 1,
            episode: 1,
            translator_id: None,
        }
    }
}

// =============================================================================
// Player Models
// =============================================================================

/// An alternate audio/subtitle track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translator {
    pub id: u32,
    pub name: String,
}

impl fmt::Display for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// Translator association as read from a player page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorTable {
    Listed(Vec<Translator>),
    /// Page carries no translator list (single-track titles)
    Missing,
    /// List present but an entry could not be read
    Malformed(String),
}

/// Per-title player session from which translators and streams are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHandle {
    pub post_id: u64,
    pub url: String,
    /// Track the page selects when none is requested
    pub default_translator_id: Option<u32>,
    /// Page initializes the series player
    pub series_page: bool,
    pub translators: TranslatorTable,
}

/// Shape of a stream request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRequest {
    Series {
        season: u32,
        episode: u32,
        translator_id: Option<u32>,
    },
    Movie {
        translator_id: Option<u32>,
    },
}

impl StreamRequest {
    pub fn translator_id(&self) -> Option<u32> {
        match self {
            StreamRequest::Series { translator_id, .. } | StreamRequest::Movie { translator_id } => {
                *translator_id
            }
        }
    }
}

impl fmt::Display for StreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRequest::Series {
                season, episode, ..
            } => write!(f, "series S{:02}E{:02}", season, episode),
            StreamRequest::Movie { .. } => write!(f, "movie"),
        }
    }
}

// =============================================================================
// Stream Models
// =============================================================================

/// Raw value of one quality entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawQuality {
    Single(String),
    /// Mirrors for the same tier, preferred first
    Candidates(Vec<String>),
}

impl RawQuality {
    /// The URL the normalizer should consider for this entry
    pub fn primary(&self) -> Option<&str> {
        match self {
            RawQuality::Single(url) => Some(url.as_str()),
            RawQuality::Candidates(urls) => urls.first().map(String::as_str),
        }
    }
}

/// Quality label to URL(s), in the order the upstream payload lists them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStreamData {
    pub entries: Vec<(String, RawQuality)>,
}

impl RawStreamData {
    pub fn push(&mut self, quality: impl Into<String>, value: RawQuality) {
        self.entries.push((quality.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<&StreamQualityMap> for RawStreamData {
    fn from(map: &StreamQualityMap) -> Self {
        Self {
            entries: map
                .iter()
                .map(|(q, u)| (q.to_string(), RawQuality::Single(u.to_string())))
                .collect(),
        }
    }
}

/// Ordered quality label to URL map
///
/// Keeps insertion order (discovery order upstream). Re-inserting an existing
/// label replaces its URL in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamQualityMap {
    entries: Vec<(String, String)>,
}

impl StreamQualityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quality: impl Into<String>, url: impl Into<String>) {
        let quality = quality.into();
        let url = url.into();
        match self.entries.iter_mut().find(|(q, _)| *q == quality) {
            Some(entry) => entry.1 = url,
            None => self.entries.push((quality, url)),
        }
    }

    pub fn get(&self, quality: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == quality)
            .map(|(_, u)| u.as_str())
    }

    /// Last entry in insertion order
    pub fn last(&self) -> Option<(&str, &str)> {
        self.entries.last().map(|(q, u)| (q.as_str(), u.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, u)| (q.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StreamQualityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (quality, url) in &self.entries {
            map.serialize_entry(quality, url)?;
        }
        map.end()
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Successful resolution of a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMedia {
    pub title: String,
    pub url: String,
    #[serde(rename = "stream")]
    pub best_url: String,
    #[serde(rename = "quality")]
    pub best_quality: String,
    pub streams: StreamQualityMap,
    pub qualities: Vec<String>,
    pub translators: Vec<Translator>,
    pub is_series: bool,
}

impl fmt::Display for ResolvedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quality = if self.best_quality.is_empty() {
            "no stream"
        } else {
            self.best_quality.as_str()
        };
        write!(f, "{} [{}] ({})", self.title, quality, self.url)
    }
}

/// Body of the resolve operation: the media, or an in-band failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Resolved(ResolvedMedia),
    Failed {
        error: String,
        /// Always empty; kept for the established response shape
        results: Vec<SearchResult>,
    },
}

impl ResolveResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        ResolveResponse::Failed {
            error: error.into(),
            results: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ResolveResponse::Failed { .. })
    }
}

/// Body of the translators operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslatorsResponse {
    pub translators: Vec<Translator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslatorsResponse {
    pub fn listed(translators: Vec<Translator>) -> Self {
        Self {
            translators,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            translators: Vec::new(),
            error: Some(error.into()),
        }
    }
}
