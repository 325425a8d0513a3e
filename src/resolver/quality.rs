//! Quality map normalization
//!
//! Takes the first candidate per tier, drops non-URL values and upgrades
//! every link to https.

use crate::models::{RawStreamData, StreamQualityMap};

const INSECURE_SCHEME: &str = "http://";
const SECURE_SCHEME: &str = "https://";

/// Normalized quality map with the chosen best tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedStreams {
    pub streams: StreamQualityMap,
    /// Empty when `streams` is empty
    pub best_quality: String,
    /// Empty when `streams` is empty
    pub best_url: String,
}

impl NormalizedStreams {
    pub fn qualities(&self) -> Vec<String> {
        self.streams.keys().map(String::from).collect()
    }
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with(INSECURE_SCHEME) || url.starts_with(SECURE_SCHEME)
}

/// Rewrite every insecure scheme marker to the secure one
pub fn to_secure(url: &str) -> String {
    url.replace(INSECURE_SCHEME, SECURE_SCHEME)
}

/// Best tier is the last one listed: upstream orders tiers ascending.
/// This is an ordering assumption, not a bitrate comparison.
pub fn best_quality(streams: &StreamQualityMap) -> Option<(&str, &str)> {
    streams.last()
}

pub fn normalize(raw: &RawStreamData) -> NormalizedStreams {
    let mut streams = StreamQualityMap::new();
    for (quality, value) in &raw.entries {
        let Some(url) = value.primary().map(str::trim) else {
            continue;
        };
        if !is_http_url(url) {
            continue;
        }
        streams.insert(quality.as_str(), to_secure(url));
    }

    let (best_quality, best_url) = best_quality(&streams)
        .map(|(q, u)| (q.to_string(), u.to_string()))
        .unwrap_or_default();

    NormalizedStreams {
        streams,
        best_quality,
        best_url,
    }
}
