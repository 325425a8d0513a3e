//! Stream retrieval with series -> movie fallback
//!
//! The series-shaped request is tried first; movies reject it, and the
//! movie-shaped request is the second step. Whichever succeeds decides
//! `is_series`; the player page's own kind is only cross-checked.

use tracing::debug;

use crate::api::Catalog;
use crate::error::ResolveError;
use crate::models::{PlayerHandle, RawStreamData, StreamRequest};

/// Raw stream data plus which request shape produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    pub data: RawStreamData,
    pub is_series: bool,
}

impl StreamOutcome {
    /// Whether the answering request shape agrees with the player page kind
    pub fn matches_page(&self, handle: &PlayerHandle) -> bool {
        self.is_series == handle.series_page
    }
}

/// The two request shapes, in attempt order
pub fn attempt_order(season: u32, episode: u32, translator_id: Option<u32>) -> [StreamRequest; 2] {
    [
        StreamRequest::Series {
            season,
            episode,
            translator_id,
        },
        StreamRequest::Movie { translator_id },
    ]
}

/// Fetch stream links for a handle. Without an explicit translator the
/// page's default track is requested.
pub async fn fetch_stream<C: Catalog + ?Sized>(
    catalog: &C,
    handle: &PlayerHandle,
    season: u32,
    episode: u32,
    translator_id: Option<u32>,
) -> Result<StreamOutcome, ResolveError> {
    let translator_id = translator_id.or(handle.default_translator_id);
    let [series, movie] = attempt_order(season, episode, translator_id);

    let outcome = match catalog.stream(handle, series).await {
        Ok(data) => StreamOutcome {
            data,
            is_series: true,
        },
        Err(e) => {
            debug!(error = %e, request = %series, "series-shaped request failed, trying movie");
            let data = catalog
                .stream(handle, movie)
                .await
                .map_err(|e| ResolveError::StreamUnavailable(e.to_string()))?;
            StreamOutcome {
                data,
                is_series: false,
            }
        }
    };

    if !outcome.matches_page(handle) {
        debug!(
            url = %handle.url,
            series_page = handle.series_page,
            is_series = outcome.is_series,
            "stream shape disagrees with player page"
        );
    }
    Ok(outcome)
}
