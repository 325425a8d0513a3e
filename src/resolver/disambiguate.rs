//! Narrow search results to one target
//!
//! Permissive substring heuristics: the catalog's metadata formatting is not
//! stable, so an over-restrictive filter falls back instead of failing.

use crate::error::ResolveError;
use crate::models::{ContentKind, SearchFilters, SearchResult};

/// Pick one candidate by type, then year, then index.
pub fn select(results: &[SearchResult], filters: &SearchFilters) -> Result<SearchResult, ResolveError> {
    let candidates = restrict_by_kind(results, filters.kind);

    let by_year = filters
        .year
        .as_deref()
        .filter(|y| !y.is_empty())
        .and_then(|year| match_year(&candidates, year));

    by_year
        .or_else(|| candidates.get(filters.index).copied())
        .cloned()
        .ok_or(ResolveError::NotFound)
}

/// Keep results whose permalink carries the kind's path marker. An empty
/// restriction returns the unfiltered set.
pub fn restrict_by_kind(results: &[SearchResult], kind: Option<ContentKind>) -> Vec<&SearchResult> {
    let all: Vec<&SearchResult> = results.iter().collect();
    let Some(kind) = kind else {
        return all;
    };

    let marker = kind.path_marker();
    let restricted: Vec<&SearchResult> = results.iter().filter(|r| r.url.contains(marker)).collect();
    if restricted.is_empty() {
        all
    } else {
        restricted
    }
}

/// First candidate whose info snippet or permalink contains `year`
pub fn match_year<'a>(candidates: &[&'a SearchResult], year: &str) -> Option<&'a SearchResult> {
    candidates
        .iter()
        .find(|r| r.info_snippet.contains(year) || r.url.contains(year))
        .copied()
}
