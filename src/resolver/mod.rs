//! Media resolution pipeline
//!
//! query -> search -> disambiguation -> player -> stream (series, then movie)
//! -> quality normalization.
//!
//! - `session`: best-effort login gate
//! - `disambiguate`: type/year/index narrowing
//! - `player`: player handle and translators
//! - `stream`: two-step stream fetch
//! - `quality`: https-only quality map and best tier

pub mod disambiguate;
pub mod player;
pub mod quality;
pub mod session;
pub mod stream;

use std::fmt;
use tracing::{debug, error, info};

use crate::api::Catalog;
use crate::error::ResolveError;
use crate::models::{ResolveRequest, ResolveResponse, ResolvedMedia, Translator, TranslatorsResponse};

pub use session::{AuthOutcome, SessionGate};

/// Pipeline position of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Idle,
    Searching,
    Disambiguating,
    ResolvingPlayer,
    ResolvingStream,
    Normalizing,
    Done,
}

impl fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolveStage::Idle => "idle",
            ResolveStage::Searching => "searching",
            ResolveStage::Disambiguating => "disambiguating",
            ResolveStage::ResolvingPlayer => "resolving player",
            ResolveStage::ResolvingStream => "resolving stream",
            ResolveStage::Normalizing => "normalizing",
            ResolveStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// A failed resolution and where it stopped
#[derive(Debug)]
pub struct ResolveFailure {
    pub stage: ResolveStage,
    pub error: ResolveError,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ResolveFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Stage cursor for one resolution
struct Progress {
    stage: ResolveStage,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: ResolveStage::Idle,
        }
    }

    fn enter(&mut self, next: ResolveStage) {
        debug!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }

    fn fail(&self, error: ResolveError) -> ResolveFailure {
        ResolveFailure {
            stage: self.stage,
            error,
        }
    }
}

/// Resolution facade: owns the catalog client and the session gate
pub struct Resolver<C> {
    catalog: C,
    session: SessionGate,
}

impl<C: Catalog> Resolver<C> {
    pub fn new(catalog: C, session: SessionGate) -> Self {
        Self { catalog, session }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    /// Resolve a title to playable links. Failures come back in-band.
    pub async fn resolve_media(&self, request: &ResolveRequest) -> ResolveResponse {
        self.session.ensure(&self.catalog).await;

        match self.try_resolve(request).await {
            Ok(media) => {
                info!("OK: {} ({})", media.title, media.url);
                ResolveResponse::Resolved(media)
            }
            Err(failure) => {
                error!(
                    query = %request.query,
                    stage = %failure.stage,
                    error = %failure.error,
                    "resolution failed"
                );
                ResolveResponse::failed(failure.error.to_string())
            }
        }
    }

    /// The pipeline without session handling or flattening
    pub async fn try_resolve(&self, request: &ResolveRequest) -> Result<ResolvedMedia, ResolveFailure> {
        let mut progress = Progress::new();

        progress.enter(ResolveStage::Searching);
        let results = self
            .catalog
            .search(&request.query)
            .await
            .map_err(|e| progress.fail(e.into()))?;

        progress.enter(ResolveStage::Disambiguating);
        let candidate = disambiguate::select(&results, &request.filters).map_err(|e| progress.fail(e))?;

        progress.enter(ResolveStage::ResolvingPlayer);
        let handle = player::resolve(&self.catalog, &candidate)
            .await
            .map_err(|e| progress.fail(e))?;
        let translators = player::list_translators(&handle);

        progress.enter(ResolveStage::ResolvingStream);
        let outcome = stream::fetch_stream(
            &self.catalog,
            &handle,
            request.season,
            request.episode,
            request.translator_id,
        )
        .await
        .map_err(|e| progress.fail(e))?;

        progress.enter(ResolveStage::Normalizing);
        let normalized = quality::normalize(&outcome.data);
        let qualities = normalized.qualities();

        progress.enter(ResolveStage::Done);
        Ok(ResolvedMedia {
            title: candidate.title,
            url: candidate.url,
            best_url: normalized.best_url,
            best_quality: normalized.best_quality,
            streams: normalized.streams,
            qualities,
            translators,
            is_series: outcome.is_series,
        })
    }

    /// Translators of the first search hit. Failures come back in-band.
    pub async fn list_translators(&self, query: &str) -> TranslatorsResponse {
        self.session.ensure(&self.catalog).await;

        match self.try_list_translators(query).await {
            Ok(translators) => TranslatorsResponse::listed(translators),
            Err(e) => {
                error!(query, error = %e, "translator listing failed");
                TranslatorsResponse::failed(e.to_string())
            }
        }
    }

    /// First hit, no disambiguation. No hits is an empty list, not an error.
    pub async fn try_list_translators(&self, query: &str) -> Result<Vec<Translator>, ResolveError> {
        let results = self.catalog.search(query).await?;
        let Some(first) = results.first() else {
            return Ok(Vec::new());
        };

        let handle = player::resolve(&self.catalog, first).await?;
        Ok(player::list_translators(&handle))
    }
}

impl<C> fmt::Debug for Resolver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
