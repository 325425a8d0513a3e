//! Axum HTTP surface: query strings in, JSON bodies out.
//!
//! Domain failures are reported in-band with 200; only malformed query
//! strings get a 400 (from axum's Query extractor). Empty numeric
//! parameters mean "not given".

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{de, Deserialize, Deserializer};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::Catalog;
use crate::error::ResolveError;
use crate::models::{
    ContentKind, ResolveRequest, ResolveResponse, SearchFilters, TranslatorsResponse,
};
use crate::resolver::Resolver;

/// Query parameters of `GET /resolve`
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub q: String,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub season: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub episode: Option<u32>,
    /// Signed so a negative position is a miss rather than a bad request
    #[serde(default, deserialize_with = "empty_as_none")]
    pub index: Option<i64>,
    #[serde(
        rename = "translatorId",
        alias = "translator_id",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub translator_id: Option<u32>,
}

impl TryFrom<ResolveParams> for ResolveRequest {
    type Error = ResolveError;

    fn try_from(params: ResolveParams) -> Result<Self, Self::Error> {
        let index = usize::try_from(params.index.unwrap_or(0)).map_err(|_| ResolveError::NotFound)?;

        Ok(ResolveRequest {
            query: params.q,
            filters: SearchFilters {
                kind: params.kind.as_deref().and_then(ContentKind::from_str_loose),
                year: params.year,
                index,
            },
            season: params.season.unwrap_or(1),
            episode: params.episode.unwrap_or(1),
            translator_id: params.translator_id,
        })
    }
}

/// Numeric query value where an empty string counts as absent
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Query parameters of `GET /translators`
#[derive(Debug, Deserialize)]
pub struct TranslatorsParams {
    pub q: String,
}

/// Build the service router
pub fn router<C: Catalog + 'static>(resolver: Arc<Resolver<C>>) -> Router {
    Router::new()
        .route("/resolve", get(resolve_handler::<C>))
        .route("/api/search", get(resolve_handler::<C>))
        .route("/translators", get(translators_handler::<C>))
        .route("/api/translators", get(translators_handler::<C>))
        .route("/health", get(health_handler::<C>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(resolver)
}

/// Serve until ctrl-c
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

/// GET /resolve: title query to stream links
async fn resolve_handler<C: Catalog + 'static>(
    State(resolver): State<Arc<Resolver<C>>>,
    Query(params): Query<ResolveParams>,
) -> Json<ResolveResponse> {
    let query = params.q.clone();
    match ResolveRequest::try_from(params) {
        Ok(request) => Json(resolver.resolve_media(&request).await),
        Err(e) => {
            error!(%query, error = %e, "resolution failed");
            Json(ResolveResponse::failed(e.to_string()))
        }
    }
}

/// GET /translators: translators of the first hit
async fn translators_handler<C: Catalog + 'static>(
    State(resolver): State<Arc<Resolver<C>>>,
    Query(params): Query<TranslatorsParams>,
) -> Json<TranslatorsResponse> {
    Json(resolver.list_translators(&params.q).await)
}

async fn health_handler<C: Catalog + 'static>(
    State(resolver): State<Arc<Resolver<C>>>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "authenticated": resolver.session().is_authenticated(),
    }))
}
