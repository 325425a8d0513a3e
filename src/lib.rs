//! rezka-resolver - title in, playable stream link out
//!
//! Searches the HDRezka catalog for a free-text title, picks the intended
//! hit, and returns its stream links per quality tier along with the
//! available translators.
//!
//! # Modules
//!
//! - `models` - Search results, translators, quality maps, response bodies
//! - `api` - Catalog trait and the HDRezka client
//! - `resolver` - The resolution pipeline and its facade
//! - `server` - HTTP surface
//! - `config` - Configuration loading
//! - `cli` / `commands` - Command line entry points

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod server;

// Re-export commonly used types
pub use models::{
    ContentKind, PlayerHandle, RawQuality, RawStreamData, ResolveRequest, ResolveResponse,
    ResolvedMedia, SearchFilters, SearchResult, StreamQualityMap, StreamRequest, Translator,
    TranslatorTable, TranslatorsResponse,
};

pub use api::{Catalog, RezkaClient};
pub use config::Config;
pub use error::{CatalogError, PayloadError, ResolveError};
pub use resolver::{Resolver, SessionGate};

/// Log filter used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "rezka_resolver=info,tower_http=info";
