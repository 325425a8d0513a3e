//! Catalog site access
//!
//! - `Catalog`: the operations the resolver needs from the site
//! - `rezka`: HDRezka implementation over reqwest + scraper
//! - `payload`: decoder for the obfuscated stream payload

pub mod payload;
pub mod rezka;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::models::{PlayerHandle, RawStreamData, SearchResult, StreamRequest};

pub use payload::decode_stream_payload;
pub use rezka::RezkaClient;

/// Operations against a streaming catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Establish an authenticated session
    async fn login(&self, login: &str, password: &str) -> Result<(), CatalogError>;

    /// Search the catalog, results in site order
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// Fetch the player session bound to a candidate's permalink
    async fn player(&self, candidate: &SearchResult) -> Result<PlayerHandle, CatalogError>;

    /// Request stream links in the given shape
    async fn stream(
        &self,
        handle: &PlayerHandle,
        request: StreamRequest,
    ) -> Result<RawStreamData, CatalogError>;
}
