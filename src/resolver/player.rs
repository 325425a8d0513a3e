//! Player session lookup and translator enumeration

use tracing::{debug, warn};

use crate::api::Catalog;
use crate::error::ResolveError;
use crate::models::{PlayerHandle, SearchResult, Translator, TranslatorTable};

/// Fetch the player handle bound to a candidate
pub async fn resolve<C: Catalog + ?Sized>(
    catalog: &C,
    candidate: &SearchResult,
) -> Result<PlayerHandle, ResolveError> {
    let handle = catalog.player(candidate).await?;
    debug!(
        post_id = handle.post_id,
        series_page = handle.series_page,
        default_translator = ?handle.default_translator_id,
        "player resolved"
    );
    Ok(handle)
}

/// Translators offered by a handle. An absent or malformed association
/// yields an empty list; the reason is logged.
pub fn list_translators(handle: &PlayerHandle) -> Vec<Translator> {
    match &handle.translators {
        TranslatorTable::Listed(translators) => translators.clone(),
        TranslatorTable::Missing => {
            debug!(url = %handle.url, "no translator list on player page");
            Vec::new()
        }
        TranslatorTable::Malformed(reason) => {
            warn!(url = %handle.url, %reason, "Translators error");
            Vec::new()
        }
    }
}
