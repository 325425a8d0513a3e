//! HDRezka catalog client
//!
//! Search and player pages are HTML (parsed with scraper); login and stream
//! requests go through the site's ajax endpoints. The session cookie set by
//! login lives in the client's cookie store.

use async_trait::async_trait;
use regex::Regex;
use reqwest::RequestBuilder;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::api::payload::decode_stream_payload;
use crate::api::Catalog;
use crate::config::Config;
use crate::error::CatalogError;
use crate::models::{
    PlayerHandle, RawStreamData, SearchResult, StreamRequest, Translator, TranslatorTable,
};

/// HDRezka client
pub struct RezkaClient {
    base_url: String,
    client: reqwest::Client,
}

impl RezkaClient {
    /// Create a client from process configuration
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            base_url: normalize_base(&config.host),
            client,
        })
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(&base_url.into()),
            client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a permalink against the catalog host
    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }

    /// Send a request and return the body of a successful response
    async fn fetch_text(&self, request: RequestBuilder) -> Result<String, CatalogError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Catalog for RezkaClient {
    async fn login(&self, login: &str, password: &str) -> Result<(), CatalogError> {
        let url = format!("{}/ajax/login/", self.base_url);
        let form = [
            ("login_name", login),
            ("login_password", password),
            ("login_not_save", "0"),
            ("login", "submit"),
        ];

        let body = self.fetch_text(self.client.post(&url).form(&form)).await?;

        // Non-JSON bodies are accepted; the cookie jar is what matters
        if let Ok(reply) = serde_json::from_str::<AjaxReply>(&body) {
            if !reply.success {
                return Err(CatalogError::Rejected(
                    reply.message.unwrap_or_else(|| "login refused".to_string()),
                ));
            }
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/search/?do=search&subaction=search&q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let html = self.fetch_text(self.client.get(&url)).await?;
        let results = parse_search_page(&html)?;

        debug!(query, count = results.len(), "catalog search");
        Ok(results)
    }

    async fn player(&self, candidate: &SearchResult) -> Result<PlayerHandle, CatalogError> {
        let url = self.absolute_url(&candidate.url);
        let html = self.fetch_text(self.client.get(&url)).await?;
        parse_player_page(&html, &url)
    }

    async fn stream(
        &self,
        handle: &PlayerHandle,
        request: StreamRequest,
    ) -> Result<RawStreamData, CatalogError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let url = format!("{}/ajax/get_cdn_series/?t={}", self.base_url, millis);

        let mut form: Vec<(&str, String)> = vec![("id", handle.post_id.to_string())];
        if let Some(translator_id) = request.translator_id() {
            form.push(("translator_id", translator_id.to_string()));
        }
        match request {
            StreamRequest::Series {
                season, episode, ..
            } => {
                form.push(("season", season.to_string()));
                form.push(("episode", episode.to_string()));
                form.push(("action", "get_stream".to_string()));
            }
            StreamRequest::Movie { .. } => {
                form.push(("action", "get_movie".to_string()));
            }
        }

        let body = self
            .fetch_text(
                self.client
                    .post(&url)
                    .header("Referer", handle.url.as_str())
                    .form(&form),
            )
            .await?;

        let reply: AjaxReply = serde_json::from_str(&body)
            .map_err(|e| CatalogError::InvalidResponse(format!("JSON parse error: {}", e)))?;
        if !reply.success {
            return Err(CatalogError::Rejected(
                reply.message.unwrap_or_else(|| "no stream".to_string()),
            ));
        }

        let payload = reply
            .url
            .as_str()
            .ok_or_else(|| CatalogError::Rejected("stream url missing".to_string()))?;
        Ok(decode_stream_payload(payload)?)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

/// Reply shape shared by the ajax endpoints
#[derive(Debug, Deserialize)]
struct AjaxReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    /// String payload, or `false` when there is no stream
    #[serde(default)]
    url: serde_json::Value,
}

// =============================================================================
// HTML Parsing
// =============================================================================

fn normalize_base(host: &str) -> String {
    host.trim().trim_end_matches('/').to_string()
}

fn selector(css: &str) -> Result<Selector, CatalogError> {
    Selector::parse(css)
        .map_err(|e| CatalogError::InvalidResponse(format!("bad selector {}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse search result cards in page order. Cards without a link are skipped.
pub fn parse_search_page(html: &str) -> Result<Vec<SearchResult>, CatalogError> {
    let document = Html::parse_document(html);
    let item_sel = selector(".b-content__inline_item")?;
    let link_sel = selector(".b-content__inline_item-link a")?;
    let info_sel = selector(".b-content__inline_item-link div")?;

    let mut results = Vec::new();
    for item in document.select(&item_sel) {
        let Some(link) = item.select(&link_sel).next() else {
            continue;
        };
        let url = link.value().attr("href").unwrap_or("").trim();
        if url.is_empty() {
            continue;
        }

        let info = item
            .select(&info_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        results.push(SearchResult::new(element_text(link), url, info));
    }

    Ok(results)
}

fn player_regex() -> Option<&'static Regex> {
    static RE: std::sync::OnceLock<Option<Regex>> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"initCDN(Series|Movies)Events\(\s*(\d+)\s*,\s*(\d+)").ok())
        .as_ref()
}

/// Parse a title page into a player handle
pub fn parse_player_page(html: &str, url: &str) -> Result<PlayerHandle, CatalogError> {
    let caps = player_regex()
        .and_then(|re| re.captures(html))
        .ok_or_else(|| CatalogError::InvalidResponse(format!("no player on {}", url)))?;

    let series_page = &caps[1] == "Series";
    let post_id: u64 = caps[2]
        .parse()
        .map_err(|_| CatalogError::InvalidResponse(format!("bad post id on {}", url)))?;
    let default_translator_id = caps[3].parse().ok();

    let document = Html::parse_document(html);

    Ok(PlayerHandle {
        post_id,
        url: url.to_string(),
        default_translator_id,
        series_page,
        translators: parse_translators(&document)?,
    })
}

fn parse_translators(document: &Html) -> Result<TranslatorTable, CatalogError> {
    let list_sel = selector("#translators-list")?;
    let item_sel = selector("[data-translator_id]")?;

    let Some(list) = document.select(&list_sel).next() else {
        return Ok(TranslatorTable::Missing);
    };

    let mut translators = Vec::new();
    for item in list.select(&item_sel) {
        let raw_id = item.value().attr("data-translator_id").unwrap_or("");
        let Ok(id) = raw_id.trim().parse::<u32>() else {
            return Ok(TranslatorTable::Malformed(format!(
                "translator id {:?} is not a number",
                raw_id
            )));
        };

        let name = item
            .value()
            .attr("title")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .unwrap_or_else(|| element_text(item));

        translators.push(Translator { id, name });
    }

    Ok(TranslatorTable::Listed(translators))
}
