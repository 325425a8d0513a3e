//! Shared fixtures: an in-process catalog with scripted answers

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rezka_resolver::{
    Catalog, CatalogError, PlayerHandle, RawQuality, RawStreamData, SearchResult, StreamRequest,
    Translator, TranslatorTable,
};

pub const MOVIE_URL: &str = "https://rezka.ag/films/fiction/2259-interstellar-2014.html";
pub const SERIES_URL: &str = "https://rezka.ag/series/thriller/646-breaking-bad-2008.html";

/// Catalog with scripted answers that records what it was asked
pub struct FakeCatalog {
    pub results: Vec<SearchResult>,
    pub search_fails: bool,
    pub handle: Option<PlayerHandle>,
    pub series_stream: Option<RawStreamData>,
    pub movie_stream: Option<RawStreamData>,
    pub accept_login: bool,
    pub logins: AtomicUsize,
    pub searches: AtomicUsize,
    pub players: Mutex<Vec<String>>,
    pub stream_requests: Mutex<Vec<StreamRequest>>,
}

impl FakeCatalog {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            search_fails: false,
            handle: Some(movie_handle()),
            series_stream: None,
            movie_stream: Some(raw_streams()),
            accept_login: true,
            logins: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            players: Mutex::new(Vec::new()),
            stream_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn stream_requests(&self) -> Vec<StreamRequest> {
        self.stream_requests.lock().unwrap().clone()
    }

    pub fn players(&self) -> Vec<String> {
        self.players.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn login(&self, _login: &str, _password: &str) -> Result<(), CatalogError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        if self.accept_login {
            Ok(())
        } else {
            Err(CatalogError::Rejected("Неверный логин или пароль".into()))
        }
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.search_fails {
            return Err(CatalogError::Status(503));
        }
        Ok(self.results.clone())
    }

    async fn player(&self, candidate: &SearchResult) -> Result<PlayerHandle, CatalogError> {
        self.players.lock().unwrap().push(candidate.url.clone());
        self.handle
            .clone()
            .map(|h| PlayerHandle {
                url: candidate.url.clone(),
                ..h
            })
            .ok_or(CatalogError::Status(404))
    }

    async fn stream(
        &self,
        _handle: &PlayerHandle,
        request: StreamRequest,
    ) -> Result<RawStreamData, CatalogError> {
        self.stream_requests.lock().unwrap().push(request);
        let scripted = match request {
            StreamRequest::Series { .. } => &self.series_stream,
            StreamRequest::Movie { .. } => &self.movie_stream,
        };
        scripted
            .clone()
            .ok_or_else(|| CatalogError::Rejected("Не удалось получить ссылку".into()))
    }
}

pub fn interstellar_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new("Интерстеллар", MOVIE_URL, "2014, США, Фантастика"),
        SearchResult::new(
            "Интерстеллар: Наука",
            "https://rezka.ag/films/documentary/7000-science-of-interstellar-2015.html",
            "2015, США, Документальные",
        ),
    ]
}

pub fn mixed_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new("Во все тяжкие (фильм)", MOVIE_URL, "2019, США"),
        SearchResult::new("Во все тяжкие", SERIES_URL, "2008 - 2013, США, Триллеры"),
    ]
}

pub fn translators() -> Vec<Translator> {
    vec![
        Translator {
            id: 110,
            name: "Оригинал".into(),
        },
        Translator {
            id: 56,
            name: "Дубляж".into(),
        },
    ]
}

pub fn movie_handle() -> PlayerHandle {
    PlayerHandle {
        post_id: 2259,
        url: MOVIE_URL.to_string(),
        default_translator_id: Some(110),
        series_page: false,
        translators: TranslatorTable::Listed(translators()),
    }
}

/// Ascending tiers with one mirror list, one junk value, mixed schemes
pub fn raw_streams() -> RawStreamData {
    let mut raw = RawStreamData::default();
    raw.push(
        "360p",
        RawQuality::Candidates(vec![
            "http://cdn.test/360.mp4:hls:manifest.m3u8".into(),
            "http://mirror.test/360.mp4".into(),
        ]),
    );
    raw.push("480p", RawQuality::Single("null".into()));
    raw.push("720p", RawQuality::Single("https://cdn.test/720.mp4".into()));
    raw.push(
        "1080p Ultra",
        RawQuality::Candidates(vec!["http://cdn.test/1080u.mp4".into()]),
    );
    raw
}
