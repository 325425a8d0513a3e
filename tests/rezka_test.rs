//! HDRezka client tests
//!
//! Search and player pages, the stream ajax endpoint, login, and a full
//! resolution against a mocked site.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mockito::{Matcher, Server};
use rezka_resolver::{
    Catalog, CatalogError, PlayerHandle, RawQuality, ResolveRequest, ResolveResponse, Resolver,
    RezkaClient, SearchResult, SessionGate, StreamRequest, TranslatorTable,
};

const SEARCH_PAGE: &str = r#"
<html><body>
  <div class="b-content__inline_items">
    <div class="b-content__inline_item" data-id="2259">
      <div class="b-content__inline_item-link">
        <a href="/films/fiction/2259-interstellar-2014.html">Интерстеллар</a>
        <div>2014, США, Фантастика</div>
      </div>
    </div>
    <div class="b-content__inline_item" data-id="9000">
      <div class="b-content__inline_item-link">
        <a href="/series/documentary/9000-interstellar-behind-2016.html">Интерстеллар: За кадром</a>
        <div>2016, Великобритания</div>
      </div>
    </div>
  </div>
</body></html>"#;

const MOVIE_PAGE: &str = r#"
<html><body>
  <div class="b-post__title"><h1>Интерстеллар</h1></div>
  <ul id="translators-list" class="b-translators__list">
    <li title="Оригинал (+субтитры)" class="b-translator__item active" data-translator_id="110">Оригинал (+субтитры)</li>
    <li title="Дубляж" class="b-translator__item" data-translator_id="56">Дубляж</li>
  </ul>
  <script>$(function () { sof.tv.initCDNMoviesEvents(2259, 110, 0, 0, 0, 'rezka.ag', false, {}); });</script>
</body></html>"#;

const PLAIN_STREAMS: &str = "[360p]http://stream.test/360.mp4:hls:manifest.m3u8 or http://stream.test/360.mp4,\
                             [720p]http://stream.test/720.mp4:hls:manifest.m3u8 or http://stream.test/720.mp4,\
                             [1080p]http://stream.test/1080.mp4:hls:manifest.m3u8 or http://stream.test/1080.mp4";

/// Encode like the site does: base64, `#h` prefix, junk between separators
fn obfuscated_streams() -> String {
    let encoded = STANDARD.encode(PLAIN_STREAMS);
    let (head, tail) = encoded.split_at(12);
    format!("#h{}//_//{}{}", head, STANDARD.encode("$$#"), tail)
}

fn movie_handle(base: &str) -> PlayerHandle {
    PlayerHandle {
        post_id: 2259,
        url: format!("{}/films/fiction/2259-interstellar-2014.html", base),
        default_translator_id: Some(110),
        series_page: false,
        translators: TranslatorTable::Missing,
    }
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_parses_results() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("do".into(), "search".into()),
            Matcher::UrlEncoded("subaction".into(), "search".into()),
            Matcher::UrlEncoded("q".into(), "Интерстеллар".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(SEARCH_PAGE)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let results = client.search("Интерстеллар").await.unwrap();

    mock.assert_async().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Интерстеллар");
    assert_eq!(results[0].url, "/films/fiction/2259-interstellar-2014.html");
    assert_eq!(results[0].info_snippet, "2014, США, Фантастика");
    assert!(results[1].is_series_link());
}

#[tokio::test]
async fn test_search_empty_query_skips_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let results = client.search("   ").await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_http_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let err = client.search("Interstellar").await.unwrap_err();

    assert!(matches!(err, CatalogError::Status(503)));
}

// =============================================================================
// Player Tests
// =============================================================================

#[tokio::test]
async fn test_player_page_relative_permalink() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/films/fiction/2259-interstellar-2014.html")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(MOVIE_PAGE)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let candidate = SearchResult::new(
        "Интерстеллар",
        "/films/fiction/2259-interstellar-2014.html",
        "2014",
    );
    let handle = client.player(&candidate).await.unwrap();

    mock.assert_async().await;

    assert_eq!(handle.post_id, 2259);
    assert_eq!(handle.default_translator_id, Some(110));
    assert!(!handle.series_page);
    assert_eq!(
        handle.url,
        format!("{}/films/fiction/2259-interstellar-2014.html", server.url())
    );
    match handle.translators {
        TranslatorTable::Listed(list) => {
            assert_eq!(list.len(), 2);
            assert_eq!(list[0].id, 110);
            assert_eq!(list[0].name, "Оригинал (+субтитры)");
            assert_eq!(list[1].id, 56);
        }
        other => panic!("expected listed translators, got {:?}", other),
    }
}

#[tokio::test]
async fn test_player_page_without_player_is_invalid() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/films/x.html")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html><body>Доступ ограничен</body></html>")
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let err = client
        .player(&SearchResult::new("x", "/films/x.html", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::InvalidResponse(_)));
}

// =============================================================================
// Stream Tests
// =============================================================================

#[tokio::test]
async fn test_series_stream_request_form() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/ajax/get_cdn_series/")
        .match_query(Matcher::Regex("t=\\d+".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("id=2259".into()),
            Matcher::Regex("translator_id=56".into()),
            Matcher::Regex("season=2".into()),
            Matcher::Regex("episode=5".into()),
            Matcher::Regex("action=get_stream".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({"success": true, "message": "", "url": obfuscated_streams()})
                .to_string(),
        )
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let data = client
        .stream(
            &movie_handle(&server.url()),
            StreamRequest::Series {
                season: 2,
                episode: 5,
                translator_id: Some(56),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;

    let labels: Vec<&str> = data.entries.iter().map(|(q, _)| q.as_str()).collect();
    assert_eq!(labels, vec!["360p", "720p", "1080p"]);
    assert_eq!(
        data.entries[2].1,
        RawQuality::Candidates(vec![
            "http://stream.test/1080.mp4:hls:manifest.m3u8".to_string(),
            "http://stream.test/1080.mp4".to_string(),
        ])
    );
}

#[tokio::test]
async fn test_movie_stream_request_form() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/ajax/get_cdn_series/")
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("action=get_movie".into()),
            Matcher::Regex("translator_id=110".into()),
        ]))
        .with_status(200)
        .with_body(serde_json::json!({"success": true, "url": PLAIN_STREAMS}).to_string())
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let data = client
        .stream(
            &movie_handle(&server.url()),
            StreamRequest::Movie {
                translator_id: Some(110),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(data.len(), 3);
}

#[tokio::test]
async fn test_stream_rejected() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/ajax/get_cdn_series/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success": false, "message": "Ошибка получения ссылки", "url": false}"#)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let err = client
        .stream(
            &movie_handle(&server.url()),
            StreamRequest::Movie {
                translator_id: None,
            },
        )
        .await
        .unwrap_err();

    match err {
        CatalogError::Rejected(message) => assert_eq!(message, "Ошибка получения ссылки"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_invalid_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/ajax/get_cdn_series/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>captcha</html>")
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let err = client
        .stream(
            &movie_handle(&server.url()),
            StreamRequest::Movie {
                translator_id: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::InvalidResponse(_)));
}

// =============================================================================
// Login Tests
// =============================================================================

#[tokio::test]
async fn test_login_posts_credentials() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/ajax/login/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("login_name=user".into()),
            Matcher::Regex("login_password=secret".into()),
            Matcher::Regex("login_not_save=0".into()),
            Matcher::Regex("login=submit".into()),
        ]))
        .with_status(200)
        .with_header("set-cookie", "dle_user_id=1; path=/")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    client.login("user", "secret").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_refused() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/ajax/login/")
        .with_status(200)
        .with_body(r#"{"success": false, "message": "Неверный логин или пароль"}"#)
        .create_async()
        .await;

    let client = RezkaClient::with_base_url(server.url());
    let err = client.login("user", "wrong").await.unwrap_err();

    assert!(matches!(err, CatalogError::Rejected(ref m) if m.contains("Неверный")));
}

// =============================================================================
// Full Pipeline
// =============================================================================

#[tokio::test]
async fn test_resolve_movie_end_to_end() {
    let mut server = Server::new_async().await;

    let _search = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_PAGE)
        .create_async()
        .await;
    let _page = server
        .mock("GET", "/films/fiction/2259-interstellar-2014.html")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(MOVIE_PAGE)
        .create_async()
        .await;
    let series_attempt = server
        .mock("POST", "/ajax/get_cdn_series/")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("action=get_stream".into()))
        .with_status(200)
        .with_body(r#"{"success": false, "message": "not a series", "url": false}"#)
        .expect(1)
        .create_async()
        .await;
    let movie_attempt = server
        .mock("POST", "/ajax/get_cdn_series/")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("action=get_movie".into()))
        .with_status(200)
        .with_body(serde_json::json!({"success": true, "url": obfuscated_streams()}).to_string())
        .expect(1)
        .create_async()
        .await;

    let resolver = Resolver::new(
        RezkaClient::with_base_url(server.url()),
        SessionGate::anonymous(),
    );
    let response = resolver
        .resolve_media(&ResolveRequest::new("Interstellar"))
        .await;

    series_attempt.assert_async().await;
    movie_attempt.assert_async().await;

    let media = match response {
        ResolveResponse::Resolved(media) => media,
        ResolveResponse::Failed { error, .. } => panic!("resolution failed: {}", error),
    };
    assert_eq!(media.title, "Интерстеллар");
    assert!(!media.is_series);
    assert_eq!(media.best_quality, "1080p");
    assert_eq!(
        media.best_url,
        "https://stream.test/1080.mp4:hls:manifest.m3u8"
    );
    assert_eq!(media.qualities, vec!["360p", "720p", "1080p"]);
    assert_eq!(media.translators.len(), 2);
}
