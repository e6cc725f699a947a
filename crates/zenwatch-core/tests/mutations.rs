//! End-to-end optimistic mutations against a mock backend.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::time::Duration;

use httpmock::MockServer;
use serde_json::{Value, json};
use zenwatch_api::types::{
    Article, ArticleFilters, Comment, ContentKind, LibraryFilters, LibraryPage, Paginated,
    ScrapeRequest, TriageBatch, User,
};
use zenwatch_api::{AccessToken, ApiClient, ClientConfig, TokenStore};
use zenwatch_core::{PollConfig, PollOutcome, ToastLevel, ZenWatch, keys};

fn client(server: &MockServer) -> ZenWatch {
    let tokens = TokenStore::with_token(AccessToken::bearer("tok"));
    let config = ClientConfig::new(&server.base_url()).unwrap();
    let api = ApiClient::with_tokens(config, tokens).unwrap();
    ZenWatch::new(api)
}

fn article_json(id: &str, bookmarked: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Article {id}"),
        "url": format!("https://example.com/{id}"),
        "score": 75.0,
        "is_bookmarked": bookmarked
    })
}

#[tokio::test]
async fn test_failed_bookmark_restores_every_snapshot() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/articles");
            then.status(200).json_body(json!({
                "items": [article_json("a1", true), article_json("a2", false)],
                "total": 2, "page": 1, "per_page": 20, "pages": 1
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/articles/a1");
            then.status(200).json_body(article_json("a1", true));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/library");
            let mut item = article_json("a1", true);
            item["type"] = json!("article");
            then.status(200)
                .json_body(json!({"items": [item], "total": 1, "unread_count": 1}));
        })
        .await;
    let bookmark = server
        .mock_async(|when, then| {
            when.method("POST").path("/api/articles/a1/bookmark");
            then.status(500).json_body(json!({"detail": "database unavailable"}));
        })
        .await;

    let zw = client(&server);
    let mut toasts = zw.notifier().subscribe();
    let filters = ArticleFilters::default();
    let feed_before = zw.articles(&filters).await.unwrap();
    let item_before = zw.article("a1").await.unwrap();
    let library_before = zw.library(&LibraryFilters::default()).await.unwrap();

    let result = zw.toggle_bookmark(ContentKind::Article, "a1").await;

    assert!(result.is_err());
    bookmark.assert_async().await;
    let cache = zw.cache();
    assert_eq!(
        cache.get::<Paginated<Article>>(&keys::articles(&filters)),
        Some(feed_before)
    );
    assert_eq!(
        cache.get::<Article>(&keys::item(ContentKind::Article, "a1")),
        Some(item_before)
    );
    assert_eq!(
        cache.get::<LibraryPage>(&keys::library(&LibraryFilters::default())),
        Some(library_before)
    );
    assert_eq!(toasts.recv().await.unwrap().level, ToastLevel::Error);
}

#[tokio::test]
async fn test_triage_dismiss_removes_item_and_decrements_remaining() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/triage");
            then.status(200).json_body(json!({
                "articles": [article_json("a1", false), article_json("a2", false)],
                "remaining_count": 5
            }));
        })
        .await;
    let dismiss = server
        .mock_async(|when, then| {
            when.method("POST").path("/api/triage/a1/dismiss");
            then.status(200).json_body(json!({"status": "ok"}));
        })
        .await;

    let zw = client(&server);
    let before = zw.triage().await.unwrap();
    assert_eq!(before.remaining_count, 5);

    zw.triage_dismiss("a1").await.unwrap();

    let after = zw.cache().get::<TriageBatch>(&keys::triage()).unwrap();
    assert_eq!(after.remaining_count, 4);
    assert!(after.articles.iter().all(|a| a.id != "a1"));
    assert_eq!(after.articles.len(), 1);
    dismiss.assert_async().await;
}

#[tokio::test]
async fn test_posted_comment_replaces_placeholder() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/comments/article/a1");
            then.status(200).json_body(json!([]));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/api/comments")
                .json_body(json!({
                    "content_type": "article",
                    "content_id": "a1",
                    "content": "Great read"
                }));
            then.status(201).json_body(json!({
                "id": 10,
                "user_id": 1,
                "username": "ada",
                "content_type": "article",
                "content_id": "a1",
                "content": "Great read",
                "created_at": "2026-01-01T00:00:00Z"
            }));
        })
        .await;

    let zw = client(&server);
    assert!(zw.comments(ContentKind::Article, "a1").await.unwrap().is_empty());

    let created = zw
        .post_comment(ContentKind::Article, "a1", None, "  Great read  ")
        .await
        .unwrap();

    let cached = zw
        .cache()
        .get::<Vec<Comment>>(&keys::comments(ContentKind::Article, "a1"))
        .unwrap();
    assert_eq!(created.id, 10);
    assert_eq!(cached, vec![created]);
    create.assert_async().await;
}

#[tokio::test]
async fn test_login_caches_user() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/api/auth/login");
            then.status(200).json_body(json!({
                "user": {"id": 1, "email": "ada@example.com", "username": "ada"},
                "access_token": "fresh",
                "token_type": "bearer"
            }));
        })
        .await;

    let api = ApiClient::new(ClientConfig::new(&server.base_url()).unwrap()).unwrap();
    let zw = ZenWatch::new(api);

    let user = zw.login("ada@example.com", "secret").await.unwrap();

    assert_eq!(user.username, "ada");
    assert_eq!(zw.cache().get::<User>(&keys::me()), Some(user));
    assert!(zw.tokens().is_signed_in());
}

#[tokio::test]
async fn test_invalid_login_is_rejected_locally() {
    let server = MockServer::start_async().await;
    let zw = client(&server);

    let err = zw.login("not-an-email", "").await.unwrap_err();

    assert!(matches!(err, zenwatch_core::Error::Validation(ref e) if e.len() == 2));
    assert!(zw.cache().get::<User>(&keys::me()).is_none());
}

#[tokio::test]
async fn test_scrape_trigger_and_watch() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/api/scraping/trigger");
            then.status(202)
                .json_body(json!({"task_id": "t1", "status": "pending"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/scraping/status/t1");
            then.status(200).json_body(json!({
                "task_id": "t1",
                "status": "success",
                "articles_saved": 5
            }));
        })
        .await;

    let zw = client(&server);
    let mut toasts = zw.notifier().subscribe();
    let config = PollConfig {
        interval: Duration::from_millis(10),
        max_attempts: 3,
    };

    let outcome = zw
        .trigger_and_watch(&ScrapeRequest::default(), &config)
        .await
        .unwrap();

    let PollOutcome::Finished { status, attempts } = outcome else {
        panic!("scrape did not finish");
    };
    assert_eq!(attempts, 1);
    assert_eq!(status.articles_saved, Some(5));
    assert_eq!(toasts.recv().await.unwrap().level, ToastLevel::Info);
    let done = toasts.recv().await.unwrap();
    assert_eq!(done.level, ToastLevel::Success);
    assert!(done.message.contains("5 articles"));
}
