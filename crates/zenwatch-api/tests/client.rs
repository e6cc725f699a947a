//! Integration tests for the request core against a mock backend.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use httpmock::MockServer;
use serde_json::json;
use url::Url;
use zenwatch_api::types::{ArticleFilters, LoginRequest};
use zenwatch_api::{AccessToken, ApiClient, ClientConfig, Error, SessionEvent, TokenStore};
use zenwatch_auth::{OAuthFlow, OAuthProvider};

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "ada@example.com",
        "username": "ada",
        "is_admin": false
    })
}

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    let tokens = token.map_or_else(TokenStore::new, |t| {
        TokenStore::with_token(AccessToken::bearer(t))
    });
    ApiClient::with_tokens(ClientConfig::new(&server.base_url()).unwrap(), tokens).unwrap()
}

#[tokio::test]
async fn test_bearer_header_is_attached() {
    let server = MockServer::start_async().await;
    let me = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/auth/me")
                .header("authorization", "Bearer abc");
            then.status(200).json_body(user_json());
        })
        .await;

    let user = client(&server, Some("abc")).me().await.unwrap();
    assert_eq!(user.username, "ada");
    me.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_refreshes_once_and_retries() {
    let server = MockServer::start_async().await;
    let rejected = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/auth/me")
                .header("authorization", "Bearer old");
            then.status(401).json_body(json!({"detail": "Token expired"}));
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method("POST").path("/api/auth/refresh");
            then.status(200)
                .json_body(json!({"access_token": "new", "token_type": "bearer"}));
        })
        .await;
    let accepted = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/auth/me")
                .header("authorization", "Bearer new");
            then.status(200).json_body(user_json());
        })
        .await;

    let api = client(&server, Some("old"));
    let mut events = api.tokens().subscribe();

    let user = api.me().await.unwrap();
    assert_eq!(user.id, 1);

    rejected.assert_async().await;
    refresh.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(api.tokens().get().unwrap().value, "new");
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Refreshed);
}

#[tokio::test]
async fn test_refresh_failure_expires_session() {
    let server = MockServer::start_async().await;
    let rejected = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/library");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method("POST").path("/api/auth/refresh");
            then.status(401).json_body(json!({"detail": "No refresh cookie"}));
        })
        .await;

    let api = client(&server, Some("old"));
    let mut events = api.tokens().subscribe();

    let err = api.library(&Default::default()).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));

    rejected.assert_async().await;
    refresh.assert_async().await;
    assert!(!api.tokens().is_signed_in());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_retry_is_not_repeated() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/auth/me")
                .header("authorization", "Bearer old");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method("POST").path("/api/auth/refresh");
            then.status(200).json_body(json!({"access_token": "new"}));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/auth/me")
                .header("authorization", "Bearer new");
            then.status(401);
        })
        .await;

    let err = client(&server, Some("old")).me().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));

    first.assert_async().await;
    refresh.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_bad_login_does_not_refresh() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/api/auth/login")
                .json_body(json!({"email": "ada@example.com", "password": "wrong"}));
            then.status(401)
                .json_body(json!({"detail": "Invalid credentials"}));
        })
        .await;

    let api = client(&server, None);
    let err = api
        .login(&LoginRequest::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    // Without the refresh guard this would surface as SessionExpired
    assert!(matches!(err, Error::Unauthorized));
    login.assert_async().await;
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/api/auth/login");
            then.status(200).json_body(json!({
                "user": user_json(),
                "access_token": "fresh",
                "token_type": "bearer"
            }));
        })
        .await;

    let api = client(&server, None);
    let response = api
        .login(&LoginRequest::new("ada@example.com", "hunter22"))
        .await
        .unwrap();

    assert_eq!(response.user.username, "ada");
    assert_eq!(api.tokens().get().unwrap().value, "fresh");
}

#[tokio::test]
async fn test_not_found_detail_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/scraping/status/t-404");
            then.status(404).json_body(json!({"detail": "Task not found"}));
        })
        .await;

    let err = client(&server, Some("abc"))
        .scrape_status("t-404")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Status { message, .. } => assert_eq!(message, "Task not found"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_article_filters_are_sent_as_query() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/articles")
                .query_param("page", "2")
                .query_param("category", "rust")
                .query_param("sort_by", "newest");
            then.status(200).json_body(json!({
                "items": [{"id": "a1", "title": "T", "url": "https://x", "score": 71.0}],
                "total": 21,
                "page": 2,
                "per_page": 20,
                "pages": 2
            }));
        })
        .await;

    let filters = ArticleFilters {
        page: 2,
        category: Some("rust".into()),
        sort: zenwatch_api::types::SortOrder::Newest,
        ..ArticleFilters::default()
    };
    let page = client(&server, Some("abc"))
        .list_articles(&filters)
        .await
        .unwrap();

    list.assert_async().await;
    assert_eq!(page.items.len(), 1);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_oauth_callback_forwards_code_and_state() {
    let server = MockServer::start_async().await;
    let callback = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/auth/oauth/github/callback")
                .query_param("code", "c0de")
                .query_param("state", "s1");
            then.status(200).json_body(json!({
                "user": user_json(),
                "access_token": "oauth-token"
            }));
        })
        .await;

    let api = client(&server, None);
    let flow = OAuthFlow::resume(OAuthProvider::Github, "s1");
    let redirect = Url::parse("http://localhost:3000/auth/callback?code=c0de&state=s1").unwrap();

    let response = api.complete_oauth(&flow, &redirect).await.unwrap();
    assert_eq!(response.user.email, "ada@example.com");
    assert_eq!(api.tokens().get().unwrap().value, "oauth-token");
    callback.assert_async().await;
}

#[tokio::test]
async fn test_oauth_state_mismatch_never_reaches_backend() {
    let server = MockServer::start_async().await;
    let api = client(&server, None);
    let flow = OAuthFlow::resume(OAuthProvider::Github, "expected");
    let redirect = Url::parse("http://localhost/cb?code=c&state=forged").unwrap();

    let err = api.complete_oauth(&flow, &redirect).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(zenwatch_auth::Error::StateMismatch)
    ));
}
