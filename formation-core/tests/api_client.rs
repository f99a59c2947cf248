//! HTTP client and catalog provider against a throwaway local backend.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use formation_core::api::{ApiClient, BackendApi, RegisterRequest};
use formation_core::catalog::{CatalogProvider, builtin};
use formation_core::error::CoreError;
use formation_model::{AuthToken, ContentId, LikeToggle};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const GOOD_TOKEN: &str = "good-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {GOOD_TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": GOOD_TOKEN,
                "user": {
                    "email": body["email"],
                    "first_name": "길동",
                    "last_name": "홍"
                }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        )
    }
}

async fn register() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": "Email already registered" })),
    )
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
    }
    Json(json!({ "email": "viewer@example.com" })).into_response()
}

async fn contents() -> Json<Value> {
    Json(json!([
        { "id": 10, "title": "북극성" },
        { "id": 11, "title": "조각도시" },
        { "id": 12, "title": "북극성" }
    ]))
}

async fn toggle(Path(id): Path<i64>, headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "liked": id == 10, "like_count": 11 })).into_response()
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    Json(json!([{ "id": 11, "title": q }]))
}

fn backend() -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/contents", get(contents))
        .route("/api/v1/likes/{id}/toggle", post(toggle))
        .route("/api/v1/search", get(search))
}

async fn spawn(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    Url::parse(&format!("http://{addr}")).expect("url")
}

fn client(origin: &Url) -> ApiClient {
    ApiClient::new(origin, Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn login_installs_token_and_returns_profile() {
    let origin = spawn(backend()).await;
    let api = client(&origin);

    let session = api.login("viewer@example.com", "pw").await.unwrap();
    assert_eq!(session.token, AuthToken::new(GOOD_TOKEN));
    assert_eq!(session.profile.display_name(), "홍길동");
    assert_eq!(api.token().await, Some(AuthToken::new(GOOD_TOKEN)));

    let toggle = api.toggle_like(&ContentId::from(10)).await.unwrap();
    assert_eq!(
        toggle,
        LikeToggle {
            liked: true,
            count: 11
        }
    );
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let origin = spawn(backend()).await;
    let api = client(&origin);

    let err = api.login("viewer@example.com", "nope").await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidCredentials));
}

#[tokio::test]
async fn unauthorized_call_expires_session_and_clears_token() {
    let origin = spawn(backend()).await;
    let api = client(&origin);
    api.set_token(Some(AuthToken::new("stale"))).await;

    let err = api.current_user().await.unwrap_err();
    assert!(err.is_session_expired());
    assert_eq!(api.token().await, None);
}

#[tokio::test]
async fn rejection_carries_backend_detail() {
    let origin = spawn(backend()).await;
    let api = client(&origin);

    let request = RegisterRequest::new("a@b.c", "pw", "길동", "홍");
    match api.register(&request).await {
        Err(CoreError::Rejected { status, detail }) => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Email already registered");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn search_sends_query_parameter() {
    let origin = spawn(backend()).await;
    let api = client(&origin);

    let hits = api.search("영웅").await.unwrap();
    assert_eq!(hits[0].title, "영웅");
}

#[tokio::test]
async fn remote_catalog_is_deduplicated_by_title() {
    let origin = spawn(backend()).await;
    let api: Arc<dyn BackendApi> = Arc::new(client(&origin));
    let provider = CatalogProvider::new(Some(api));

    let items = provider.list_content().await.unwrap();
    let ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
    assert_eq!(ids, vec![ContentId::from(10), ContentId::from(11)]);
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_builtin() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let origin = Url::parse(&format!("http://{addr}")).unwrap();
    let api: Arc<dyn BackendApi> = Arc::new(client(&origin));
    let provider = CatalogProvider::new(Some(api));

    assert_eq!(provider.list_content().await.unwrap(), builtin());
}

#[tokio::test]
async fn expired_session_on_catalog_is_not_swallowed() {
    let router = Router::new().route(
        "/api/v1/contents",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );
    let origin = spawn(router).await;
    let api: Arc<dyn BackendApi> = Arc::new(client(&origin));
    let provider = CatalogProvider::new(Some(api));

    let err = provider.list_content().await.unwrap_err();
    assert!(err.is_session_expired());
}
