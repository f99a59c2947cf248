use super::BackendApi;
use super::routes::v1;
use super::types::{
    ErrorBody, LikeToggleResponse, LikedEntry, LoginRequest, LoginResponse,
    RegisterRequest, WatchProgressRequest,
};
use crate::config::AppConfig;
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use formation_model::{
    AuthToken, ContentId, ContentItem, LikeToggle, Session, UserProfile,
    WatchRecord,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for the Formation+ backend with bearer authentication.
///
/// The token lives inside the client so every request picks it up; a 401
/// on an authenticated call clears it and surfaces
/// [`CoreError::SessionExpired`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<AuthToken>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    pub fn new(origin: &Url, timeout: Duration) -> Result<Self> {
        let base_url = origin.as_str().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;

        info!(base_url = %base_url, "creating API client");

        Ok(Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Client for the configured origin, or `None` when no backend is set.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        config
            .api_origin
            .as_ref()
            .map(|origin| Self::new(origin, config.request_timeout))
            .transpose()
    }

    /// Join a route onto the base URL. Origins may be configured with or
    /// without the `/api/v1` suffix.
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let path = path.as_ref();
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = match path.strip_prefix(v1::ROOT) {
            Some(rest) if self.base_url.ends_with(v1::ROOT) => rest,
            _ => path,
        };
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn token(&self) -> Option<AuthToken> {
        self.token_store.read().await.clone()
    }

    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_store.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => {
                warn!("backend rejected credential, clearing token");
                *self.token_store.write().await = None;
                Err(CoreError::SessionExpired)
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<ErrorBody>(&text)
                    .ok()
                    .and_then(|body| body.detail_text())
                    .unwrap_or(text);
                Err(CoreError::Rejected {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path);
        debug!(%url, "GET");
        let request = self.build_request(self.client.get(&url)).await;
        self.execute(request).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!(%url, "POST");
        let request =
            self.build_request(self.client.post(&url).json(body)).await;
        self.execute(request).await
    }

    /// POST where the response body is irrelevant.
    pub async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let url = self.build_url(path);
        debug!(%url, "POST");
        let request =
            self.build_request(self.client.post(&url).json(body)).await;
        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn set_token(&self, token: Option<AuthToken>) {
        *self.token_store.write().await = token;
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = LoginRequest { email, password };
        // Login is unauthenticated: a 401 here means bad credentials
        let response: LoginResponse =
            match self.post(v1::auth::LOGIN, &body).await {
                Err(CoreError::SessionExpired) => {
                    return Err(CoreError::InvalidCredentials);
                }
                other => other?,
            };

        self.set_token(Some(response.access_token.clone())).await;
        let profile = match response.user {
            Some(user) => user,
            None => self.current_user().await.unwrap_or_else(|e| {
                warn!(error = %e, "profile fetch after login failed");
                UserProfile {
                    email: email.trim().to_string(),
                    ..Default::default()
                }
            }),
        };

        Ok(Session {
            token: response.access_token,
            profile,
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.post_no_content(v1::auth::REGISTER, request).await
    }

    async fn list_contents(&self) -> Result<Vec<ContentItem>> {
        self.get(v1::contents::COLLECTION).await
    }

    async fn current_user(&self) -> Result<UserProfile> {
        self.get(v1::users::CURRENT).await
    }

    async fn watch_history(&self) -> Result<Vec<WatchRecord>> {
        self.get(v1::watch::HISTORY).await
    }

    async fn append_watch_history(&self, record: &WatchRecord) -> Result<()> {
        let body = WatchProgressRequest {
            content_id: &record.content_id,
            last_played: record.offset_secs,
        };
        self.post_no_content(v1::watch::HISTORY, &body).await
    }

    async fn liked_ids(&self) -> Result<Vec<ContentId>> {
        let entries: Vec<LikedEntry> = self.get(v1::likes::COLLECTION).await?;
        Ok(entries.into_iter().map(|e| e.content_id).collect())
    }

    async fn toggle_like(&self, id: &ContentId) -> Result<LikeToggle> {
        let path = v1::likes::TOGGLE.replace("{id}", &id.as_key());
        let response: LikeToggleResponse =
            self.post(&path, &serde_json::json!({})).await?;
        Ok(response.into())
    }

    async fn search(&self, query: &str) -> Result<Vec<ContentItem>> {
        let url = self.build_url(v1::contents::SEARCH);
        let request = self
            .build_request(self.client.get(&url).query(&[("q", query)]))
            .await;
        self.execute(request).await
    }
}
