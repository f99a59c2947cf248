//! Backend access.
//!
//! Everything the client asks of a remote backend goes through
//! [`BackendApi`], so the session controller can run against the HTTP
//! [`ApiClient`] or a test double.

pub mod client;
pub mod routes;
pub mod types;

pub use client::ApiClient;
pub use types::RegisterRequest;

use crate::error::Result;
use async_trait::async_trait;
use formation_model::{
    AuthToken, ContentId, ContentItem, LikeToggle, Session, UserProfile,
    WatchRecord,
};
use std::fmt::Debug;

/// Remote operations of the Formation+ backend.
///
/// Authenticated calls fail with
/// [`CoreError::SessionExpired`](crate::error::CoreError::SessionExpired)
/// when the backend answers 401.
#[async_trait]
pub trait BackendApi: Send + Sync + Debug {
    /// Install (or clear) the bearer credential used for later calls.
    async fn set_token(&self, token: Option<AuthToken>);

    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    async fn register(&self, request: &RegisterRequest) -> Result<()>;

    async fn list_contents(&self) -> Result<Vec<ContentItem>>;

    async fn current_user(&self) -> Result<UserProfile>;

    async fn watch_history(&self) -> Result<Vec<WatchRecord>>;

    async fn append_watch_history(&self, record: &WatchRecord) -> Result<()>;

    async fn liked_ids(&self) -> Result<Vec<ContentId>>;

    /// Toggle the caller's like. The answer is authoritative for both the
    /// membership and the count.
    async fn toggle_like(&self, id: &ContentId) -> Result<LikeToggle>;

    async fn search(&self, query: &str) -> Result<Vec<ContentItem>>;
}
