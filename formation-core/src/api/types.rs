//! Wire types for the backend API.

use formation_model::{
    AuthToken, ContentId, LikeToggle, RegisteredUser, UserProfile,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION_CODE: &str = "KR";
pub const DEFAULT_SUBSCRIPTION: &str = "free";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub access_token: AuthToken,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Registration form. All four user fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub region_code: String,
    pub subscription_status: String,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            region_code: DEFAULT_REGION_CODE.to_string(),
            subscription_status: DEFAULT_SUBSCRIPTION.to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !(self.email.is_empty()
            || self.password.is_empty()
            || self.first_name.is_empty()
            || self.last_name.is_empty())
    }

    pub fn into_local_user(
        self,
        registered_at: chrono::DateTime<chrono::Utc>,
    ) -> RegisteredUser {
        RegisteredUser {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            registered_at,
        }
    }
}

/// Body of a progress append.
#[derive(Debug, Clone, Serialize)]
pub struct WatchProgressRequest<'a> {
    pub content_id: &'a ContentId,
    pub last_played: f64,
}

/// Like toggle answer. The backend states the caller's membership
/// explicitly; it is never derived from list sizes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: u32,
}

impl From<LikeToggleResponse> for LikeToggle {
    fn from(value: LikeToggleResponse) -> Self {
        LikeToggle {
            liked: value.liked,
            count: value.like_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LikedEntry {
    pub content_id: ContentId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail` as display text. FastAPI-style validation errors carry an
    /// array here instead of a string.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
