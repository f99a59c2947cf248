use chrono::{DateTime, Utc};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque bearer credential. Debug output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Profile derived from the credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserProfile {
    #[cfg_attr(feature = "serde", serde(default))]
    pub first_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_name: String,
    pub email: String,
    #[cfg_attr(feature = "serde", serde(default, alias = "created_at"))]
    pub registered_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Family name first, matching how the registration form collects it.
    pub fn display_name(&self) -> String {
        let full = format!("{}{}", self.last_name, self.first_name);
        if full.trim().is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Session {
    pub token: AuthToken,
    pub profile: UserProfile,
}

/// A locally registered demo account.
///
/// Stored as entered: this is a demo affordance, not a credential vault.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegisteredUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredUser {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            registered_at: Some(self.registered_at),
        }
    }

    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim()) && self.password == password
    }
}

impl fmt::Debug for RegisteredUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredUser")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let profile = UserProfile {
            email: "a@b.c".into(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "a@b.c");

        let named = UserProfile {
            first_name: "길동".into(),
            last_name: "홍".into(),
            ..profile
        };
        assert_eq!(named.display_name(), "홍길동");
    }
}
