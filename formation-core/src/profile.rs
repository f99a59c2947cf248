//! Local profile store
//!
//! Typed access to the records the client keeps in its key/value storage:
//! the session credential and profile, like state, registered demo users and
//! per-item watch progress.
//!
//! ## Failure semantics
//!
//! Reads never fail. A missing, unreadable or malformed value is logged and
//! replaced with its empty default; the store is not authoritative for
//! anything safety-critical. Writes propagate I/O errors.

use crate::error::{CoreError, Result};
use crate::storage::KeyValueStore;
use chrono::Utc;
use formation_model::{
    AuthToken, ContentId, LikeState, LikeToggle, RegisteredUser, Session,
    UserProfile, WatchRecord,
};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod keys {
    pub const SESSION_TOKEN: &str = "token";
    pub const USER_PROFILE: &str = "user";
    pub const LIKED_IDS: &str = "liked_ids";
    pub const LIKE_COUNTS: &str = "like_counts";
    pub const REGISTERED_USERS: &str = "registered_users";
    pub const WATCH_HISTORY: &str = "watch_history";
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "storage read failed, using default");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "malformed stored value, using default");
            T::default()
        })
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<()> {
        self.store.set(key, &serde_json::to_string(value)?)
    }

    // ===== Likes =====

    pub fn likes(&self) -> LikeState {
        LikeState {
            liked: self.read_json::<BTreeSet<ContentId>>(keys::LIKED_IDS),
            counts: self
                .read_json::<BTreeMap<ContentId, u32>>(keys::LIKE_COUNTS),
        }
    }

    /// Flip membership of `id` and persist both halves of the like state.
    /// Returns the post-toggle state; the count never goes below zero.
    pub fn toggle_like(
        &self,
        id: &ContentId,
        current_count: u32,
    ) -> Result<LikeToggle> {
        let mut likes = self.likes();
        let toggle = likes.toggle(id, current_count);
        self.persist_likes(&likes)?;
        debug!(%id, liked = toggle.liked, count = toggle.count, "like toggled");
        Ok(toggle)
    }

    /// Store an authoritative like answer for `id`.
    pub fn set_like(&self, id: &ContentId, toggle: LikeToggle) -> Result<()> {
        let mut likes = self.likes();
        likes.apply(id, toggle);
        self.persist_likes(&likes)
    }

    /// Replace the liked set with the backend's. Counts are kept.
    pub fn replace_liked(
        &self,
        liked: impl IntoIterator<Item = ContentId>,
    ) -> Result<LikeState> {
        let mut likes = self.likes();
        likes.liked = liked.into_iter().collect();
        self.persist_likes(&likes)?;
        Ok(likes)
    }

    fn persist_likes(&self, likes: &LikeState) -> Result<()> {
        self.write_json(keys::LIKED_IDS, &likes.liked)?;
        self.write_json(keys::LIKE_COUNTS, &likes.counts)
    }

    // ===== Watch progress =====

    pub fn watch_records(&self) -> Vec<WatchRecord> {
        self.read_json(keys::WATCH_HISTORY)
    }

    /// Upsert the record for `id`. The latest call always wins: the stored
    /// offset is overwritten and the record is stamped no earlier than the
    /// record it replaces.
    pub fn save_progress(
        &self,
        id: &ContentId,
        offset_secs: f64,
    ) -> Result<WatchRecord> {
        let mut records = self.watch_records();
        let now = Utc::now();
        let record = match records.iter_mut().find(|r| &r.content_id == id) {
            Some(existing) => {
                existing.offset_secs = offset_secs;
                existing.updated_at = existing.updated_at.max(now);
                existing.clone()
            }
            None => {
                let record = WatchRecord::new(id.clone(), offset_secs, now);
                records.push(record.clone());
                record
            }
        };
        self.write_json(keys::WATCH_HISTORY, &records)?;
        Ok(record)
    }

    /// Merge records from another source (e.g. the server's history). A
    /// record only replaces the local one if it is at least as recent.
    pub fn merge_records(
        &self,
        incoming: &[WatchRecord],
    ) -> Result<Vec<WatchRecord>> {
        let merged = crate::watch::merge_records(
            self.watch_records(),
            incoming.iter().cloned(),
        );
        self.write_json(keys::WATCH_HISTORY, &merged)?;
        Ok(merged)
    }

    pub fn last_offset(&self, id: &ContentId) -> Option<f64> {
        self.watch_records()
            .into_iter()
            .find(|r| &r.content_id == id)
            .map(|r| r.offset_secs)
    }

    // ===== Session =====

    pub fn session(&self) -> Option<Session> {
        let token: Option<AuthToken> = self.read_json(keys::SESSION_TOKEN);
        let token = token.filter(|t| !t.is_empty())?;
        let profile: UserProfile = self.read_json(keys::USER_PROFILE);
        Some(Session { token, profile })
    }

    pub fn set_session(&self, session: &Session) -> Result<()> {
        self.write_json(keys::SESSION_TOKEN, &session.token)?;
        self.write_json(keys::USER_PROFILE, &session.profile)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.store.remove(keys::SESSION_TOKEN)?;
        self.store.remove(keys::USER_PROFILE)
    }

    // ===== Registered demo users =====

    pub fn registered_users(&self) -> Vec<RegisteredUser> {
        self.read_json(keys::REGISTERED_USERS)
    }

    pub fn register_user(&self, user: RegisteredUser) -> Result<()> {
        let mut users = self.registered_users();
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(CoreError::DuplicateUser(user.email));
        }
        users.push(user);
        self.write_json(keys::REGISTERED_USERS, &users)
    }

    pub fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> Option<RegisteredUser> {
        self.registered_users()
            .into_iter()
            .find(|u| u.matches(email, password))
    }
}
