use super::state::{Action, ViewState};
use crate::context::AppContext;
use crate::playback::{PlayRequest, PlaybackEffect};
use chrono::Utc;
use formation_core::api::{BackendApi, RegisterRequest};
use formation_core::catalog::{self, CatalogEntry};
use formation_core::error::{CoreError, Result};
use formation_core::i18n::{self, AuthMessage};
use formation_core::search::filter_catalog;
use formation_core::watch::{self, continue_watching};
use formation_model::{
    AuthToken, ContentId, ContentItem, ContinueWatchingEntry, LikeToggle,
    Locale, Session, UserProfile, WatchRecord,
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Top-level state holder: login, catalog, search, likes, detail modal,
/// carousel and theater transitions.
///
/// A 401 from any backend call signs the viewer out and leaves a notice
/// in the view state.
#[derive(Debug)]
pub struct SessionController {
    ctx: AppContext,
    state: ViewState,
    /// Offsets known to the backend, used as resume hints
    server_offsets: HashMap<ContentId, f64>,
}

impl SessionController {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewState::default(),
            server_offsets: HashMap::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn locale(&self) -> Locale {
        self.ctx.config().locale
    }

    /// Backend for user-scoped calls. Demo sessions never talk to it.
    fn remote(&self) -> Option<Arc<dyn BackendApi>> {
        if self.ctx.config().demo_mode {
            None
        } else {
            self.ctx.backend().cloned()
        }
    }

    // ===== Session =====

    /// Resume the stored session, if any. Returns whether the viewer ends
    /// up signed in.
    pub async fn restore(&mut self) -> bool {
        let Some(mut session) = self.ctx.profile().session() else {
            debug!("No stored session");
            return false;
        };

        if let Some(backend) = self.remote() {
            backend.set_token(Some(session.token.clone())).await;
            match backend.current_user().await {
                Ok(profile) => {
                    session.profile = profile;
                    if let Err(e) = self.ctx.profile().set_session(&session) {
                        warn!("Failed to persist refreshed profile: {e}");
                    }
                }
                Err(e) if e.is_session_expired() => {
                    self.force_logout().await;
                    return false;
                }
                Err(e) => {
                    warn!("Could not verify session, using stored profile: {e}")
                }
            }
        }

        info!("Restored session for {}", session.profile.email);
        self.state.apply(Action::SessionStarted(session));
        self.reload_catalog().await;
        self.sync_profile().await;
        self.state.is_authenticated()
    }

    /// Sign in. Missing fields are rejected before any I/O.
    ///
    /// In demo mode any pair is accepted. Otherwise the backend decides;
    /// locally registered accounts are used when there is no backend or it
    /// cannot be reached.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let locale = self.locale();
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            let message = AuthMessage::MissingFields.text(locale);
            self.state.apply(Action::LoginFailed(message.to_string()));
            return Err(CoreError::Validation(message.to_string()));
        }

        match self.authenticate(email, password).await {
            Ok(session) => self.start_session(session).await,
            Err(e) => {
                warn!("Login failed for {email}: {e}");
                let message = if e.is_recoverable_network() {
                    AuthMessage::ServerUnreachable
                } else {
                    AuthMessage::InvalidCredentials
                };
                self.state
                    .apply(Action::LoginFailed(message.text(locale).to_string()));
                Err(e)
            }
        }
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let local = self.ctx.profile().find_user(email, password);

        if self.ctx.config().demo_mode {
            info!("Demo mode: accepting credentials for {email}");
            let profile = local.map(|u| u.profile()).unwrap_or_else(|| {
                UserProfile {
                    email: email.to_string(),
                    registered_at: Some(Utc::now()),
                    ..Default::default()
                }
            });
            return Ok(Session {
                token: AuthToken::new(format!("demo-{}", Uuid::new_v4())),
                profile,
            });
        }

        let mut backend_error = None;
        if let Some(backend) = self.remote() {
            match backend.login(email, password).await {
                Ok(session) => return Ok(session),
                Err(e) if e.is_recoverable_network() => {
                    warn!("Backend login unavailable, trying local accounts: {e}");
                    backend_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        match local {
            Some(user) => Ok(Session {
                token: AuthToken::new(format!("local-{}", Uuid::new_v4())),
                profile: user.profile(),
            }),
            None => Err(backend_error.unwrap_or(CoreError::InvalidCredentials)),
        }
    }

    async fn start_session(&mut self, session: Session) -> Result<()> {
        self.ctx.profile().set_session(&session)?;
        if let Some(backend) = self.remote() {
            backend.set_token(Some(session.token.clone())).await;
        }

        info!("Signed in as {}", session.profile.display_name());
        self.state.apply(Action::SessionStarted(session));
        self.reload_catalog().await;
        self.sync_profile().await;
        Ok(())
    }

    /// Create an account. Registration does not sign the viewer in.
    pub async fn register(&mut self, request: RegisterRequest) -> Result<()> {
        let locale = self.locale();
        if !request.is_complete() {
            let message = AuthMessage::MissingFields.text(locale);
            self.state.apply(Action::LoginFailed(message.to_string()));
            return Err(CoreError::Validation(message.to_string()));
        }

        let email = request.email.clone();
        let result = match self.remote() {
            Some(backend) => backend.register(&request).await,
            None => self
                .ctx
                .profile()
                .register_user(request.into_local_user(Utc::now())),
        };

        match result {
            Ok(()) => {
                info!("Registered {email}");
                let notice = AuthMessage::Registered.text(locale);
                self.state.apply(Action::Notice(Some(notice.to_string())));
                Ok(())
            }
            Err(e) => {
                warn!("Registration failed for {email}: {e}");
                let message = match &e {
                    CoreError::DuplicateUser(_) => {
                        AuthMessage::DuplicateEmail.text(locale).to_string()
                    }
                    CoreError::Rejected { status, detail } if *status < 500 => {
                        let detail =
                            Some(detail.as_str()).filter(|d| !d.is_empty());
                        i18n::registration_failed(detail, locale)
                    }
                    e if e.is_recoverable_network() => {
                        AuthMessage::ServerUnreachable.text(locale).to_string()
                    }
                    _ => i18n::registration_failed(None, locale),
                };
                self.state.apply(Action::LoginFailed(message));
                Err(e)
            }
        }
    }

    pub async fn logout(&mut self) -> Result<()> {
        info!("Signing out");
        self.end_session(None).await
    }

    async fn force_logout(&mut self) {
        info!("Session expired, signing out");
        let notice = AuthMessage::SessionExpired.text(self.locale());
        if let Err(e) = self.end_session(Some(notice.to_string())).await {
            warn!("Failed to clear stored session: {e}");
        }
    }

    async fn end_session(&mut self, notice: Option<String>) -> Result<()> {
        if let Some(backend) = self.ctx.backend() {
            backend.set_token(None).await;
        }
        self.server_offsets.clear();
        self.state.apply(Action::SessionEnded { notice });
        self.ctx.profile().clear_session()
    }

    /// Force a logout if `error` is an expired session. Returns whether it
    /// was.
    pub async fn handle_error(&mut self, error: &CoreError) -> bool {
        if error.is_session_expired() {
            self.force_logout().await;
            true
        } else {
            false
        }
    }

    // ===== Catalog and profile data =====

    /// Put the cached listing in the view, fetching it if needed.
    pub async fn load_catalog(&mut self) -> bool {
        let result = self.ctx.catalog().list_content().await;
        self.apply_catalog(result).await
    }

    /// Fetch the listing again, bypassing the cache. Runs on every session
    /// start, so a fallback cached during an outage ends with its session.
    pub async fn reload_catalog(&mut self) -> bool {
        let result = self.ctx.catalog().refresh().await;
        self.apply_catalog(result).await
    }

    async fn apply_catalog(&mut self, result: Result<Vec<ContentItem>>) -> bool {
        match result {
            Ok(items) => {
                debug!("Catalog loaded with {} items", items.len());
                self.state.apply(Action::CatalogLoaded(items));
                true
            }
            Err(e) if e.is_session_expired() && self.ctx.config().demo_mode => {
                // Demo sessions hold no credential for the backend to expire
                warn!("Backend refused the catalog to a demo session, using built-in");
                self.state.apply(Action::CatalogLoaded(catalog::builtin()));
                true
            }
            Err(e) => {
                if !self.handle_error(&e).await {
                    warn!("Catalog unavailable: {e}");
                }
                false
            }
        }
    }

    /// Load likes and watch history, reconciling with the backend when
    /// one is reachable. Backend like membership is authoritative; remote
    /// history is merged into the local records by recency.
    pub async fn sync_profile(&mut self) {
        let profile = self.ctx.profile().clone();
        let mut likes = profile.likes();
        let mut history = profile.watch_records();

        if let Some(backend) = self.remote() {
            match backend.liked_ids().await {
                Ok(ids) => match profile.replace_liked(ids) {
                    Ok(updated) => likes = updated,
                    Err(e) => warn!("Failed to store remote likes: {e}"),
                },
                Err(e) => {
                    if self.handle_error(&e).await {
                        return;
                    }
                    warn!("Could not fetch likes, using local state: {e}");
                }
            }

            match backend.watch_history().await {
                Ok(remote) => {
                    let remote = watch::merge_records(Vec::new(), remote);
                    self.server_offsets = remote
                        .iter()
                        .map(|r| (r.content_id.clone(), r.offset_secs))
                        .collect();
                    match profile.merge_records(&remote) {
                        Ok(merged) => history = merged,
                        Err(e) => warn!("Failed to store remote history: {e}"),
                    }
                }
                Err(e) => {
                    if self.handle_error(&e).await {
                        return;
                    }
                    warn!("Could not fetch watch history, using local: {e}");
                }
            }
        }

        self.state.apply(Action::LikesLoaded(likes));
        self.state.apply(Action::HistoryLoaded(history));
    }

    /// Catalog rows with the viewer's like and progress state joined in.
    pub fn catalog_entries(&self) -> Vec<CatalogEntry> {
        catalog::overlay(
            &self.state.catalog,
            &self.state.likes,
            &self.state.history,
        )
    }

    pub fn continue_watching(&self) -> Vec<ContinueWatchingEntry> {
        continue_watching(&self.state.catalog, &self.state.history)
    }

    // ===== Search =====

    /// Filter the loaded catalog. An empty query leaves search mode.
    pub fn search(&mut self, query: &str) {
        let results = filter_catalog(&self.state.catalog, query, self.locale());
        self.state.apply(Action::SearchChanged {
            query: query.to_string(),
            results,
        });
    }

    /// Ask the backend to search, falling back to the local filter. Demo
    /// sessions always filter locally.
    pub async fn search_remote(&mut self, query: &str) {
        let Some(backend) = self.remote() else {
            return self.search(query);
        };
        if query.trim().is_empty() {
            return self.search(query);
        }

        match backend.search(query.trim()).await {
            Ok(results) => self.state.apply(Action::SearchChanged {
                query: query.to_string(),
                results: Some(results),
            }),
            Err(e) => {
                if self.handle_error(&e).await {
                    return;
                }
                warn!("Remote search failed, filtering locally: {e}");
                self.search(query);
            }
        }
    }

    // ===== Likes =====

    /// Toggle the like on `id`. With a backend the response decides both
    /// membership and count; without one (or when it is unreachable) the
    /// local store flips them.
    pub async fn toggle_like(&mut self, id: &ContentId) -> Result<LikeToggle> {
        if self.state.item(id).is_none() {
            return Err(CoreError::NotFound(id.to_string()));
        }
        let profile = self.ctx.profile().clone();

        if let Some(backend) = self.remote() {
            match backend.toggle_like(id).await {
                Ok(toggle) => {
                    profile.set_like(id, toggle)?;
                    self.state.apply(Action::LikeApplied {
                        id: id.clone(),
                        toggle,
                    });
                    return Ok(toggle);
                }
                Err(e) if e.is_session_expired() => {
                    self.force_logout().await;
                    return Err(e);
                }
                Err(e) if e.is_recoverable_network() => {
                    warn!("Like sync unavailable, toggling locally: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        let toggle = profile.toggle_like(id, self.state.like_count(id))?;
        self.state.apply(Action::LikeApplied {
            id: id.clone(),
            toggle,
        });
        Ok(toggle)
    }

    /// "{n}명이 이 콘텐츠를 좋아합니다" for `id`.
    pub fn like_text(&self, id: &ContentId) -> String {
        i18n::like_count(self.state.like_count(id), self.locale())
    }

    // ===== View transitions =====

    pub fn open_detail(&mut self, id: &ContentId) -> bool {
        if self.state.item(id).is_none() {
            return false;
        }
        self.state.apply(Action::DetailOpened(id.clone()));
        true
    }

    pub fn close_detail(&mut self) {
        self.state.apply(Action::DetailClosed);
    }

    /// Enter theater mode for `id` and build the request for the playback
    /// controller. The resume hint is the backend's offset, or zero so the
    /// local store decides.
    pub fn play(&mut self, id: &ContentId) -> Option<PlayRequest> {
        let item = self.state.item(id)?.clone();
        let server_offset = self.server_offsets.get(id).copied().unwrap_or(0.0);
        info!("Playing '{}' (server offset {server_offset:.1}s)", item.title);

        let request = PlayRequest {
            item,
            server_offset,
        };
        self.state.apply(Action::TheaterOpened(request.clone()));
        Some(request)
    }

    /// Leave theater mode and pick up progress saved while playing.
    pub fn close_theater(&mut self) {
        self.state.apply(Action::TheaterClosed);
        let records = self.ctx.profile().watch_records();
        self.state.apply(Action::HistoryLoaded(records));
    }

    /// Persist a progress report and forward it to the backend. The view
    /// gets the stored record so both histories order the same way.
    pub async fn record_progress(&mut self, id: &ContentId, offset_secs: f64) {
        let record = match self.ctx.profile().save_progress(id, offset_secs) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to save progress locally: {e}");
                WatchRecord::new(id.clone(), offset_secs, Utc::now())
            }
        };
        self.state.apply(Action::ProgressSaved(record.clone()));

        let Some(backend) = self.remote() else {
            return;
        };
        match backend.append_watch_history(&record).await {
            Ok(()) => {
                self.server_offsets.insert(id.clone(), offset_secs);
            }
            Err(e) => {
                if !self.handle_error(&e).await {
                    warn!("Progress report failed: {e}");
                }
            }
        }
    }

    /// React to what the playback controller asked for.
    pub async fn handle_playback_effect(&mut self, effect: &PlaybackEffect) {
        match effect {
            PlaybackEffect::ReportProgress {
                content_id,
                offset_secs,
            } => self.record_progress(content_id, *offset_secs).await,
            PlaybackEffect::Finished { content_id } => {
                debug!("Playback of {content_id} finished");
            }
            PlaybackEffect::Failed { kind, .. } => {
                debug!("Playback failed: {kind}");
            }
            PlaybackEffect::PromptResume(_) => {}
        }
    }

    /// Carousel tick. Returns the hero index afterwards.
    pub fn advance_carousel(&mut self) -> usize {
        self.state.apply(Action::CarouselAdvanced);
        self.state.carousel_index
    }
}
