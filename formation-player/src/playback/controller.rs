use super::engine::{EngineError, EngineEvent};
use super::lease::{EngineLease, EngineSlot};
use super::source::MediaSource;
use super::{PlayRequest, classify_error};
use crate::error::Result;
use formation_core::config::AppConfig;
use formation_core::i18n::{self, PlayerStatus};
use formation_core::profile::ProfileStore;
use formation_model::{
    ContentId, ContentItem, Locale, PlaybackErrorKind, PlaybackStatus,
};
use log::{debug, error, info, warn};

/// Outstanding "resume where you left off?" question.
///
/// Tickets are bound to the source they were issued for; answering a
/// ticket after the source changed does nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeTicket {
    generation: u64,
    pub offset_secs: f64,
    pub prompt: String,
}

impl ResumeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Work the controller hands back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEffect {
    /// Ask the viewer, then answer with
    /// [`PlaybackController::resolve_resume`]
    PromptResume(ResumeTicket),
    /// Forward progress to the backend
    ReportProgress {
        content_id: ContentId,
        offset_secs: f64,
    },
    Finished {
        content_id: ContentId,
    },
    Failed {
        kind: PlaybackErrorKind,
        message: &'static str,
    },
}

/// What the in-player status line currently says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine {
    Player(PlayerStatus),
    Error(PlaybackErrorKind),
}

impl StatusLine {
    pub fn text(self, locale: Locale) -> &'static str {
        match self {
            StatusLine::Player(status) => status.text(locale),
            StatusLine::Error(kind) => i18n::playback_error(kind, locale),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    pub resume_threshold_secs: f64,
    pub report_step_secs: u64,
    pub locale: Locale,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            resume_threshold_secs: 5.0,
            report_step_secs: 10,
            locale: Locale::Ko,
        }
    }
}

impl PlaybackSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            resume_threshold_secs: config.resume_threshold_secs,
            report_step_secs: config.progress_report_step_secs.max(1),
            locale: config.locale,
        }
    }
}

/// The source currently loaded, alive while the theater view is open.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub item: ContentItem,
    pub source: Option<MediaSource>,
    pub server_offset: f64,
}

/// Owns the engine lease for one player mount and drives it through
/// load, resume negotiation, progress reporting and teardown.
#[derive(Debug)]
pub struct PlaybackController {
    slot: EngineSlot,
    lease: Option<EngineLease>,
    store: ProfileStore,
    settings: PlaybackSettings,
    session: Option<PlaybackSession>,
    status: PlaybackStatus,
    status_line: StatusLine,
    /// Bumped on every source change and on unmount
    generation: u64,
    resume_checked: bool,
    pending_prompt: Option<ResumeTicket>,
    play_deferred: bool,
    last_reported: u64,
}

impl PlaybackController {
    pub fn new(
        slot: EngineSlot,
        store: ProfileStore,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            slot,
            lease: None,
            store,
            settings,
            session: None,
            status: PlaybackStatus::Uninitialized,
            status_line: StatusLine::Player(PlayerStatus::CheckingSystem),
            generation: 0,
            resume_checked: false,
            pending_prompt: None,
            play_deferred: false,
            last_reported: 0,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn status_line(&self) -> StatusLine {
        self.status_line
    }

    pub fn status_text(&self) -> &'static str {
        self.status_line.text(self.settings.locale)
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn pending_prompt(&self) -> Option<&ResumeTicket> {
        self.pending_prompt.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_initialized(&self) -> bool {
        self.lease.is_some()
    }

    pub fn slot(&self) -> &EngineSlot {
        &self.slot
    }

    /// Acquire the engine once the surface is attached. Calling this again
    /// while a lease is held is a no-op. A source loaded before the engine
    /// existed is applied here.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.lease.is_some() {
            debug!("Player already initialized, skipping");
            return Ok(());
        }

        // Nothing changes until the lease resolves, so dropping this
        // future mid-wait leaves the controller untouched
        let lease = match self.slot.acquire().await {
            Ok(lease) => lease,
            Err(e) => {
                error!("Player initialization failed: {e}");
                return Err(e);
            }
        };
        self.lease = Some(lease);
        self.status = PlaybackStatus::Initializing;

        if self.session.is_some() {
            self.apply_source();
        } else {
            self.status_line = StatusLine::Player(PlayerStatus::AwaitingSource);
        }
        Ok(())
    }

    /// Switch to a new item. The engine is reused; resume negotiation and
    /// progress reporting start over, and any unanswered resume prompt is
    /// invalidated.
    pub fn load_source(&mut self, request: PlayRequest) {
        self.generation += 1;
        self.resume_checked = false;
        self.pending_prompt = None;
        self.play_deferred = false;
        self.last_reported = 0;

        let source = MediaSource::for_item(&request.item);
        info!(
            "Loading '{}' ({}), server offset {:.1}s",
            request.item.title,
            source.as_ref().map_or("no source", |s| s.mime_type),
            request.server_offset
        );
        self.session = Some(PlaybackSession {
            item: request.item,
            source,
            server_offset: request.server_offset,
        });

        if self.lease.is_some() {
            self.apply_source();
        } else {
            debug!("Engine not ready yet, source will be applied on init");
        }
    }

    fn apply_source(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(source) = session.source.clone() else {
            warn!("'{}' has no playable source", session.item.title);
            self.status_line = StatusLine::Player(PlayerStatus::AwaitingSource);
            return;
        };
        let Some(lease) = self.lease.as_ref() else {
            return;
        };

        match lease.with_engine(|engine| engine.set_source(&source)) {
            Some(Ok(())) => {
                self.status = PlaybackStatus::Initializing;
                self.status_line =
                    StatusLine::Player(PlayerStatus::SettingSource);
            }
            Some(Err(e)) => {
                error!("Failed to set source {}: {e}", source.url);
                self.status =
                    PlaybackStatus::Errored(PlaybackErrorKind::Unplayable);
                self.status_line =
                    StatusLine::Player(PlayerStatus::SourceFailed);
            }
            None => warn!("Engine vanished before source could be set"),
        }
    }

    /// Advance the state machine on an engine signal.
    pub fn handle_event(&mut self, event: EngineEvent) -> Vec<PlaybackEffect> {
        if self.session.is_none() && !matches!(event, EngineEvent::Error(_)) {
            debug!("Ignoring {event:?} with no source loaded");
            return Vec::new();
        }

        match event {
            EngineEvent::LoadStart => {
                self.status_line = StatusLine::Player(PlayerStatus::Loading);
                Vec::new()
            }
            EngineEvent::LoadedData => {
                self.status = PlaybackStatus::Ready;
                self.status_line =
                    StatusLine::Player(PlayerStatus::ReadyToPlay);
                Vec::new()
            }
            EngineEvent::CanPlay => self.on_can_play(),
            EngineEvent::Playing => {
                self.play_deferred = false;
                self.status = PlaybackStatus::Playing;
                self.status_line = StatusLine::Player(PlayerStatus::Playing);
                Vec::new()
            }
            EngineEvent::Waiting => {
                if self.status == PlaybackStatus::Playing {
                    self.status = PlaybackStatus::Buffering;
                }
                Vec::new()
            }
            EngineEvent::TimeUpdate(offset) => self.on_time_update(offset),
            EngineEvent::Ended => {
                self.status = PlaybackStatus::Ended;
                self.session
                    .as_ref()
                    .map(|s| PlaybackEffect::Finished {
                        content_id: s.item.id.clone(),
                    })
                    .into_iter()
                    .collect()
            }
            EngineEvent::Error(code) => self.on_error(code),
        }
    }

    /// Where playback should resume: the server's offset when it has one,
    /// else the locally stored offset.
    pub fn resume_offset(&self) -> f64 {
        let Some(session) = self.session.as_ref() else {
            return 0.0;
        };
        if session.server_offset > 0.0 {
            session.server_offset
        } else {
            self.store.last_offset(&session.item.id).unwrap_or(0.0)
        }
    }

    fn on_can_play(&mut self) -> Vec<PlaybackEffect> {
        if self.status == PlaybackStatus::Initializing {
            self.status = PlaybackStatus::Ready;
        }

        if self.resume_checked {
            if self.play_deferred {
                self.start_play();
            }
            return Vec::new();
        }
        self.resume_checked = true;

        let offset = self.resume_offset();
        if offset > self.settings.resume_threshold_secs {
            let ticket = ResumeTicket {
                generation: self.generation,
                offset_secs: offset,
                prompt: i18n::resume_prompt(offset, self.settings.locale),
            };
            debug!("Offering resume at {offset:.1}s");
            self.pending_prompt = Some(ticket.clone());
            return vec![PlaybackEffect::PromptResume(ticket)];
        }

        self.seek_and_play(0.0);
        Vec::new()
    }

    /// Answer a resume prompt. Returns `false` if the ticket is stale.
    pub fn resolve_resume(
        &mut self,
        ticket: &ResumeTicket,
        accepted: bool,
    ) -> bool {
        if ticket.generation != self.generation
            || self.pending_prompt.as_ref() != Some(ticket)
        {
            debug!(
                "Ignoring resume answer for generation {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.pending_prompt = None;

        let target = if accepted { ticket.offset_secs } else { 0.0 };
        self.seek_and_play(target);
        true
    }

    fn seek_and_play(&mut self, offset_secs: f64) {
        let Some(lease) = self.lease.as_ref() else {
            return;
        };
        let ready = lease.with_engine(|engine| {
            engine.seek(offset_secs);
            engine.ready_state()
        });

        match ready {
            Some(state) if state.can_play_now() => self.start_play(),
            Some(_) => {
                debug!("Engine not ready, deferring play to next canplay");
                self.play_deferred = true;
            }
            None => {}
        }
    }

    fn start_play(&mut self) {
        self.play_deferred = false;
        let Some(lease) = self.lease.as_ref() else {
            return;
        };

        match lease.with_engine(|engine| engine.play()) {
            Some(Ok(())) | None => {}
            Some(Err(EngineError::Aborted)) => {
                debug!("Play request aborted by a newer request");
            }
            Some(Err(e)) => {
                warn!("Play request rejected: {e}");
                self.status_line = StatusLine::Player(PlayerStatus::ClickToPlay);
            }
        }
    }

    fn on_time_update(&mut self, offset_secs: f64) -> Vec<PlaybackEffect> {
        if !offset_secs.is_finite() || offset_secs <= 0.0 {
            return Vec::new();
        }
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let content_id = session.item.id.clone();

        if let Err(e) = self.store.save_progress(&content_id, offset_secs) {
            warn!("Failed to save progress locally: {e}");
        }

        let whole = offset_secs.floor() as u64;
        if whole >= self.last_reported + self.settings.report_step_secs {
            self.last_reported = whole;
            return vec![PlaybackEffect::ReportProgress {
                content_id,
                offset_secs,
            }];
        }
        Vec::new()
    }

    fn on_error(&mut self, code: Option<u16>) -> Vec<PlaybackEffect> {
        let (kind, message) = classify_error(code, self.settings.locale);
        error!("Playback error {kind} (code {code:?}): {message}");

        self.status = PlaybackStatus::Errored(kind);
        self.status_line = StatusLine::Error(kind);
        self.play_deferred = false;
        vec![PlaybackEffect::Failed { kind, message }]
    }

    /// Reload the current source after an error.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.status, PlaybackStatus::Errored(_)) {
            return false;
        }
        let Some(session) = self.session.take() else {
            return false;
        };
        info!("Retrying '{}'", session.item.title);
        self.load_source(PlayRequest {
            item: session.item,
            server_offset: session.server_offset,
        });
        true
    }

    /// Tear down this mount. The engine is disposed only if no other
    /// mount still holds a lease on the surface.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.pending_prompt = None;
        self.session = None;
        self.resume_checked = false;
        self.play_deferred = false;
        self.last_reported = 0;

        if let Some(lease) = self.lease.take() {
            self.status = PlaybackStatus::Disposing;
            lease.with_engine(|engine| engine.pause());
            lease.release();
        }

        self.status = PlaybackStatus::Uninitialized;
        self.status_line = StatusLine::Player(PlayerStatus::CheckingSystem);
    }
}
