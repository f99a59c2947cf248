//! Playback controller against a scripted in-memory engine.

use formation_core::i18n::PlayerStatus;
use formation_core::profile::ProfileStore;
use formation_core::storage::MemoryStore;
use formation_model::{ContentId, ContentItem, PlaybackErrorKind, PlaybackStatus};
use formation_player::playback::{
    EngineError, EngineEvent, EngineFactory, EngineResult, EngineSlot,
    MediaSource, PlayRequest, PlaybackController, PlaybackEffect,
    PlaybackSettings, ReadyState, StatusLine, Surface, SurfaceId, VideoEngine,
};
use formation_player::PlayerError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct EngineLog {
    created: usize,
    disposed: usize,
    sources: Vec<String>,
    seeks: Vec<f64>,
    plays: usize,
    ready: ReadyState,
    play_result: Option<EngineError>,
}

impl Default for EngineLog {
    fn default() -> Self {
        Self {
            created: 0,
            disposed: 0,
            sources: Vec::new(),
            seeks: Vec::new(),
            plays: 0,
            ready: ReadyState::HAVE_ENOUGH_DATA,
            play_result: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FakeFactory {
    log: Arc<Mutex<EngineLog>>,
}

#[derive(Debug)]
struct FakeEngine {
    log: Arc<Mutex<EngineLog>>,
    position: f64,
}

impl VideoEngine for FakeEngine {
    fn set_source(&mut self, source: &MediaSource) -> EngineResult<()> {
        self.log.lock().sources.push(source.url.clone());
        Ok(())
    }

    fn seek(&mut self, offset_secs: f64) {
        self.position = offset_secs;
        self.log.lock().seeks.push(offset_secs);
    }

    fn play(&mut self) -> EngineResult<()> {
        let mut log = self.log.lock();
        log.plays += 1;
        match log.play_result.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {}

    fn ready_state(&self) -> ReadyState {
        self.log.lock().ready
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn dispose(&mut self) {
        self.log.lock().disposed += 1;
    }
}

impl EngineFactory for FakeFactory {
    fn create(&self, _surface: SurfaceId) -> EngineResult<Box<dyn VideoEngine>> {
        self.log.lock().created += 1;
        Ok(Box::new(FakeEngine {
            log: self.log.clone(),
            position: 0.0,
        }))
    }
}

struct Rig {
    factory: FakeFactory,
    surface: Surface,
    slot: EngineSlot,
    store: ProfileStore,
}

impl Rig {
    fn new() -> Self {
        let factory = FakeFactory::default();
        let surface = Surface::new();
        let slot = EngineSlot::new(surface.clone(), Arc::new(factory.clone()));
        let store = ProfileStore::new(Arc::new(MemoryStore::new()));
        Self {
            factory,
            surface,
            slot,
            store,
        }
    }

    fn controller(&self) -> PlaybackController {
        PlaybackController::new(
            self.slot.clone(),
            self.store.clone(),
            PlaybackSettings::default(),
        )
    }

    /// Attached surface, initialized controller.
    async fn mounted(&self) -> PlaybackController {
        self.surface.attach();
        let mut controller = self.controller();
        controller.initialize().await.unwrap();
        controller
    }

    fn log(&self) -> parking_lot::MutexGuard<'_, EngineLog> {
        self.factory.log.lock()
    }
}

fn item(id: i64) -> ContentItem {
    ContentItem::new(id, format!("title {id}"))
        .with_video_url(format!("https://stream.example/{id}/index.m3u8"))
}

fn request(id: i64, server_offset: f64) -> PlayRequest {
    PlayRequest {
        item: item(id),
        server_offset,
    }
}

fn prompt_of(effects: &[PlaybackEffect]) -> Option<formation_player::playback::ResumeTicket> {
    effects.iter().find_map(|effect| match effect {
        PlaybackEffect::PromptResume(ticket) => Some(ticket.clone()),
        _ => None,
    })
}

#[tokio::test]
async fn repeated_and_concurrent_acquires_create_one_engine() {
    let rig = Rig::new();
    let mut controller = rig.mounted().await;
    controller.initialize().await.unwrap();

    let (a, b) = tokio::join!(rig.slot.acquire(), rig.slot.acquire());
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(rig.log().created, 1);
    assert_eq!(rig.slot.lease_count(), 3);

    drop(a);
    b.release();
    assert_eq!(rig.slot.lease_count(), 1);
    assert_eq!(rig.log().disposed, 0);

    controller.unmount();
    assert!(!rig.slot.is_live());
    assert_eq!(rig.log().disposed, 1);
}

#[tokio::test]
async fn initialize_waits_for_surface_attachment() {
    let rig = Rig::new();
    let mut controller = rig.controller();
    let pending = tokio::spawn(async move {
        controller.initialize().await.map(|_| controller)
    });

    tokio::task::yield_now().await;
    assert_eq!(rig.log().created, 0);
    assert!(!pending.is_finished());

    rig.surface.attach();
    let controller = pending.await.unwrap().unwrap();
    assert!(controller.is_initialized());
    assert_eq!(rig.log().created, 1);
    assert_eq!(controller.status_line(), StatusLine::Player(PlayerStatus::AwaitingSource));
}

#[tokio::test(start_paused = true)]
async fn abandoned_initialize_leaves_controller_untouched() {
    let rig = Rig::new();
    let mut controller = rig.controller();

    let attempt =
        tokio::time::timeout(Duration::from_secs(1), controller.initialize()).await;
    assert!(attempt.is_err());
    assert_eq!(controller.status(), PlaybackStatus::Uninitialized);
    assert!(!controller.is_initialized());
    assert_eq!(rig.slot.lease_count(), 0);

    rig.surface.attach();
    controller.initialize().await.unwrap();
    assert_eq!(controller.status(), PlaybackStatus::Initializing);
    assert_eq!(rig.log().created, 1);
}

#[tokio::test]
async fn closed_surface_fails_initialize() {
    let rig = Rig::new();
    let mut controller = rig.controller();
    let pending = tokio::spawn(async move {
        let result = controller.initialize().await;
        (result, controller)
    });
    tokio::task::yield_now().await;

    rig.surface.close();
    let (result, controller) = pending.await.unwrap();
    assert!(matches!(result, Err(PlayerError::SurfaceDetached)));
    assert_eq!(controller.status(), PlaybackStatus::Uninitialized);
    assert_eq!(rig.log().created, 0);
}

#[tokio::test]
async fn engine_survives_until_last_mount_unmounts() {
    let rig = Rig::new();
    let mut first = rig.mounted().await;
    let mut second = rig.mounted().await;
    assert_eq!(rig.log().created, 1);

    first.unmount();
    assert!(rig.slot.is_live());
    assert_eq!(rig.log().disposed, 0);

    second.unmount();
    assert_eq!(rig.log().disposed, 1);

    let _third = rig.mounted().await;
    assert_eq!(rig.log().created, 2);
}

#[tokio::test]
async fn source_loaded_before_init_is_applied_on_init() {
    let rig = Rig::new();
    let mut controller = rig.controller();
    controller.load_source(request(1, 0.0));
    assert!(rig.log().sources.is_empty());

    rig.surface.attach();
    controller.initialize().await.unwrap();
    assert_eq!(rig.log().sources, vec!["https://stream.example/1/index.m3u8"]);
    assert_eq!(controller.status_line(), StatusLine::Player(PlayerStatus::SettingSource));
}

#[tokio::test]
async fn stored_offset_prompts_and_accept_seeks_there() {
    let rig = Rig::new();
    rig.store.save_progress(&ContentId::from(1), 120.0).unwrap();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));

    let effects = controller.handle_event(EngineEvent::CanPlay);
    let ticket = prompt_of(&effects).expect("resume prompt");
    assert_eq!(ticket.prompt, "2분 0초 지점부터 이어보시겠습니까?");
    assert!(rig.log().seeks.is_empty());
    assert_eq!(rig.log().plays, 0);

    assert!(controller.resolve_resume(&ticket, true));
    assert_eq!(rig.log().seeks, vec![120.0]);
    assert_eq!(rig.log().plays, 1);
    assert!(controller.pending_prompt().is_none());
}

#[tokio::test]
async fn declined_prompt_starts_from_zero() {
    let rig = Rig::new();
    rig.store.save_progress(&ContentId::from(1), 300.0).unwrap();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));

    let ticket = prompt_of(&controller.handle_event(EngineEvent::CanPlay)).unwrap();
    assert!(controller.resolve_resume(&ticket, false));
    assert_eq!(rig.log().seeks, vec![0.0]);
    assert_eq!(rig.log().plays, 1);
}

#[tokio::test]
async fn offset_below_threshold_plays_from_start() {
    let rig = Rig::new();
    rig.store.save_progress(&ContentId::from(1), 4.0).unwrap();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));

    let effects = controller.handle_event(EngineEvent::CanPlay);
    assert!(effects.is_empty());
    assert_eq!(rig.log().seeks, vec![0.0]);
    assert_eq!(rig.log().plays, 1);
}

#[tokio::test]
async fn server_offset_takes_precedence() {
    let rig = Rig::new();
    rig.store.save_progress(&ContentId::from(1), 30.0).unwrap();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 300.0));

    assert_eq!(controller.resume_offset(), 300.0);
    let ticket = prompt_of(&controller.handle_event(EngineEvent::CanPlay)).unwrap();
    assert_eq!(ticket.offset_secs, 300.0);
    assert_eq!(ticket.prompt, "5분 0초 지점부터 이어보시겠습니까?");
}

#[tokio::test]
async fn source_swap_invalidates_outstanding_prompt() {
    let rig = Rig::new();
    rig.store.save_progress(&ContentId::from(1), 120.0).unwrap();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));
    let stale = prompt_of(&controller.handle_event(EngineEvent::CanPlay)).unwrap();

    controller.load_source(request(2, 0.0));
    assert!(!controller.resolve_resume(&stale, true));
    assert!(rig.log().seeks.is_empty());
    assert_eq!(rig.log().created, 1);
    assert_eq!(rig.log().sources.len(), 2);
}

#[tokio::test]
async fn resume_is_negotiated_once_per_source() {
    let rig = Rig::new();
    rig.store.save_progress(&ContentId::from(1), 120.0).unwrap();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));

    assert!(prompt_of(&controller.handle_event(EngineEvent::CanPlay)).is_some());
    assert!(controller.handle_event(EngineEvent::CanPlay).is_empty());
    assert!(controller.handle_event(EngineEvent::CanPlay).is_empty());
}

#[tokio::test]
async fn progress_saved_every_update_reported_every_ten_seconds() {
    let rig = Rig::new();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));
    controller.handle_event(EngineEvent::CanPlay);

    let mut reported = Vec::new();
    for t in [0.0, 3.2, 9.9, 10.4, 15.0, 20.1, 25.0] {
        for effect in controller.handle_event(EngineEvent::TimeUpdate(t)) {
            if let PlaybackEffect::ReportProgress {
                content_id,
                offset_secs,
            } = effect
            {
                assert_eq!(content_id, ContentId::from(1));
                reported.push(offset_secs);
            }
        }
        if t > 0.0 {
            assert_eq!(rig.store.last_offset(&ContentId::from(1)), Some(t));
        }
    }
    assert_eq!(reported, vec![10.4, 20.1]);
}

#[tokio::test]
async fn engine_errors_are_classified_and_retryable() {
    let rig = Rig::new();
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));

    let effects = controller.handle_event(EngineEvent::Error(Some(4)));
    assert_eq!(
        effects,
        vec![PlaybackEffect::Failed {
            kind: PlaybackErrorKind::NotFound,
            message: "비디오 파일을 찾을 수 없습니다. (404)",
        }]
    );
    assert_eq!(controller.status_text(), "비디오 파일을 찾을 수 없습니다. (404)");

    controller.handle_event(EngineEvent::Error(None));
    assert_eq!(
        controller.status(),
        PlaybackStatus::Errored(PlaybackErrorKind::Restricted)
    );
    assert_eq!(
        controller.status_text(),
        "인증되지 않은 접근이거나 리전 정책 위반입니다."
    );

    assert!(controller.retry());
    assert_eq!(rig.log().sources.len(), 2);
    assert_eq!(rig.log().created, 1);
    assert_eq!(controller.status_line(), StatusLine::Player(PlayerStatus::SettingSource));
    assert!(!controller.retry());
}

#[tokio::test]
async fn play_waits_for_enough_data() {
    let rig = Rig::new();
    rig.log().ready = ReadyState::HAVE_METADATA;
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));

    controller.handle_event(EngineEvent::CanPlay);
    assert_eq!(rig.log().seeks, vec![0.0]);
    assert_eq!(rig.log().plays, 0);

    rig.log().ready = ReadyState::HAVE_ENOUGH_DATA;
    controller.handle_event(EngineEvent::CanPlay);
    assert_eq!(rig.log().plays, 1);
    assert_eq!(rig.log().seeks.len(), 1);
}

#[tokio::test]
async fn rejected_play_asks_for_a_click_but_aborted_play_does_not() {
    let rig = Rig::new();
    rig.log().play_result = Some(EngineError::PlayRejected("autoplay blocked".into()));
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));
    controller.handle_event(EngineEvent::CanPlay);
    assert_eq!(controller.status_line(), StatusLine::Player(PlayerStatus::ClickToPlay));

    let rig = Rig::new();
    rig.log().play_result = Some(EngineError::Aborted);
    let mut controller = rig.mounted().await;
    controller.load_source(request(1, 0.0));
    controller.handle_event(EngineEvent::CanPlay);
    assert_eq!(rig.log().plays, 1);
    assert_ne!(controller.status_line(), StatusLine::Player(PlayerStatus::ClickToPlay));
}

#[tokio::test]
async fn item_without_stream_waits_for_source() {
    let rig = Rig::new();
    let mut controller = rig.mounted().await;
    controller.load_source(PlayRequest {
        item: ContentItem::new(7, "no stream"),
        server_offset: 0.0,
    });

    assert!(rig.log().sources.is_empty());
    assert_eq!(controller.status_line(), StatusLine::Player(PlayerStatus::AwaitingSource));
}
