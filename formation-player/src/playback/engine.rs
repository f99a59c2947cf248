//! Seam between the controller and the video engine.
//!
//! The engine itself (an embedded player library) stays outside this
//! crate. It is driven through [`VideoEngine`] and reports what happens
//! as [`EngineEvent`]s fed to
//! [`PlaybackController::handle_event`](super::PlaybackController::handle_event).

use super::source::MediaSource;
use super::surface::SurfaceId;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The play request was interrupted by a newer load or pause
    #[error("play request aborted")]
    Aborted,

    #[error("play rejected: {0}")]
    PlayRejected(String),

    #[error("source rejected: {0}")]
    Source(String),

    #[error("engine could not be created: {0}")]
    Create(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// How much media the engine has buffered, on the HTML media scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ReadyState(pub u8);

impl ReadyState {
    pub const HAVE_NOTHING: ReadyState = ReadyState(0);
    pub const HAVE_METADATA: ReadyState = ReadyState(1);
    pub const HAVE_CURRENT_DATA: ReadyState = ReadyState(2);
    pub const HAVE_FUTURE_DATA: ReadyState = ReadyState(3);
    pub const HAVE_ENOUGH_DATA: ReadyState = ReadyState(4);

    pub fn can_play_now(self) -> bool {
        self >= Self::HAVE_CURRENT_DATA
    }
}

/// Signals raised by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    LoadStart,
    LoadedData,
    CanPlay,
    Playing,
    Waiting,
    /// Playback position advanced, in seconds
    TimeUpdate(f64),
    Ended,
    /// Error with the engine's media error code, if it provided one
    Error(Option<u16>),
}

pub trait VideoEngine: Send + Debug {
    fn set_source(&mut self, source: &MediaSource) -> EngineResult<()>;

    fn seek(&mut self, offset_secs: f64);

    fn play(&mut self) -> EngineResult<()>;

    fn pause(&mut self);

    fn ready_state(&self) -> ReadyState;

    fn current_time(&self) -> f64;

    /// Release every resource held by the engine. Called exactly once.
    fn dispose(&mut self);
}

/// Creates engines bound to a rendering surface.
pub trait EngineFactory: Send + Sync + Debug {
    fn create(&self, surface: SurfaceId) -> EngineResult<Box<dyn VideoEngine>>;
}
