use crate::playback::EngineError;
use formation_core::error::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Playback surface closed before the engine could start")]
    SurfaceDetached,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
