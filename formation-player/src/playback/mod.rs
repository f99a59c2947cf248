//! Playback lifecycle.
//!
//! [`PlaybackController`] owns one player mount: it acquires the engine
//! through a reference-counted [`EngineSlot`] once the [`Surface`] is
//! attached, swaps sources on the existing engine, negotiates the resume
//! position, reports progress and releases the engine on unmount.

mod controller;
mod engine;
mod lease;
mod source;
mod surface;

pub use controller::{
    PlaybackController, PlaybackEffect, PlaybackSession, PlaybackSettings,
    ResumeTicket, StatusLine,
};
pub use engine::{
    EngineError, EngineEvent, EngineFactory, EngineResult, ReadyState,
    VideoEngine,
};
pub use lease::{EngineLease, EngineSlot};
pub use source::{HLS_MIME, MP4_MIME, MediaSource, mime_for};
pub use surface::{Surface, SurfaceId};

use formation_core::i18n;
use formation_model::{ContentItem, Locale, PlaybackErrorKind};

/// Everything the playback controller needs to start an item.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub item: ContentItem,
    /// Offset known to the backend; `0.0` defers to the local store
    pub server_offset: f64,
}

/// Classify an engine error code and pick the status line for it.
pub fn classify_error(
    code: Option<u16>,
    locale: Locale,
) -> (PlaybackErrorKind, &'static str) {
    let kind = PlaybackErrorKind::from_code(code);
    (kind, i18n::playback_error(kind, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_gets_specific_message() {
        let (kind, message) = classify_error(Some(4), Locale::Ko);
        assert_eq!(kind, PlaybackErrorKind::NotFound);
        assert_eq!(message, "비디오 파일을 찾을 수 없습니다. (404)");

        let (kind, message) = classify_error(None, Locale::Ko);
        assert_eq!(kind, PlaybackErrorKind::Restricted);
        assert_eq!(message, "인증되지 않은 접근이거나 리전 정책 위반입니다.");

        let (kind, _) = classify_error(Some(99), Locale::Ko);
        assert_eq!(kind, PlaybackErrorKind::Unplayable);
    }
}
