use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the embedded player.
///
/// `Uninitialized -> Initializing -> Ready -> Playing <-> Buffering ->
/// Ended | Errored`, and `Disposing -> Uninitialized` on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackStatus {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Playing,
    Buffering,
    Ended,
    Errored(PlaybackErrorKind),
    Disposing,
}

impl PlaybackStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackStatus::Ended | PlaybackStatus::Errored(_))
    }

    pub fn has_engine(&self) -> bool {
        !matches!(
            self,
            PlaybackStatus::Uninitialized
                | PlaybackStatus::Initializing
                | PlaybackStatus::Disposing
        )
    }
}

/// Classified engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackErrorKind {
    /// Media resource could not be found (engine code 4)
    NotFound,
    /// Media could not be decoded (engine code 3)
    Decode,
    /// Network failure while fetching media (engine code 2)
    Network,
    /// Loading was aborted by the user (engine code 1)
    Aborted,
    /// Engine reported an error with an unrecognised code
    Unplayable,
    /// No error detail available: treated as an authorization or region
    /// restriction
    Restricted,
}

impl PlaybackErrorKind {
    /// Classify an engine error code. `None` means the engine raised an
    /// error event without any error detail.
    pub fn from_code(code: Option<u16>) -> Self {
        match code {
            Some(4) => PlaybackErrorKind::NotFound,
            Some(3) => PlaybackErrorKind::Decode,
            Some(2) => PlaybackErrorKind::Network,
            Some(1) => PlaybackErrorKind::Aborted,
            Some(_) => PlaybackErrorKind::Unplayable,
            None => PlaybackErrorKind::Restricted,
        }
    }
}

impl fmt::Display for PlaybackErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlaybackErrorKind::NotFound => "not_found",
            PlaybackErrorKind::Decode => "decode",
            PlaybackErrorKind::Network => "network",
            PlaybackErrorKind::Aborted => "aborted",
            PlaybackErrorKind::Unplayable => "unplayable",
            PlaybackErrorKind::Restricted => "restricted",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_kinds() {
        assert_eq!(
            PlaybackErrorKind::from_code(Some(4)),
            PlaybackErrorKind::NotFound
        );
        assert_eq!(
            PlaybackErrorKind::from_code(Some(1)),
            PlaybackErrorKind::Aborted
        );
        assert_eq!(
            PlaybackErrorKind::from_code(Some(99)),
            PlaybackErrorKind::Unplayable
        );
        assert_eq!(
            PlaybackErrorKind::from_code(None),
            PlaybackErrorKind::Restricted
        );
    }
}
