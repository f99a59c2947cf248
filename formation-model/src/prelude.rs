//! Snapshot of the model surface for the player and other presentation
//! layers. Prefer importing from here over individual modules.

pub use super::content::{ContentItem, Episode, Locale, LocalizedText};
pub use super::error::{ModelError, Result as ModelResult};
pub use super::ids::ContentId;
pub use super::likes::{LikeState, LikeToggle};
pub use super::playback::{PlaybackErrorKind, PlaybackStatus};
pub use super::session::{AuthToken, RegisteredUser, Session, UserProfile};
pub use super::watch::{ContinueWatchingEntry, WatchRecord};
