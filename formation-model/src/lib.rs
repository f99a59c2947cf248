//! Core data model definitions shared across Formation+ crates.
//!
//! Everything in here is plain data: catalog items, watch records, like
//! state and session records. Persistence and networking live in
//! `formation-core`; playback and view orchestration in `formation-player`.
#![allow(missing_docs)]

pub mod content;
pub mod error;
pub mod ids;
pub mod likes;
pub mod playback;
pub mod prelude;
pub mod session;
pub mod watch;

// Intentionally curated re-exports for downstream consumers.
pub use content::{ContentItem, Episode, Locale, LocalizedText};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ContentId;
pub use likes::{LikeState, LikeToggle};
pub use playback::{PlaybackErrorKind, PlaybackStatus};
pub use session::{AuthToken, RegisteredUser, Session, UserProfile};
pub use watch::{ContinueWatchingEntry, WatchRecord};
