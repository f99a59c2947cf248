//! Formation+ client orchestration.
//!
//! Built on `formation-core`, this crate holds the two stateful halves of
//! the client: the [`session`] controller behind login, browsing, search
//! and the theater view, and the [`playback`] controller that owns the
//! video engine for a player mount.

pub mod carousel;
pub mod context;
pub mod error;
pub mod playback;
pub mod session;

pub use context::AppContext;
pub use error::{PlayerError, Result};
