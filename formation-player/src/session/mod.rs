//! Session and view orchestration.
//!
//! [`SessionController`] performs the I/O (profile store, catalog, backend)
//! and feeds the outcome to [`ViewState`] as [`Action`]s.

mod controller;
pub mod state;

pub use controller::SessionController;
pub use state::{Action, ViewMode, ViewState};
