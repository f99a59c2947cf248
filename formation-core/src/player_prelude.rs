//! Curated surface for the player crate.
//! Keep imports focused by pulling from this module rather than directly from
//! the entire crate.

pub use crate::api::{ApiClient, BackendApi, RegisterRequest};
pub use crate::catalog::{CatalogEntry, CatalogProvider};
pub use crate::config::AppConfig;
pub use crate::error::{CoreError, Result as CoreResult};
pub use crate::i18n::{AuthMessage, Label, PlayerStatus};
pub use crate::profile::ProfileStore;
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};

pub use formation_model::prelude::*;
