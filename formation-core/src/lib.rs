//! # Formation Core
//!
//! Client-side library for the Formation+ streaming client: local profile
//! storage, the catalog provider, search, watch history reconciliation,
//! backend API access and configuration.
//!
//! ## Architecture
//!
//! - [`storage`]: raw string key/value persistence (memory or JSON file)
//! - [`profile`]: typed profile records (session, likes, progress) on top
//!   of a [`storage::KeyValueStore`]
//! - [`catalog`]: remote-or-built-in content listing
//! - [`search`] and [`watch`]: pure projections over catalog data
//! - [`api`]: the [`api::BackendApi`] trait and its reqwest client
//! - [`config`]: layered client configuration
//! - [`i18n`]: Korean/English user-facing strings
//!
//! ## Example
//!
//! ```no_run
//! use formation_core::{
//!     catalog::CatalogProvider,
//!     profile::ProfileStore,
//!     storage::MemoryStore,
//!     watch::continue_watching,
//! };
//! use std::sync::Arc;
//!
//! # async fn demo() -> formation_core::error::Result<()> {
//! let profile = ProfileStore::new(Arc::new(MemoryStore::new()));
//! let catalog = CatalogProvider::offline().list_content().await?;
//!
//! profile.save_progress(&catalog[0].id, 312.0)?;
//! let shelf = continue_watching(&catalog, &profile.watch_records());
//! assert_eq!(shelf.len(), 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod player_prelude;
pub mod profile;
pub mod search;
pub mod storage;
pub mod watch;

pub use error::{CoreError, Result};
