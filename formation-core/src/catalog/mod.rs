//! Catalog provider
//!
//! Supplies the list of content items for browsing and search. With a
//! backend configured the remote listing is used (de-duplicated by title);
//! otherwise, or when the backend is unreachable, the built-in catalog is
//! returned. The listing is fetched once per session and cached until
//! [`CatalogProvider::refresh`].

mod builtin;

pub use builtin::builtin;

use crate::api::BackendApi;
use crate::error::Result;
use formation_model::{ContentId, ContentItem, LikeState, WatchRecord};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// A catalog item together with the viewer's own state for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub item: ContentItem,
    pub liked: bool,
    pub like_count: u32,
    pub resume_offset: Option<f64>,
}

#[derive(Debug)]
pub struct CatalogProvider {
    backend: Option<Arc<dyn BackendApi>>,
    cache: RwLock<Option<Vec<ContentItem>>>,
}

impl CatalogProvider {
    pub fn new(backend: Option<Arc<dyn BackendApi>>) -> Self {
        Self {
            backend,
            cache: RwLock::new(None),
        }
    }

    /// Provider that never leaves the built-in catalog.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Cached listing, fetching it on first use.
    ///
    /// Backend failures fall back to the built-in catalog, except an
    /// expired session which is returned so the caller can log out. A
    /// fallback result is cached like a remote one.
    pub async fn list_content(&self) -> Result<Vec<ContentItem>> {
        if let Some(items) = self.cache.read().await.as_ref() {
            return Ok(items.clone());
        }

        let mut cache = self.cache.write().await;
        // Another caller may have filled it while we waited
        if let Some(items) = cache.as_ref() {
            return Ok(items.clone());
        }
        let items = self.fetch().await?;
        *cache = Some(items.clone());
        Ok(items)
    }

    /// Drop the cached listing and fetch again.
    pub async fn refresh(&self) -> Result<Vec<ContentItem>> {
        self.cache.write().await.take();
        self.list_content().await
    }

    async fn fetch(&self) -> Result<Vec<ContentItem>> {
        let Some(backend) = self.backend.as_ref() else {
            debug!("no backend configured, using built-in catalog");
            return Ok(builtin());
        };

        match backend.list_contents().await {
            Ok(items) if items.is_empty() => {
                warn!("backend returned an empty catalog, using built-in");
                Ok(builtin())
            }
            Ok(items) => {
                let fetched = items.len();
                let items = dedup_by_title(items);
                info!(fetched, kept = items.len(), "loaded remote catalog");
                Ok(items)
            }
            Err(e) if e.is_session_expired() => Err(e),
            Err(e) => {
                warn!(error = %e, "catalog fetch failed, using built-in");
                Ok(builtin())
            }
        }
    }
}

/// Keep the first item for every title, preserving order.
pub fn dedup_by_title(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.title.trim().to_string()))
        .collect()
}

/// Join the viewer's likes and progress onto catalog items.
pub fn overlay(
    items: &[ContentItem],
    likes: &LikeState,
    records: &[WatchRecord],
) -> Vec<CatalogEntry> {
    items
        .iter()
        .map(|item| CatalogEntry {
            item: item.clone(),
            liked: likes.is_liked(&item.id),
            like_count: likes.count_or(&item.id, item.like_count),
            resume_offset: find_offset(records, &item.id),
        })
        .collect()
}

fn find_offset(records: &[WatchRecord], id: &ContentId) -> Option<f64> {
    records
        .iter()
        .filter(|r| &r.content_id == id)
        .max_by(|a, b| a.updated_at.cmp(&b.updated_at))
        .map(|r| r.offset_secs)
}
