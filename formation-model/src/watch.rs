use crate::content::ContentItem;
use crate::ids::ContentId;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Last played position for one content item.
///
/// One record per item; a newer save replaces the record in place.
/// `updated_at` orders records coming from different sources.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WatchRecord {
    pub content_id: ContentId,
    /// Last played offset in seconds
    #[cfg_attr(feature = "serde", serde(alias = "last_played", alias = "offset"))]
    pub offset_secs: f64,
    #[cfg_attr(feature = "serde", serde(default = "epoch"))]
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "serde")]
fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl WatchRecord {
    pub fn new(
        content_id: ContentId,
        offset_secs: f64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content_id,
            offset_secs,
            updated_at,
        }
    }

    /// True if `self` should replace `other` for the same item.
    pub fn supersedes(&self, other: &WatchRecord) -> bool {
        self.updated_at >= other.updated_at
    }
}

/// A row of the continue-watching shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueWatchingEntry {
    pub item: ContentItem,
    pub offset_secs: f64,
    pub updated_at: DateTime<Utc>,
}
