//! Watch history reconciliation and the continue-watching projection.

use formation_model::{ContentItem, ContinueWatchingEntry, WatchRecord};
use std::collections::HashMap;

/// Merge `incoming` into `existing`, one record per content id. A record
/// replaces the one it collides with only if it is at least as recent, so
/// a stale write arriving late never rewinds progress.
pub fn merge_records(
    existing: Vec<WatchRecord>,
    incoming: impl IntoIterator<Item = WatchRecord>,
) -> Vec<WatchRecord> {
    let mut merged: Vec<WatchRecord> = Vec::with_capacity(existing.len());
    for record in existing.into_iter().chain(incoming) {
        match merged
            .iter_mut()
            .find(|r| r.content_id == record.content_id)
        {
            Some(current) => {
                if record.supersedes(current) {
                    *current = record;
                }
            }
            None => merged.push(record),
        }
    }
    merged
}

/// Build the continue-watching shelf.
///
/// Records are joined against `catalog` by id and records whose item is no
/// longer in the catalog are dropped. Duplicates are collapsed first by id,
/// then by title (catalog rows can share a display title), keeping the most
/// recent record each time. The result is ordered most recent first.
pub fn continue_watching(
    catalog: &[ContentItem],
    records: &[WatchRecord],
) -> Vec<ContinueWatchingEntry> {
    let by_id: HashMap<_, _> =
        catalog.iter().map(|item| (&item.id, item)).collect();

    let mut per_id: Vec<ContinueWatchingEntry> = Vec::new();
    for record in records {
        let Some(item) = by_id.get(&record.content_id) else {
            continue;
        };
        let entry = ContinueWatchingEntry {
            item: (*item).clone(),
            offset_secs: record.offset_secs,
            updated_at: record.updated_at,
        };
        upsert_most_recent(&mut per_id, entry, |a, b| a.item.id == b.item.id);
    }

    let mut per_title: Vec<ContinueWatchingEntry> = Vec::new();
    for entry in per_id {
        upsert_most_recent(&mut per_title, entry, |a, b| {
            a.item.title == b.item.title
        });
    }

    per_title.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    per_title
}

fn upsert_most_recent(
    entries: &mut Vec<ContinueWatchingEntry>,
    entry: ContinueWatchingEntry,
    same: impl Fn(&ContinueWatchingEntry, &ContinueWatchingEntry) -> bool,
) {
    match entries.iter_mut().find(|e| same(e, &entry)) {
        Some(current) => {
            if entry.updated_at >= current.updated_at {
                *current = entry;
            }
        }
        None => entries.push(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use formation_model::ContentId;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(secs)
    }

    fn record(id: i64, offset: f64, ts: i64) -> WatchRecord {
        WatchRecord::new(ContentId::from(id), offset, at(ts))
    }

    #[test]
    fn unmatched_records_are_excluded() {
        let catalog = vec![ContentItem::new(1, "one")];
        let records = vec![record(1, 30.0, 10), record(2, 99.0, 20)];

        let shelf = continue_watching(&catalog, &records);
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf[0].item.id, ContentId::from(1));
        assert_eq!(shelf[0].offset_secs, 30.0);
    }

    #[test]
    fn duplicate_ids_keep_most_recent() {
        let catalog = vec![ContentItem::new(1, "one")];
        let records = vec![record(1, 500.0, 50), record(1, 20.0, 10)];

        let shelf = continue_watching(&catalog, &records);
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf[0].offset_secs, 500.0);
    }

    #[test]
    fn shared_titles_collapse_to_most_recent() {
        let catalog = vec![
            ContentItem::new(1, "북극성"),
            ContentItem::new(7, "북극성"),
            ContentItem::new(2, "메이드 인 코리아"),
        ];
        let records = vec![
            record(1, 100.0, 10),
            record(7, 200.0, 30),
            record(2, 50.0, 20),
        ];

        let shelf = continue_watching(&catalog, &records);
        let ids: Vec<_> = shelf.iter().map(|e| e.item.id.clone()).collect();
        assert_eq!(ids, vec![ContentId::from(7), ContentId::from(2)]);
    }

    #[test]
    fn merge_keeps_newer_record() {
        let existing = vec![record(1, 100.0, 50)];
        let merged = merge_records(
            existing,
            vec![record(1, 10.0, 20), record(2, 5.0, 1)],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].offset_secs, 100.0);

        let merged = merge_records(merged, vec![record(1, 300.0, 60)]);
        assert_eq!(merged[0].offset_secs, 300.0);
    }
}
