//! Client-side title search over the loaded catalog.

use formation_model::{ContentItem, Locale};

/// Items whose title in `locale` contains `query`, case-insensitively, in
/// catalog order. Returns `None` for a blank query, which callers treat as
/// "clear results and leave search".
pub fn filter_catalog(
    catalog: &[ContentItem],
    query: &str,
    locale: Locale,
) -> Option<Vec<ContentItem>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    Some(
        catalog
            .iter()
            .filter(|item| {
                item.display_title(locale).to_lowercase().contains(&needle)
            })
            .cloned()
            .collect(),
    )
}
