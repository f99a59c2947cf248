use formation_model::ContentItem;
use std::sync::LazyLock;
use tracing::error;

const BUILTIN_JSON: &str = include_str!("../../data/catalog.json");

static BUILTIN: LazyLock<Vec<ContentItem>> = LazyLock::new(|| {
    serde_json::from_str(BUILTIN_JSON).unwrap_or_else(|e| {
        error!(error = %e, "embedded catalog is malformed");
        Vec::new()
    })
});

/// The sample catalog shipped with the client.
pub fn builtin() -> Vec<ContentItem> {
    BUILTIN.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formation_model::{ContentId, Locale};

    #[test]
    fn embedded_catalog_parses() {
        let items = builtin();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].id, ContentId::from(1));
        assert_eq!(items[0].episodes.len(), 2);
        assert_eq!(items[0].runtime_minutes, Some(125));
        assert_eq!(items[0].display_title(Locale::En), "Sculpted City");
        assert!(items.iter().all(|i| i.playable_url().is_some()));
    }
}
