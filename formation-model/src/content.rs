use crate::ids::ContentId;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// UI language. Korean is the product default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    /// Parse a language tag such as `ko`, `ko-KR` or `en_US`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "ko" | "kor" => Some(Locale::Ko),
            "en" | "eng" => Some(Locale::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ko => f.write_str("ko"),
            Locale::En => f.write_str("en"),
        }
    }
}

/// Per-locale display overrides for a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalizedText {
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

/// A single episode of a series-style catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Episode {
    pub id: ContentId,
    pub title: String,
    /// Display duration, e.g. "45분"
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "desc"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_url: Option<String>,
}

/// Catalog entry. Immutable once loaded; localized text is overlaid at
/// render time through [`ContentItem::display_title`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub thumbnail_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub age_rating: Option<String>,
    /// Free-form display metadata, e.g. "2025 • 스릴러"
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub like_count: u32,
    /// Running time in minutes
    #[cfg_attr(feature = "serde", serde(default, alias = "runtime"))]
    pub runtime_minutes: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub episodes: Vec<Episode>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub translations: BTreeMap<Locale, LocalizedText>,
}

impl ContentItem {
    pub fn new(id: impl Into<ContentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            thumbnail_url: None,
            video_url: None,
            age_rating: None,
            meta: None,
            like_count: 0,
            runtime_minutes: None,
            episodes: Vec::new(),
            translations: BTreeMap::new(),
        }
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn with_like_count(mut self, count: u32) -> Self {
        self.like_count = count;
        self
    }

    pub fn with_translation(
        mut self,
        locale: Locale,
        text: LocalizedText,
    ) -> Self {
        self.translations.insert(locale, text);
        self
    }

    /// Title in `locale`, falling back to the base title.
    pub fn display_title(&self, locale: Locale) -> &str {
        self.translations
            .get(&locale)
            .and_then(|t| t.title.as_deref())
            .unwrap_or(&self.title)
    }

    pub fn display_description(&self, locale: Locale) -> &str {
        self.translations
            .get(&locale)
            .and_then(|t| t.description.as_deref())
            .unwrap_or(&self.description)
    }

    /// Source to hand to the player: the item's own stream, else the
    /// first episode that has one.
    pub fn playable_url(&self) -> Option<&str> {
        self.video_url.as_deref().or_else(|| {
            self.episodes.iter().find_map(|ep| ep.video_url.as_deref())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_prefers_locale_override() {
        let item = ContentItem::new(1, "조각도시").with_translation(
            Locale::En,
            LocalizedText {
                title: Some("Sculpted City".into()),
                description: None,
            },
        );
        assert_eq!(item.display_title(Locale::En), "Sculpted City");
        assert_eq!(item.display_title(Locale::Ko), "조각도시");
        assert_eq!(item.display_description(Locale::En), "");
    }

    #[test]
    fn locale_tags() {
        assert_eq!(Locale::from_tag("ko-KR"), Some(Locale::Ko));
        assert_eq!(Locale::from_tag("en_US"), Some(Locale::En));
        assert_eq!(Locale::from_tag("fr"), None);
    }

    #[test]
    fn playable_url_falls_back_to_episodes() {
        let mut item = ContentItem::new(1, "series");
        item.episodes.push(Episode {
            id: ContentId::from(1),
            title: "ep1".into(),
            duration: None,
            description: None,
            video_url: Some("https://cdn/ep1.m3u8".into()),
        });
        assert_eq!(item.playable_url(), Some("https://cdn/ep1.m3u8"));
    }
}
