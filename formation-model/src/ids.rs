use crate::error::ModelError;
use std::fmt;
use std::str::FromStr;

/// Identifier of a catalog item.
///
/// Catalog rows arrive with either numeric (`1`) or textual (`"abc"`) ids,
/// and persisted keys always come back as strings. Textual ids that parse
/// as integers are normalized to [`ContentId::Numeric`] so `"1"` and `1`
/// refer to the same item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentId {
    Numeric(i64),
    Text(String),
}

impl ContentId {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidContentId(raw.to_string()));
        }
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => ContentId::Numeric(n),
            Err(_) => ContentId::Text(trimmed.to_string()),
        })
    }

    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Numeric(n) => write!(f, "{n}"),
            ContentId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ContentId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentId::parse(s)
    }
}

impl From<i64> for ContentId {
    fn from(value: i64) -> Self {
        ContentId::Numeric(value)
    }
}

impl TryFrom<&str> for ContentId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ContentId::parse(value)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::ContentId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for ContentId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                ContentId::Numeric(n) => serializer.serialize_i64(*n),
                ContentId::Text(s) => serializer.serialize_str(s),
            }
        }
    }

    impl<'de> Deserialize<'de> for ContentId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            #[serde(untagged)]
            enum Raw {
                Int(i64),
                Str(String),
            }

            match Raw::deserialize(deserializer)? {
                Raw::Int(n) => Ok(ContentId::Numeric(n)),
                Raw::Str(s) => {
                    ContentId::parse(&s).map_err(serde::de::Error::custom)
                }
            }
        }
    }
}
