//! Paper domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Site a paper was parsed from. Immutable once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaperSource {
    Arxiv,
    NeurIPS,
    OpenReview,
    Acl,
    Pmlr,
    PubMed,
    BioRxiv,
    #[default]
    Website,
    Other(String),
}

impl PaperSource {
    /// Storage name of the source.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Arxiv => "arxiv",
            Self::NeurIPS => "neurips",
            Self::OpenReview => "openreview",
            Self::Acl => "acl",
            Self::Pmlr => "pmlr",
            Self::PubMed => "pubmed",
            Self::BioRxiv => "biorxiv",
            Self::Website => "website",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Prefix used when deriving a paper id from a source-specific id.
    pub fn id_prefix(&self) -> &str {
        match self {
            Self::Arxiv => "Arxiv",
            Self::NeurIPS => "NeurIPS",
            Self::OpenReview => "OR",
            Self::Acl => "ACL",
            Self::Pmlr => "PMLR",
            Self::PubMed => "PubMed",
            Self::BioRxiv => "BioRxiv",
            Self::Website => "Website",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<String> for PaperSource {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "arxiv" => Self::Arxiv,
            "neurips" => Self::NeurIPS,
            "openreview" => Self::OpenReview,
            "acl" => Self::Acl,
            "pmlr" => Self::Pmlr,
            "pubmed" => Self::PubMed,
            "biorxiv" => Self::BioRxiv,
            "website" => Self::Website,
            _ => Self::Other(value),
        }
    }
}

impl From<PaperSource> for String {
    fn from(source: PaperSource) -> Self {
        source.as_str().to_string()
    }
}

/// A paper in the memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// Authors joined with `" and "`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub venue: String,
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub note: String,
    /// Empty when the paper has no code link.
    #[serde(default, deserialize_with = "lenient::string")]
    pub code_link: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub favorite_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub count: u32,
    #[serde(deserialize_with = "lenient::date")]
    pub add_date: DateTime<Utc>,
    #[serde(deserialize_with = "lenient::date")]
    pub last_open_date: DateTime<Utc>,
    #[serde(default)]
    pub source: PaperSource,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pdf_link: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
}

impl Paper {
    /// Create a new record, deriving its id from the source and source id.
    pub fn new(source: PaperSource, source_id: &str, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}-{}", source.id_prefix(), source_id),
            title: title.into(),
            author: String::new(),
            venue: String::new(),
            year: None,
            tags: Vec::new(),
            note: String::new(),
            code_link: String::new(),
            favorite: false,
            favorite_date: None,
            count: 1,
            add_date: now,
            last_open_date: now,
            source,
            pdf_link: String::new(),
            url: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = papermemory_tags::dedup_tags(tags);
        self
    }

    pub fn has_code(&self) -> bool {
        !self.code_link.trim().is_empty()
    }

    /// Individual author names.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.author
            .split(" and ")
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Set or clear the favorite flag, stamping the favorite date.
    pub fn set_favorite(&mut self, favorite: bool, at: DateTime<Utc>) {
        self.favorite = favorite;
        self.favorite_date = if favorite { Some(at) } else { None };
    }

    /// Register one more open of the paper.
    pub fn record_visit(&mut self, at: DateTime<Utc>) {
        self.count = self.count.saturating_add(1);
        self.last_open_date = at;
    }
}

impl AsRef<Paper> for Paper {
    fn as_ref(&self) -> &Paper {
        self
    }
}

/// Deserializers that tolerate records written by older versions of the store.
///
/// A searchable field with the wrong JSON shape is a data error: it is logged
/// and read as empty instead of failing the whole record.
mod lenient {
    use super::*;

    pub(super) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => {
                tracing::warn!(value = %other, "expected a string field, treating it as empty");
                String::new()
            }
        })
    }

    pub(super) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    other => {
                        tracing::warn!(value = %other, "expected a string in list, skipping it");
                        None
                    }
                })
                .collect(),
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(value = %other, "expected a list field, treating it as empty");
                Vec::new()
            }
        })
    }

    pub(super) fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match s.trim().parse() {
                Ok(y) => Some(y),
                Err(_) => {
                    tracing::warn!(value = %s, "unparseable year, treating it as missing");
                    None
                }
            },
            Value::Null => None,
            other => {
                tracing::warn!(value = %other, "expected a year, treating it as missing");
                None
            }
        })
    }

    /// RFC 3339 text or epoch milliseconds. Empty text and null are unset.
    fn parse_date(value: Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(date) => Some(date.with_timezone(&Utc)),
                Err(_) => {
                    tracing::warn!(value = %s, "unparseable date, treating it as unset");
                    None
                }
            },
            Value::Number(n) => {
                let date = n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis);
                if date.is_none() {
                    tracing::warn!(value = %n, "date out of range, treating it as unset");
                }
                date
            }
            other => {
                tracing::warn!(value = %other, "expected a date, treating it as unset");
                None
            }
        }
    }

    pub(super) fn optional_date<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(parse_date(Value::deserialize(deserializer)?))
    }

    /// A required date that is present but unreadable falls back to the epoch,
    /// so the paper stays searchable and sorts as oldest.
    pub(super) fn date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(parse_date(Value::deserialize(deserializer)?).unwrap_or_default())
    }
}
