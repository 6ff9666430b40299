//! The global tag vocabulary, derived from every paper's tag list.

use serde::Serialize;
use std::collections::BTreeMap;

/// Distinct tags across the library with their usage counts.
///
/// This is not authoritative storage: it is rebuilt whenever any paper's
/// tags change and only feeds suggestion lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagVocabulary {
    counts: BTreeMap<String, u32>,
}

impl TagVocabulary {
    /// Build the vocabulary from an iterator of per-paper tag lists.
    ///
    /// Duplicate tags inside one paper count once.
    pub fn from_tag_lists<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for list in lists {
            let mut seen: Vec<&str> = Vec::with_capacity(list.len());
            for tag in list {
                if tag.is_empty() || seen.contains(&tag.as_str()) {
                    continue;
                }
                seen.push(tag);
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// All distinct tags, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Number of papers carrying this tag.
    pub fn count(&self, tag: &str) -> u32 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.counts.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
