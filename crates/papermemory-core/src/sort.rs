//! Sort engine for the full paper collection.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::paper::Paper;

/// Key the memory can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    LastOpenDate,
    AddDate,
    FavoriteDate,
    Title,
    Year,
    Count,
    Id,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::LastOpenDate,
        SortKey::AddDate,
        SortKey::FavoriteDate,
        SortKey::Title,
        SortKey::Year,
        SortKey::Count,
        SortKey::Id,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::LastOpenDate => "lastOpenDate",
            SortKey::AddDate => "addDate",
            SortKey::FavoriteDate => "favoriteDate",
            SortKey::Title => "title",
            SortKey::Year => "year",
            SortKey::Count => "count",
            SortKey::Id => "id",
        }
    }

    /// Ascending comparison of two papers on this key.
    ///
    /// Missing values (no year, never favorited) sort first.
    pub fn compare(&self, a: &Paper, b: &Paper) -> Ordering {
        match self {
            SortKey::LastOpenDate => a.last_open_date.cmp(&b.last_open_date),
            SortKey::AddDate => a.add_date.cmp(&b.add_date),
            SortKey::FavoriteDate => a.favorite_date.cmp(&b.favorite_date),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Count => a.count.cmp(&b.count),
            SortKey::Id => a.id.cmp(&b.id),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], "");
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Order `papers` in place.
///
/// Descending order is the exact reversal of the stable ascending order, so
/// flipping direction never needs a re-sort.
pub fn sort_papers(papers: &mut [Paper], key: SortKey, direction: SortDirection) {
    papers.sort_by(|a, b| key.compare(a, b));
    if direction == SortDirection::Descending {
        papers.reverse();
    }
}

/// The active sort of the memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::LastOpenDate,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Sort `papers` from scratch with this state.
    pub fn apply(&self, papers: &mut [Paper]) {
        sort_papers(papers, self.key, self.direction);
    }

    /// Switch direction on an already sorted collection with an O(n) reversal.
    ///
    /// Returns whether anything changed.
    pub fn set_direction(&mut self, direction: SortDirection, papers: &mut [Paper]) -> bool {
        if self.direction == direction {
            return false;
        }
        self.direction = direction;
        papers.reverse();
        true
    }

    /// Switch key and re-sort. Returns whether anything changed.
    pub fn set_key(&mut self, key: SortKey, papers: &mut [Paper]) -> bool {
        if self.key == key {
            return false;
        }
        self.key = key;
        self.apply(papers);
        true
    }
}
