//! Tag token queries for filtering papers by tag fragments.

use serde::{Deserialize, Serialize};

/// A conjunctive query over tag fragments.
///
/// Every token must be a substring of at least one of the paper's tags.
/// Matching is case-insensitive and substring-based, so `ga` matches `gan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTokenQuery {
    pub tokens: Vec<String>,
}

impl TagTokenQuery {
    /// Build a query from already split tokens. Tokens are lowercased.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Parse the operand of a `t:` query (the text after the prefix).
    pub fn parse(operand: &str) -> Self {
        Self::new(operand.split_whitespace())
    }

    /// An empty query matches every tag list.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Test whether a tag list satisfies every token.
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        if self.tokens.is_empty() {
            return true;
        }
        let lowered: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();
        self.tokens
            .iter()
            .all(|token| lowered.iter().any(|tag| tag.contains(token.as_str())))
    }
}
