//! Search query parser.
//!
//! Classifies the raw text typed into the search box by its prefix.
//!
//! # Syntax
//!
//! ```text
//! t:gan seg        tag fragments, all must match some tag
//! y:<21, 22        year query (see YearMode for polarity)
//! c:github torch   code link fragments
//! vaswani 2017     plain text over title/author/note/tags/id/venue
//! ```

use lazy_static::lazy_static;
use papermemory_tags::TagTokenQuery;
use regex::Regex;

lazy_static! {
    static ref YEAR_SEPARATOR: Regex = Regex::new(r"[,\s]+").unwrap();
}

const TAG_PREFIX: &str = "t:";
const YEAR_PREFIX: &str = "y:";
const CODE_PREFIX: &str = "c:";

/// Comparison mode of a year query.
///
/// The polarity is inverted relative to the symbol typed: `y:<22` yields
/// `Smaller`, which keeps papers whose year is *greater* than 2022, and `y:>22`
/// yields `Greater`, which keeps papers *older* than 2022. This matches the
/// behavior existing users rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearMode {
    Smaller,
    Greater,
    Equal,
}

impl YearMode {
    /// Whether a paper published in `paper_year` passes against `target`.
    pub fn accepts(self, paper_year: i32, target: i32) -> bool {
        match self {
            YearMode::Smaller => paper_year > target,
            YearMode::Greater => paper_year < target,
            YearMode::Equal => paper_year == target,
        }
    }
}

/// The classified operand of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Empty search: everything passes.
    All,
    Text(Vec<String>),
    Tag(TagTokenQuery),
    Year { mode: YearMode, years: Vec<i32> },
    Code(Vec<String>),
}

/// A parsed search query. Keeps the user's input for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    kind: QueryKind,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            raw: String::new(),
            kind: QueryKind::All,
        }
    }
}

impl SearchQuery {
    /// Classify a raw search string.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();

        let kind = if normalized.is_empty() {
            QueryKind::All
        } else if let Some(rest) = normalized.strip_prefix(TAG_PREFIX) {
            QueryKind::Tag(TagTokenQuery::parse(rest))
        } else if normalized.starts_with(YEAR_PREFIX) {
            parse_year_query(&normalized)
        } else if let Some(rest) = normalized.strip_prefix(CODE_PREFIX) {
            QueryKind::Code(split_tokens(rest))
        } else {
            QueryKind::Text(split_tokens(&normalized))
        };

        Self {
            raw: raw.to_string(),
            kind,
        }
    }

    /// The text as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    /// Whether the query lets every paper through.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            QueryKind::All => true,
            QueryKind::Text(tokens) | QueryKind::Code(tokens) => tokens.is_empty(),
            QueryKind::Tag(query) => query.is_empty(),
            QueryKind::Year { years, .. } => years.is_empty(),
        }
    }
}

fn split_tokens(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

fn parse_year_query(normalized: &str) -> QueryKind {
    let mode = if normalized.contains('<') {
        YearMode::Smaller
    } else if normalized.contains('>') {
        YearMode::Greater
    } else {
        YearMode::Equal
    };

    let stripped = normalized.replace(YEAR_PREFIX, "").replace(['<', '>'], "");
    let years = YEAR_SEPARATOR
        .split(stripped.trim())
        .filter_map(parse_year_token)
        .collect();

    QueryKind::Year { mode, years }
}

/// Parse one year token; two-digit years are read as `20XX`.
fn parse_year_token(token: &str) -> Option<i32> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let expanded = if token.len() == 2 {
        format!("20{}", token)
    } else {
        token.to_string()
    };
    expanded.parse().ok()
}
