//! Filter engine over the sorted paper collection.
//!
//! Filtering is a pure function of the collection snapshot, the parsed query
//! and the favorites toggle. It never reorders: the output keeps the relative
//! order of the sorted input.

use std::borrow::Cow;

use crate::paper::Paper;
use crate::query::{QueryKind, SearchQuery};

/// Fields searched by a plain text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Note,
    Tags,
    Id,
    Venue,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        SearchField::Title,
        SearchField::Author,
        SearchField::Note,
        SearchField::Tags,
        SearchField::Id,
        SearchField::Venue,
    ];

    /// The field's text on a paper. Tags are joined with spaces.
    pub fn text<'a>(&self, paper: &'a Paper) -> Cow<'a, str> {
        match self {
            SearchField::Title => Cow::Borrowed(&paper.title),
            SearchField::Author => Cow::Borrowed(&paper.author),
            SearchField::Note => Cow::Borrowed(&paper.note),
            SearchField::Tags => Cow::Owned(paper.tags.join(" ")),
            SearchField::Id => Cow::Borrowed(&paper.id),
            SearchField::Venue => Cow::Borrowed(&paper.venue),
        }
    }
}

/// Whether a single paper passes the query and favorites toggle.
pub fn matches(paper: &Paper, query: &SearchQuery, favorites_only: bool) -> bool {
    if favorites_only && !paper.favorite {
        return false;
    }

    match query.kind() {
        QueryKind::All => true,
        QueryKind::Text(tokens) => {
            if tokens.is_empty() {
                return true;
            }
            let haystacks: Vec<String> = SearchField::ALL
                .iter()
                .map(|field| field.text(paper).to_lowercase())
                .collect();
            tokens
                .iter()
                .all(|token| haystacks.iter().any(|h| h.contains(token.as_str())))
        }
        QueryKind::Tag(tag_query) => tag_query.matches(&paper.tags),
        QueryKind::Code(tokens) => {
            let code = paper.code_link.to_lowercase();
            tokens.iter().all(|token| code.contains(token.as_str()))
        }
        QueryKind::Year { mode, years } => {
            if years.is_empty() {
                return true;
            }
            match paper.year {
                Some(year) => years.iter().any(|&target| mode.accepts(year, target)),
                None => false,
            }
        }
    }
}

/// Positions in `sorted` of the papers that pass, in order.
pub fn filter_indices(sorted: &[Paper], query: &SearchQuery, favorites_only: bool) -> Vec<usize> {
    sorted
        .iter()
        .enumerate()
        .filter(|(_, paper)| matches(paper, query, favorites_only))
        .map(|(i, _)| i)
        .collect()
}

/// The papers of `sorted` that pass, in order.
pub fn filter_papers<'a>(
    sorted: &'a [Paper],
    query: &SearchQuery,
    favorites_only: bool,
) -> Vec<&'a Paper> {
    sorted
        .iter()
        .filter(|paper| matches(paper, query, favorites_only))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::PaperSource;

    fn papers() -> Vec<Paper> {
        vec![
            Paper::new(PaperSource::Arxiv, "1706.03762", "Attention Is All You Need")
                .with_author("Ashish Vaswani and Noam Shazeer")
                .with_venue("NeurIPS")
                .with_year(2017)
                .with_tags(["nlp", "transformers"]),
            Paper::new(PaperSource::Arxiv, "1406.2661", "Generative Adversarial Networks")
                .with_author("Ian Goodfellow")
                .with_year(2014)
                .with_tags(["gan", "vae"]),
            Paper::new(PaperSource::Website, "resnet", "Deep Residual Learning")
                .with_author("Kaiming He")
                .with_venue("CVPR")
                .with_year(2016),
        ]
    }

    fn ids(found: &[&Paper]) -> Vec<String> {
        found.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn text_tokens_are_conjunctive_across_fields() {
        let papers = papers();
        let q = SearchQuery::parse("vaswani neurips");
        assert_eq!(ids(&filter_papers(&papers, &q, false)), vec!["Arxiv-1706.03762"]);

        let q = SearchQuery::parse("vaswani cvpr");
        assert!(filter_papers(&papers, &q, false).is_empty());
    }

    #[test]
    fn text_searches_tags_and_id() {
        let papers = papers();
        let q = SearchQuery::parse("website-res");
        assert_eq!(ids(&filter_papers(&papers, &q, false)), vec!["Website-resnet"]);
        let q = SearchQuery::parse("transformers");
        assert_eq!(filter_papers(&papers, &q, false).len(), 1);
    }

    #[test]
    fn tag_substring() {
        let papers = papers();
        let q = SearchQuery::parse("t:ga");
        assert_eq!(ids(&filter_papers(&papers, &q, false)), vec!["Arxiv-1406.2661"]);
        let q = SearchQuery::parse("t:ga seg");
        assert!(filter_papers(&papers, &q, false).is_empty());
    }

    #[test]
    fn code_query() {
        let mut papers = papers();
        papers[2].code_link = "https://github.com/KaimingHe/deep-residual-networks".into();
        let q = SearchQuery::parse("c:kaiminghe");
        assert_eq!(ids(&filter_papers(&papers, &q, false)), vec!["Website-resnet"]);
    }

    #[test]
    fn year_without_paper_year_never_matches() {
        let mut papers = papers();
        papers[0].year = None;
        let q = SearchQuery::parse("y:17");
        assert!(filter_papers(&papers, &q, false).is_empty());
    }

    #[test]
    fn favorites_only_applies_last() {
        let mut papers = papers();
        papers[1].favorite = true;
        let q = SearchQuery::parse("");
        assert_eq!(ids(&filter_papers(&papers, &q, true)), vec!["Arxiv-1406.2661"]);
        assert_eq!(filter_indices(&papers, &q, true), vec![1]);
    }

    #[test]
    fn order_is_preserved() {
        let papers = papers();
        let q = SearchQuery::parse("e");
        assert_eq!(filter_indices(&papers, &q, false), vec![0, 1, 2]);
    }
}
