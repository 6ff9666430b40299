//! Tag autocomplete over the global vocabulary.
//!
//! Ranking: prefix match > substring match, then usage count, then alphabetical.

use crate::vocabulary::TagVocabulary;

/// An autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub tag: String,
    pub use_count: u32,
    pub prefix_match: bool,
}

/// Find tags containing `fragment`, best first.
pub fn complete(vocabulary: &TagVocabulary, fragment: &str, limit: usize) -> Vec<Suggestion> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<Suggestion> = vocabulary
        .entries()
        .filter_map(|(tag, use_count)| {
            let lowered = tag.to_lowercase();
            if !lowered.contains(&needle) {
                return None;
            }
            Some(Suggestion {
                tag: tag.to_string(),
                use_count,
                prefix_match: lowered.starts_with(&needle),
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.prefix_match
            .cmp(&a.prefix_match)
            .then_with(|| b.use_count.cmp(&a.use_count))
            .then_with(|| a.tag.cmp(&b.tag))
    });

    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> TagVocabulary {
        let lists: Vec<Vec<String>> = vec![
            vec!["gan".into(), "vision".into()],
            vec!["gan".into(), "nlp".into()],
            vec!["organ".into()],
            vec!["gaussian".into()],
        ];
        TagVocabulary::from_tag_lists(lists.iter().map(Vec::as_slice))
    }

    #[test]
    fn prefix_before_substring() {
        let results = complete(&vocab(), "ga", 10);
        let tags: Vec<&str> = results.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(tags, vec!["gan", "gaussian", "organ"]);
    }

    #[test]
    fn limit_results() {
        assert_eq!(complete(&vocab(), "a", 2).len(), 2);
    }

    #[test]
    fn empty_fragment() {
        assert!(complete(&vocab(), "  ", 10).is_empty());
    }
}
