//! Export a paper as a markdown link or a BibTeX entry.

use crate::paper::{Paper, PaperSource};

/// Best link for a paper: its page, else its pdf.
pub fn paper_url(paper: &Paper) -> &str {
    if !paper.url.is_empty() {
        paper.url.as_str()
    } else {
        paper.pdf_link.as_str()
    }
}

/// `[title](url)`, or just the title when the paper has no link.
pub fn to_markdown_link(paper: &Paper) -> String {
    let url = paper_url(paper);
    if url.is_empty() {
        paper.title.clone()
    } else {
        format!("[{}]({})", paper.title, url)
    }
}

/// Cite key: first author's last name, year, first title word, all lowercase.
pub fn cite_key(paper: &Paper) -> String {
    let last_name = paper
        .authors()
        .next()
        .and_then(|a| a.split_whitespace().last())
        .unwrap_or("anonymous");
    let first_word = paper
        .title
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .find(|w| !w.is_empty())
        .unwrap_or_default();
    let year = paper.year.map(|y| y.to_string()).unwrap_or_default();

    format!("{}{}{}", last_name, year, first_word)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// BibTeX entry for a paper.
///
/// arXiv papers without a venue become `@article` with an arXiv journal line,
/// papers with a venue become `@inproceedings`, everything else `@misc`.
pub fn to_bibtex(paper: &Paper) -> String {
    let mut fields: Vec<(&str, String)> = vec![("title", format!("{{{}}}", paper.title))];
    if !paper.author.is_empty() {
        fields.push(("author", format!("{{{}}}", paper.author)));
    }
    if let Some(year) = paper.year {
        fields.push(("year", format!("{{{}}}", year)));
    }

    let entry_type = if !paper.venue.is_empty() {
        fields.push(("booktitle", format!("{{{}}}", paper.venue)));
        "inproceedings"
    } else if paper.source == PaperSource::Arxiv {
        let arxiv_id = paper
            .id
            .strip_prefix(PaperSource::Arxiv.id_prefix())
            .map(|rest| rest.trim_start_matches('-'))
            .unwrap_or(paper.id.as_str());
        fields.push(("journal", format!("{{arXiv preprint arXiv:{}}}", arxiv_id)));
        "article"
    } else {
        "misc"
    };

    let url = paper_url(paper);
    if !url.is_empty() {
        fields.push(("url", format!("{{{}}}", url)));
    }

    let body = fields
        .iter()
        .map(|(k, v)| format!("    {} = {}", k, v))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("@{}{{{},\n{}\n}}", entry_type, cite_key(paper), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attention() -> Paper {
        Paper::new(PaperSource::Arxiv, "1706.03762", "Attention Is All You Need")
            .with_author("Ashish Vaswani and Noam Shazeer")
            .with_year(2017)
    }

    #[test]
    fn markdown_link() {
        let mut paper = attention();
        assert_eq!(to_markdown_link(&paper), "Attention Is All You Need");
        paper.pdf_link = "https://arxiv.org/pdf/1706.03762".into();
        assert_eq!(
            to_markdown_link(&paper),
            "[Attention Is All You Need](https://arxiv.org/pdf/1706.03762)"
        );
    }

    #[test]
    fn cite_key_from_author_year_title() {
        assert_eq!(cite_key(&attention()), "vaswani2017attention");
    }

    #[test]
    fn arxiv_bibtex() {
        let bib = to_bibtex(&attention());
        assert!(bib.starts_with("@article{vaswani2017attention,\n"));
        assert!(bib.contains("journal = {arXiv preprint arXiv:1706.03762}"));
        assert!(bib.ends_with("\n}"));
    }

    #[test]
    fn venue_bibtex() {
        let bib = to_bibtex(&attention().with_venue("NeurIPS"));
        assert!(bib.starts_with("@inproceedings{"));
        assert!(bib.contains("booktitle = {NeurIPS}"));
    }
}
