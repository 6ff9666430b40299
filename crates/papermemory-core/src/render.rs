//! Contract between the pagination driver and whatever displays papers.

use std::ops::Range;

use thiserror::Error;

use crate::paper::Paper;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Missing field: {field}")]
    MissingField { field: &'static str },
    #[error("Render failed: {message}")]
    Failed { message: String },
}

/// Turns one paper into something displayable.
pub trait PaperRenderer {
    type Output;

    fn render(&self, paper: &Paper) -> Result<Self::Output, RenderError>;
}

/// Render `range` of `papers`.
///
/// A paper that fails to render is logged and skipped; the rest of the page
/// still renders.
pub fn render_page<R, P>(renderer: &R, papers: &[P], range: Range<usize>) -> Vec<R::Output>
where
    R: PaperRenderer,
    P: AsRef<Paper>,
{
    let end = range.end.min(papers.len());
    let start = range.start.min(end);
    papers[start..end]
        .iter()
        .filter_map(|paper| {
            let paper = paper.as_ref();
            match renderer.render(paper) {
                Ok(output) => Some(output),
                Err(e) => {
                    tracing::warn!(paper_id = %paper.id, error = %e, "skipping paper that failed to render");
                    None
                }
            }
        })
        .collect()
}

/// One-line plain text rendering, used by the command line front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PaperRenderer for PlainTextRenderer {
    type Output = String;

    fn render(&self, paper: &Paper) -> Result<String, RenderError> {
        if paper.id.is_empty() {
            return Err(RenderError::MissingField { field: "id" });
        }
        if paper.title.trim().is_empty() {
            return Err(RenderError::MissingField { field: "title" });
        }

        let mut line = String::new();
        if paper.favorite {
            line.push_str("* ");
        }
        match paper.year {
            Some(year) => line.push_str(&format!("[{}] ", year)),
            None => line.push_str("[----] "),
        }
        line.push_str(paper.title.trim());
        if !paper.author.is_empty() {
            line.push_str(&format!(" - {}", paper.author));
        }
        if !paper.venue.is_empty() {
            line.push_str(&format!(" ({})", paper.venue));
        }
        for tag in &paper.tags {
            line.push_str(&format!(" #{}", tag));
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::PaperSource;

    #[test]
    fn bad_record_is_skipped() {
        let papers = vec![
            Paper::new(PaperSource::Website, "a", "First").with_year(2020),
            Paper::new(PaperSource::Website, "b", "  "),
            Paper::new(PaperSource::Website, "c", "Third").with_tags(["nlp"]),
        ];
        let lines = render_page(&PlainTextRenderer, &papers, 0..3);
        assert_eq!(lines, vec!["[2020] First", "[----] Third #nlp"]);
    }

    #[test]
    fn range_is_clamped() {
        let papers = vec![Paper::new(PaperSource::Website, "a", "Only")];
        assert_eq!(render_page(&PlainTextRenderer, &papers, 0..100).len(), 1);
        assert!(render_page(&PlainTextRenderer, &papers, 5..10).is_empty());
    }

    #[test]
    fn renders_borrowed_papers() {
        let paper = Paper::new(PaperSource::Website, "a", "Borrowed").with_author("Ada");
        let refs: Vec<&Paper> = vec![&paper];
        assert_eq!(
            render_page(&PlainTextRenderer, &refs, 0..1),
            vec!["[----] Borrowed - Ada"]
        );
    }
}
