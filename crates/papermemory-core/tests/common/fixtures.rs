//! Paper fixtures shared by the integration tests

use chrono::{Duration, TimeZone, Utc};
use papermemory_core::{Paper, PaperSource};

/// The three-paper memory: 2019 `nlp`, 2021 `cv`, 2023 `nlp`+`cv`.
pub fn three_papers() -> Vec<Paper> {
    vec![
        Paper::new(PaperSource::Arxiv, "1901.00001", "Language Models Are Few Shot Learners")
            .with_author("Tom Brown")
            .with_year(2019)
            .with_tags(["nlp"]),
        Paper::new(PaperSource::Arxiv, "2101.00002", "Vision Transformers")
            .with_author("Alexey Dosovitskiy")
            .with_year(2021)
            .with_tags(["cv"]),
        Paper::new(PaperSource::Arxiv, "2301.00003", "Multimodal Pretraining")
            .with_author("Jean-Baptiste Alayrac")
            .with_year(2023)
            .with_tags(["nlp", "cv"]),
    ]
}

/// `n` papers with distinct, increasing add dates, counts and years.
#[allow(dead_code)]
pub fn many_papers(n: usize) -> Vec<Paper> {
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let mut paper = Paper::new(PaperSource::Website, &format!("p{:04}", i), format!("Paper {}", i))
                .with_year(2000 + (i % 25) as i32);
            paper.add_date = base + Duration::hours(i as i64);
            paper.last_open_date = base + Duration::hours(i as i64);
            paper.count = (i % 7) as u32;
            paper
        })
        .collect()
}

#[allow(dead_code)]
pub fn ids<'a, I>(papers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Paper>,
{
    papers.into_iter().map(|p| p.id.clone()).collect()
}
