//! MemoryState edit, delete and overlay lifecycle tests

mod common;

use common::fixtures::{ids, many_papers, three_papers};
use std::collections::HashSet;
use std::ops::Range;
use std::time::Duration;

use papermemory_core::{
    MemoryConfig, MemoryError, MemoryState, MemoryStore, OverlayState, Paper, PaperSource,
    PaperStore, SortDirection, SortKey, ViewUpdate,
};

async fn state_with(papers: Vec<Paper>) -> MemoryState<MemoryStore> {
    MemoryState::load(MemoryStore::with_papers(papers), MemoryConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_load_sorts_by_default_key() {
    let state = state_with(many_papers(5)).await;
    assert_eq!(state.sort().key, SortKey::LastOpenDate);
    assert_eq!(state.papers()[0].id, "Website-p0004");
    assert_eq!(state.visible_len(), 5);
}

#[tokio::test]
async fn test_end_to_end_queries() {
    let mut state = state_with(three_papers()).await;

    state.set_query("t:nlp");
    let mut years: Vec<_> = state.visible().map(|p| p.year).collect();
    years.sort();
    assert_eq!(years, vec![Some(2019), Some(2023)]);

    state.set_query("y:<22");
    assert_eq!(state.visible().map(|p| p.year).collect::<Vec<_>>(), vec![Some(2023)]);

    state.set_query("");
    state.toggle_favorite("Arxiv-2101.00002").await.unwrap();
    state.set_favorites_only(true);
    assert_eq!(state.visible().map(|p| p.year).collect::<Vec<_>>(), vec![Some(2021)]);
}

#[tokio::test]
async fn test_edits_are_written_to_store_first() {
    let mut state = state_with(three_papers()).await;
    let id = "Arxiv-1901.00001";

    state
        .save_tags(id, vec!["nlp".into(), "gpt".into(), "nlp".into(), " ".into()])
        .await
        .unwrap();
    state.save_note(id, "few-shot prompting").await.unwrap();
    state.save_code_link(id, "  https://github.com/openai/gpt-3 ").await.unwrap();

    let stored = state.store().get(id).await.unwrap().unwrap();
    assert_eq!(stored.tags, vec!["nlp", "gpt"]);
    assert_eq!(stored.note, "few-shot prompting");
    assert_eq!(stored.code_link, "https://github.com/openai/gpt-3");
    assert_eq!(state.get(id).unwrap(), &stored);

    assert!(state.tag_vocabulary().contains("gpt"));
    assert_eq!(state.suggest_tags("gp")[0].tag, "gpt");
}

#[tokio::test]
async fn test_unknown_paper_is_rejected() {
    let mut state = state_with(three_papers()).await;
    let err = state.save_note("Arxiv-nope", "x").await.unwrap_err();
    assert!(matches!(err, MemoryError::UnknownPaper(id) if id == "Arxiv-nope"));
}

#[tokio::test]
async fn test_favorite_toggle_resorts_by_favorite_date() {
    let mut state = state_with(three_papers()).await;
    state.set_sort_key(SortKey::FavoriteDate);
    state.set_sort_direction(SortDirection::Descending);

    let (favorite, update) = state.toggle_favorite("Arxiv-2301.00003").await.unwrap();
    assert!(favorite);
    assert_eq!(update, ViewUpdate::Reset(Some(0..3)));
    assert_eq!(state.papers()[0].id, "Arxiv-2301.00003");

    let (favorite, _) = state.toggle_favorite("Arxiv-2301.00003").await.unwrap();
    assert!(!favorite);
    assert!(state.get("Arxiv-2301.00003").unwrap().favorite_date.is_none());
    assert_ne!(state.papers()[0].id, "Arxiv-2301.00003");
}

#[tokio::test]
async fn test_visit_moves_paper_to_top() {
    let mut state = state_with(many_papers(10)).await;
    let update = state.record_visit("Website-p0000").await.unwrap();
    assert_eq!(update, ViewUpdate::Reset(Some(0..10)));
    assert_eq!(state.papers()[0].id, "Website-p0000");
    assert_eq!(state.get("Website-p0000").unwrap().count, 1);
}

#[tokio::test]
async fn test_delete_keeps_order_and_rendered_rows() {
    let mut state = state_with(many_papers(150)).await;
    assert_eq!(state.set_query(""), Some(0..100));
    let before: Vec<String> = ids(state.visible());

    let removed = state.delete_paper(&before[3]).await.unwrap();
    assert_eq!(removed.id, before[3]);

    let mut expected = before.clone();
    expected.remove(3);
    assert_eq!(ids(state.visible()), expected);
    assert_eq!(state.paginator().rendered(), 99);
    assert_eq!(state.more(), Some(99..149));
    assert!(state.store().get(&before[3]).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_paper_is_sorted_in() {
    let mut state = state_with(many_papers(3)).await;
    let fresh = Paper::new(PaperSource::Arxiv, "2401.1", "Fresh");
    state.add_paper(fresh).await.unwrap();
    assert_eq!(state.papers()[0].id, "Arxiv-2401.1");
    assert_eq!(state.store().get_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_overlay_lifecycle() {
    let mut state = state_with(many_papers(120)).await;
    state.set_sort_key(SortKey::Title);

    assert_eq!(state.begin_open().unwrap(), Some(0..100));
    assert_eq!(state.sort().key, SortKey::LastOpenDate);
    assert_eq!(state.overlay_state(), OverlayState::Opening);
    state.finish_open().unwrap();

    state.set_query("paper 11");
    state.set_favorites_only(true);
    state.begin_close().unwrap();
    state.finish_close().unwrap();

    assert_eq!(state.overlay_state(), OverlayState::Closed);
    assert_eq!(state.query().raw(), "");
    assert!(!state.favorites_only());
    assert_eq!(state.visible_len(), 120);
    assert_eq!(state.papers().len(), 120);
}

#[tokio::test]
async fn test_overlay_rejects_out_of_order_events() {
    let mut state = state_with(three_papers()).await;
    assert!(matches!(state.finish_open(), Err(MemoryError::Overlay(_))));
}

/// Rows a list view shows, following the ranges and resets the state hands out.
#[derive(Default)]
struct ShownRows(Vec<String>);

impl ShownRows {
    fn append(&mut self, state: &MemoryState<MemoryStore>, range: Option<Range<usize>>) {
        if let Some(range) = range {
            self.0.extend(ids(state.visible_page(range)));
        }
    }

    fn apply(&mut self, state: &MemoryState<MemoryStore>, update: ViewUpdate) {
        if let ViewUpdate::Reset(range) = update {
            self.0.clear();
            self.append(state, range);
        }
    }

    fn all_distinct(&self) -> bool {
        self.0.iter().collect::<HashSet<_>>().len() == self.0.len()
    }
}

#[tokio::test]
async fn test_favorite_toggle_while_paged_never_duplicates_rows() {
    let mut state = state_with(many_papers(250)).await;
    state.set_sort_key(SortKey::FavoriteDate);

    let mut shown = ShownRows::default();
    let first = state.set_query("");
    shown.append(&state, first);
    let next = state.more();
    shown.append(&state, next);
    assert_eq!(shown.0.len(), 200);

    let (_, update) = state.toggle_favorite("Website-p0042").await.unwrap();
    assert_eq!(update, ViewUpdate::Reset(Some(0..100)));
    shown.apply(&state, update);
    assert_eq!(shown.0[0], "Website-p0042");

    while let Some(range) = state.more() {
        shown.append(&state, Some(range));
    }
    assert_eq!(shown.0.len(), 250);
    assert!(shown.all_distinct());
    assert_eq!(shown.0, ids(state.visible()));
}

#[tokio::test]
async fn test_visit_under_unrelated_sort_keeps_rows() {
    let mut state = state_with(many_papers(150)).await;
    state.set_sort_key(SortKey::Title);
    state.set_query("");
    state.more();

    let update = state.record_visit("Website-p0003").await.unwrap();
    assert_eq!(update, ViewUpdate::Unchanged);
    assert_eq!(state.paginator().rendered(), 150);
    assert_eq!(state.more(), None);
}

#[tokio::test]
async fn test_scroll_near_bottom_appends_next_page() {
    let mut state = state_with(many_papers(250)).await;
    assert_eq!(state.set_query(""), Some(0..100));

    // Far from the bottom: nothing to append.
    assert_eq!(state.on_scroll(5_000.0, 600.0), None);
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(state.on_scroll(300.0, 600.0), Some(100..200));
    // Within the throttle window the next check is ignored.
    assert_eq!(state.on_scroll(0.0, 600.0), None);
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(state.on_scroll(0.0, 600.0), Some(200..250));
    assert_eq!(state.paginator().rendered(), 250);
}

#[tokio::test]
async fn test_reload_picks_up_outside_writes() {
    let mut state = state_with(many_papers(3)).await;
    state.set_query("paper");

    let outside = Paper::new(PaperSource::Arxiv, "2402.00001", "Written Elsewhere");
    state.store().put(outside).await.unwrap();
    state.store().remove("Website-p0001").await.unwrap();
    assert_eq!(state.papers().len(), 3);

    assert_eq!(state.reload().await.unwrap(), Some(0..2));
    assert_eq!(state.papers().len(), 3);
    assert_eq!(state.papers()[0].id, "Arxiv-2402.00001");
    assert!(state.get("Website-p0001").is_none());
    assert_eq!(state.query().raw(), "paper");
    assert_eq!(ids(state.visible()), vec!["Website-p0002", "Website-p0000"]);
}

#[tokio::test]
async fn test_tag_edit_under_active_query_keeps_rows() {
    let mut state = state_with(three_papers()).await;
    state.set_query("t:nlp");
    let before = ids(state.visible());
    assert_eq!(before.len(), 2);
    let rendered = state.paginator().rendered();

    state
        .save_tags("Arxiv-1901.00001", vec!["language-models".into()])
        .await
        .unwrap();

    assert_eq!(ids(state.visible()), before);
    assert_eq!(state.paginator().rendered(), rendered);
    assert_eq!(state.get("Arxiv-1901.00001").unwrap().tags, vec!["language-models"]);

    // The edit shows up on the next recompute.
    state.set_query("t:nlp");
    assert_eq!(ids(state.visible()), vec!["Arxiv-2301.00003"]);
}

#[tokio::test(start_paused = true)]
async fn test_keystroke_burst_recomputes_once() {
    let mut state = state_with(three_papers()).await;
    let (mut debouncer, mut queries) = state.search_debouncer();

    for text in ["t", "t:", "t:n", "t:nl", "t:nlp"] {
        debouncer.trigger(text.to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let mut recomputes = 0;
    let query = queries.recv().await.unwrap();
    state.set_query(&query);
    recomputes += 1;
    tokio::time::sleep(Duration::from_secs(1)).await;
    while let Ok(query) = queries.try_recv() {
        state.set_query(&query);
        recomputes += 1;
    }

    assert_eq!(recomputes, 1);
    assert_eq!(state.query().raw(), "t:nlp");
    assert_eq!(state.visible_len(), 2);
}
