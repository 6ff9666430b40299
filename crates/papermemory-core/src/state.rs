//! Application state for the memory view.
//!
//! `MemoryState` owns the loaded paper collection (kept in the active sort
//! order), the current query and favorites toggle, the filtered view and the
//! pagination cursor. All changes go through its methods; edits are written
//! to the store before the in-memory record changes.

use std::ops::Range;
use std::time::Instant;

use chrono::Utc;
use papermemory_tags::{complete, dedup_tags, Suggestion, TagVocabulary};
use tokio::sync::mpsc;

use crate::config::MemoryConfig;
use crate::debounce::Debouncer;
use crate::error::MemoryError;
use crate::filter::filter_indices;
use crate::overlay::{Overlay, OverlayState};
use crate::pagination::Paginator;
use crate::paper::Paper;
use crate::query::SearchQuery;
use crate::sort::{SortDirection, SortKey, SortState};
use crate::store::PaperStore;

/// What the view has to do after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Rows already rendered are still in place.
    Unchanged,
    /// The list was re-sorted: clear rendered output, then render this first
    /// page (`None` when the filtered list is empty).
    Reset(Option<Range<usize>>),
}

pub struct MemoryState<S> {
    store: S,
    config: MemoryConfig,
    papers: Vec<Paper>,
    sort: SortState,
    query: SearchQuery,
    favorites_only: bool,
    filtered: Vec<usize>,
    paginator: Paginator,
    vocabulary: TagVocabulary,
    overlay: Overlay,
}

impl<S: PaperStore> MemoryState<S> {
    /// Read every paper from the store and sort with the configured default.
    pub async fn load(store: S, config: MemoryConfig) -> Result<Self, MemoryError> {
        let papers = store.get_all().await?;
        let sort = SortState::new(config.default_sort_key, config.default_sort_direction);
        let paginator = Paginator::new(config.page_size, config.scroll_throttle());

        let mut state = Self {
            store,
            config,
            papers,
            sort,
            query: SearchQuery::default(),
            favorites_only: false,
            filtered: Vec::new(),
            paginator,
            vocabulary: TagVocabulary::default(),
            overlay: Overlay::default(),
        };
        state.sort.apply(&mut state.papers);
        state.refresh_vocabulary();
        state.filtered = (0..state.papers.len()).collect();
        tracing::info!(papers = state.papers.len(), "memory loaded");
        Ok(state)
    }

    /// Re-read the store, e.g. after another surface edited it.
    pub async fn reload(&mut self) -> Result<Option<Range<usize>>, MemoryError> {
        self.papers = self.store.get_all().await?;
        self.sort.apply(&mut self.papers);
        self.refresh_vocabulary();
        Ok(self.refilter())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// The full sorted collection.
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == id)
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// Number of papers in the filtered list.
    pub fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    /// The filtered list, in sort order.
    pub fn visible(&self) -> impl Iterator<Item = &Paper> + '_ {
        self.filtered.iter().map(move |&i| &self.papers[i])
    }

    /// A slice of the filtered list, clamped to its length.
    pub fn visible_page(&self, range: Range<usize>) -> Vec<&Paper> {
        let end = range.end.min(self.filtered.len());
        let start = range.start.min(end);
        self.filtered[start..end]
            .iter()
            .map(|&i| &self.papers[i])
            .collect()
    }

    // ===== Query, toggle and sort =====

    /// Apply a new search text. Returns the first page to render.
    pub fn set_query(&mut self, raw: &str) -> Option<Range<usize>> {
        self.query = SearchQuery::parse(raw);
        self.refilter()
    }

    /// Debouncer for search keystrokes, using the configured delay.
    ///
    /// Feed every keystroke to `trigger`; pass each text that arrives on the
    /// receiver to [`MemoryState::set_query`].
    pub fn search_debouncer(&self) -> (Debouncer<String>, mpsc::UnboundedReceiver<String>) {
        Debouncer::new(self.config.search_debounce())
    }

    /// Reset to the unfiltered, not-favorites-only view.
    pub fn clear_query(&mut self) -> Option<Range<usize>> {
        self.query = SearchQuery::default();
        self.favorites_only = false;
        self.refilter()
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) -> Option<Range<usize>> {
        self.favorites_only = favorites_only;
        self.refilter()
    }

    /// Change the sort key. No-op (returns `None`) when the key is unchanged.
    pub fn set_sort_key(&mut self, key: SortKey) -> Option<Range<usize>> {
        if !self.sort.set_key(key, &mut self.papers) {
            return None;
        }
        self.refilter()
    }

    /// Change the sort direction with an in-place reversal.
    pub fn set_sort_direction(&mut self, direction: SortDirection) -> Option<Range<usize>> {
        if !self.sort.set_direction(direction, &mut self.papers) {
            return None;
        }
        self.refilter()
    }

    // ===== Pagination =====

    /// Next slice of the filtered list to append.
    pub fn more(&mut self) -> Option<Range<usize>> {
        self.paginator.next_page(self.filtered.len())
    }

    /// Scroll-proximity event from the view.
    pub fn on_scroll(&mut self, remaining: f32, viewport: f32) -> Option<Range<usize>> {
        self.paginator
            .on_scroll(remaining, viewport, Instant::now(), self.filtered.len())
    }

    // ===== Edits =====

    /// Add a newly parsed paper (or overwrite one with the same id).
    pub async fn add_paper(&mut self, paper: Paper) -> Result<Option<Range<usize>>, MemoryError> {
        self.store.put(paper.clone()).await?;
        match self.position(&paper.id) {
            Ok(index) => self.papers[index] = paper,
            Err(_) => self.papers.push(paper),
        }
        self.sort.apply(&mut self.papers);
        self.refresh_vocabulary();
        Ok(self.refilter())
    }

    pub async fn save_tags(&mut self, id: &str, tags: Vec<String>) -> Result<(), MemoryError> {
        let tags = dedup_tags(tags.into_iter().filter(|t| !t.trim().is_empty()));
        self.commit(id, |paper| paper.tags = tags).await?;
        self.refresh_vocabulary();
        Ok(())
    }

    pub async fn save_note(&mut self, id: &str, note: &str) -> Result<(), MemoryError> {
        let note = note.to_string();
        self.commit(id, |paper| paper.note = note).await?;
        Ok(())
    }

    pub async fn save_code_link(&mut self, id: &str, code_link: &str) -> Result<(), MemoryError> {
        let code_link = code_link.trim().to_string();
        self.commit(id, |paper| paper.code_link = code_link).await?;
        Ok(())
    }

    /// Flip the favorite flag. Returns the new value and the view update.
    ///
    /// Sorted by favorite date, or with the favorites toggle on, the list is
    /// recomputed and the view has to start over from the returned page.
    pub async fn toggle_favorite(&mut self, id: &str) -> Result<(bool, ViewUpdate), MemoryError> {
        let now = Utc::now();
        let index = self
            .commit(id, |paper| {
                let favorite = !paper.favorite;
                paper.set_favorite(favorite, now);
            })
            .await?;
        let favorite = self.papers[index].favorite;
        let update = if self.sort.key == SortKey::FavoriteDate || self.favorites_only {
            self.resort()
        } else {
            ViewUpdate::Unchanged
        };
        Ok((favorite, update))
    }

    /// Count one more open of the paper.
    ///
    /// Sorted by last open date or visit count, the view is reset.
    pub async fn record_visit(&mut self, id: &str) -> Result<ViewUpdate, MemoryError> {
        let now = Utc::now();
        self.commit(id, |paper| paper.record_visit(now)).await?;
        if matches!(self.sort.key, SortKey::LastOpenDate | SortKey::Count) {
            Ok(self.resort())
        } else {
            Ok(ViewUpdate::Unchanged)
        }
    }

    /// Delete a paper from the store, then from the sorted and filtered lists
    /// in place. The rest of the view keeps its order and rendered rows.
    pub async fn delete_paper(&mut self, id: &str) -> Result<Paper, MemoryError> {
        let index = self.position(id)?;
        self.store.remove(id).await?;
        let removed = self.papers.remove(index);

        if let Some(pos) = self.filtered.iter().position(|&i| i == index) {
            self.filtered.remove(pos);
            self.paginator.forget_row(pos);
        }
        for i in self.filtered.iter_mut() {
            if *i > index {
                *i -= 1;
            }
        }

        self.refresh_vocabulary();
        tracing::info!(paper_id = %id, "paper deleted");
        Ok(removed)
    }

    // ===== Tags =====

    pub fn tag_vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    pub fn suggest_tags(&self, fragment: &str) -> Vec<Suggestion> {
        complete(&self.vocabulary, fragment, self.config.tag_suggestion_limit)
    }

    // ===== Overlay lifecycle =====

    /// Start opening: default sort, cleared search, first page to render.
    pub fn begin_open(&mut self) -> Result<Option<Range<usize>>, MemoryError> {
        self.overlay.transition(OverlayState::Opening)?;
        self.sort = SortState::new(
            self.config.default_sort_key,
            self.config.default_sort_direction,
        );
        self.sort.apply(&mut self.papers);
        self.query = SearchQuery::default();
        self.favorites_only = false;
        Ok(self.refilter())
    }

    /// Opening animation finished; the search input takes focus now.
    pub fn finish_open(&mut self) -> Result<(), MemoryError> {
        self.overlay.transition(OverlayState::Open)?;
        Ok(())
    }

    pub fn begin_close(&mut self) -> Result<(), MemoryError> {
        self.overlay.transition(OverlayState::Closing)?;
        Ok(())
    }

    /// Closed: drop transient view state. Paper data is untouched.
    pub fn finish_close(&mut self) -> Result<(), MemoryError> {
        self.overlay.transition(OverlayState::Closed)?;
        self.query = SearchQuery::default();
        self.favorites_only = false;
        self.filtered = (0..self.papers.len()).collect();
        self.paginator.reset();
        Ok(())
    }

    // ===== Internals =====

    fn position(&self, id: &str) -> Result<usize, MemoryError> {
        self.papers
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| MemoryError::UnknownPaper(id.to_string()))
    }

    /// Write the mutated record to the store, then replace it in memory.
    async fn commit<F>(&mut self, id: &str, mutate: F) -> Result<usize, MemoryError>
    where
        F: FnOnce(&mut Paper),
    {
        let index = self.position(id)?;
        let mut updated = self.papers[index].clone();
        mutate(&mut updated);
        self.store.put(updated.clone()).await?;
        self.papers[index] = updated;
        Ok(index)
    }

    fn resort(&mut self) -> ViewUpdate {
        self.sort.apply(&mut self.papers);
        ViewUpdate::Reset(self.refilter())
    }

    /// Recompute the filtered list from scratch and reset pagination.
    fn refilter(&mut self) -> Option<Range<usize>> {
        self.filtered = filter_indices(&self.papers, &self.query, self.favorites_only);
        self.paginator.reset();
        tracing::debug!(
            query = self.query.raw(),
            favorites_only = self.favorites_only,
            sort = %self.sort.key,
            visible = self.filtered.len(),
            "filter recomputed"
        );
        self.paginator.next_page(self.filtered.len())
    }

    fn refresh_vocabulary(&mut self) {
        self.vocabulary =
            TagVocabulary::from_tag_lists(self.papers.iter().map(|p| p.tags.as_slice()));
    }
}
