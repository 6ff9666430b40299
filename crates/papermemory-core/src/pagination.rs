//! Pagination driver for lazily rendered result lists.
//!
//! Rows are rendered in pages appended to what is already shown. A reset
//! clears the output; it happens whenever the filtered list is recomputed,
//! never during an append.

use std::ops::Range;
use std::time::{Duration, Instant};

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_SCROLL_THROTTLE: Duration = Duration::from_millis(50);

/// Cursor over the filtered list.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    cursor: usize,
    rendered: usize,
    throttle: Duration,
    last_check: Option<Instant>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THROTTLE)
    }
}

impl Paginator {
    pub fn new(page_size: usize, throttle: Duration) -> Self {
        Self {
            page_size: page_size.max(1),
            cursor: 0,
            rendered: 0,
            throttle,
            last_check: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based page counter.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of rows currently shown.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Clear rendered output and rewind to the first page.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.rendered = 0;
        self.last_check = None;
    }

    /// The next slice to append, or `None` when every row is already shown.
    ///
    /// The first call after a reset yields the first page.
    pub fn next_page(&mut self, total: usize) -> Option<Range<usize>> {
        if self.rendered >= total {
            return None;
        }
        if self.rendered > 0 {
            self.cursor += 1;
        }
        let start = self.rendered;
        let end = (start + self.page_size).min(total);
        self.rendered = end;
        Some(start..end)
    }

    /// Scroll-proximity check: when the unrendered distance drops below the
    /// viewport height, append the next page. Checks closer together than the
    /// throttle interval are ignored.
    pub fn on_scroll(
        &mut self,
        remaining: f32,
        viewport: f32,
        now: Instant,
        total: usize,
    ) -> Option<Range<usize>> {
        if let Some(last) = self.last_check {
            if now.saturating_duration_since(last) < self.throttle {
                return None;
            }
        }
        self.last_check = Some(now);
        if remaining < viewport {
            self.next_page(total)
        } else {
            None
        }
    }

    /// Account for a shown row removed from the list (a deleted paper).
    pub fn forget_row(&mut self, position: usize) {
        if position < self.rendered {
            self.rendered -= 1;
        }
    }
}
