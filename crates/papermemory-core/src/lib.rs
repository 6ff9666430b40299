//! papermemory-core: Core library for the PaperMemory paper library
//!
//! This library provides:
//! - The paper record model and its lenient JSON form
//! - Search query parsing (text, `t:` tags, `y:` years, `c:` code links)
//! - The filter, sort and pagination pipeline over the loaded memory
//! - Application state tying the pipeline to a persistent store
//! - Search debouncing and the overlay lifecycle
//! - The Anki flashcard bridge client
//! - Markdown and BibTeX export

pub mod anki;
pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod filter;
pub mod overlay;
pub mod pagination;
pub mod paper;
pub mod query;
pub mod render;
pub mod sort;
pub mod state;
pub mod store;

pub use anki::{AnkiClient, AnkiError, AnkiNote};
pub use config::{AnkiConfig, ConfigError, MemoryConfig};
pub use debounce::Debouncer;
pub use error::MemoryError;
pub use export::{cite_key, to_bibtex, to_markdown_link};
pub use filter::{filter_indices, filter_papers, SearchField};
pub use overlay::{Overlay, OverlayError, OverlayState};
pub use pagination::Paginator;
pub use paper::{Paper, PaperSource};
pub use query::{QueryKind, SearchQuery, YearMode};
pub use render::{render_page, PaperRenderer, PlainTextRenderer, RenderError};
pub use sort::{sort_papers, SortDirection, SortKey, SortState};
pub use state::{MemoryState, ViewUpdate};
pub use store::{JsonFileStore, MemoryStore, PaperStore, StoreError, DATA_VERSION_KEY};

/// Returns the version of papermemory-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
