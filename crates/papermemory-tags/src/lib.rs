//! papermemory-tags: Tag handling for the PaperMemory library.
//!
//! Tags are free-form user labels attached to papers. A paper's tag list keeps
//! its display order but is matched as a set. The global vocabulary is derived
//! from all papers and only feeds suggestion lists.

pub mod parse;
pub mod query;
pub mod vocabulary;
pub mod autocomplete;

pub use parse::*;
pub use query::*;
pub use vocabulary::*;
pub use autocomplete::*;
