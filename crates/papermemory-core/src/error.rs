//! Errors from memory state operations.

use thiserror::Error;

use crate::overlay::OverlayError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Paper not in memory: {0}")]
    UnknownPaper(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}
