//! Lifecycle of the memory overlay: closed → opening → open → closing → closed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlayState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl OverlayState {
    /// The only state reachable from this one.
    pub fn successor(self) -> OverlayState {
        match self {
            OverlayState::Closed => OverlayState::Opening,
            OverlayState::Opening => OverlayState::Open,
            OverlayState::Open => OverlayState::Closing,
            OverlayState::Closing => OverlayState::Closed,
        }
    }

    /// Whether the result list is on screen and accepts input.
    pub fn is_interactive(self) -> bool {
        matches!(self, OverlayState::Open)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("Invalid overlay transition from {from:?} to {to:?}")]
    InvalidTransition { from: OverlayState, to: OverlayState },
}

/// Overlay state machine.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    state: OverlayState,
}

impl Overlay {
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Move to `to`, which must be the successor of the current state.
    pub fn transition(&mut self, to: OverlayState) -> Result<(), OverlayError> {
        if self.state.successor() != to {
            return Err(OverlayError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!(from = ?self.state, to = ?to, "overlay transition");
        self.state = to;
        Ok(())
    }
}
