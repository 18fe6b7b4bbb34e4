//! Error types
//!
//! The simulation itself is closed and never fails a frame. Errors only arise
//! at its edges: parsing user settings and requesting state transitions.

use thiserror::Error;

use crate::flow::FlowState;

/// Problems with user-supplied configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Difficulty label does not name one of the five tiers
    #[error("unknown difficulty tier '{0}'")]
    UnknownDifficulty(String),

    /// Star opacity must be a percentage
    #[error("star opacity {0} is outside 0-100")]
    StarOpacityOutOfRange(f64),

    /// A settings field has the wrong JSON type
    #[error("settings field '{field}' has an invalid value")]
    InvalidField { field: &'static str },

    /// The settings record is not valid JSON
    #[error("malformed settings record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected game flow requests (caller bugs, never runtime faults)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition { from: FlowState, to: FlowState },

    #[error("a transition toward {0:?} is already in progress")]
    TransitionInProgress(FlowState),
}
