use thiserror::Error;

use crate::evaluation::oracle::OracleError;

/// Errors surfaced by a search invocation. None are retried internally.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The root position is terminal.
    #[error("no legal moves in the root position")]
    NoLegalMoves,

    /// The value oracle failed; the tree is abandoned rather than fed a made-up value.
    #[error("value oracle failed: {0}")]
    OracleFailure(#[from] OracleError),

    #[error("iteration budget must be between 1 and u32::MAX")]
    InvalidIterationBudget,

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
