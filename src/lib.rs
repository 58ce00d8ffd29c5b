//! # MCTS Chess Library
//!
//! Move selection for two-player perfect-information games with Monte Carlo
//! Tree Search guided by a position-value oracle.
//!
//! ## Features
//!
//! - **Search Engine**: selection, expansion, evaluation and backpropagation over an arena tree
//! - **Move Ordering**: tactical scoring (captures, checks, mates, castling, center) that biases expansion
//! - **Evaluation Cache**: bounded LRU memo of oracle values, shareable across threads
//! - **Chess Adapter**: `shakmaty`-backed positions with FEN input and UCI output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mcts_chess::{search, ChessPosition, EvaluationCache, MaterialOracle};
//!
//! let position = ChessPosition::new();
//! let mut cache = EvaluationCache::with_capacity(100_000).unwrap();
//! let best = search(&position, 500, &MaterialOracle::default(), &mut cache, false);
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Cache-checked position evaluation and value oracles
pub mod evaluation;

/// Position adapter contract and the chess implementation
pub mod game;

/// Logging setup for binaries
pub mod logging;

/// Monte Carlo Tree Search engine
pub mod mcts;

/// Move ordering heuristics
pub mod strategy;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use evaluation::{
    evaluate, CacheStats, EvaluationCache, LinearOracle, MaterialOracle, OracleError,
    SharedEvaluationCache, ValueCache, ValueOracle,
};
pub use game::{
    ChessMove, ChessPosition, ChessPositionError, GameOutcome, GamePosition, PieceKind, Turn,
};
pub use mcts::{
    search, Backpropagation, ChildSummary, Mcts, SearchConfig, SearchError, SearchLimits,
    SearchResult,
};
pub use strategy::{order_moves, score_move, OrderingWeights};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Position error: {0}")]
    Position(#[from] ChessPositionError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
