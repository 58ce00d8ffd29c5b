//! Position adapter contract consumed by the search.
//!
//! The engine never inspects a board directly. Everything it needs (legal
//! moves, successor positions, tactical facts for move ordering, terminal
//! status and a cache key) goes through [`GamePosition`].

use std::fmt;

/// Kind of piece removed by a capture, used to weight captures during move ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Victim value table: pawn 1, knight/bishop 3, rook 5, queen 9, king 100.
    ///
    /// A king is never captured under legal rules but still gets a value so
    /// that a malformed adapter cannot make a king capture look quiet.
    pub fn victim_value(self) -> i64 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 100,
        }
    }
}

/// Result of a finished game, seen from the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The side to move has lost (checkmated).
    Loss,
    /// No legal moves and not lost (stalemate).
    Draw,
}

impl GameOutcome {
    /// Scalar value of the outcome from the side-to-move perspective.
    pub fn value(self) -> f64 {
        match self {
            GameOutcome::Loss => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }
}

/// A game state the search can query and advance.
///
/// Implementations must be pure: `apply` returns a new position and leaves
/// `self` untouched, and every query answers for the position as it is.
pub trait GamePosition: Clone {
    type Move: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// Legal moves in generation order. Empty for a terminal position.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Successor position after `mv`.
    fn apply(&self, mv: &Self::Move) -> Self;

    fn is_capture(&self, mv: &Self::Move) -> bool;

    fn gives_check(&self, mv: &Self::Move) -> bool;

    fn is_castling(&self, mv: &Self::Move) -> bool;

    /// Kind of the captured piece, if `mv` captures.
    fn piece_captured(&self, mv: &Self::Move) -> Option<PieceKind>;

    /// Whether the side to move is checkmated in this position.
    fn is_checkmate(&self) -> bool;

    /// Whether `mv` lands on one of the central squares.
    fn targets_center(&self, mv: &Self::Move) -> bool;

    /// Stable, collision-resistant key identifying the strategic state.
    fn canonical_key(&self) -> String;

    /// `Some` exactly when the position has no legal moves.
    fn outcome(&self) -> Option<GameOutcome>;

    /// Whether the position has no legal moves.
    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}
