pub mod chess;
pub mod position;

pub use chess::{ChessMove, ChessPosition, ChessPositionError, Turn};
pub use position::{GameOutcome, GamePosition, PieceKind};
