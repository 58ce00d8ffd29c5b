//! Chess implementation of [`GamePosition`] backed by `shakmaty`.

use std::fmt;
use std::str::FromStr;

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square};
use thiserror::Error;

use crate::game::position::{GameOutcome, GamePosition, PieceKind};

const CENTER_SQUARES: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// Errors raised while building a chess position from user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessPositionError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal position '{fen}': {reason}")]
    IllegalPosition { fen: String, reason: String },
}

/// Side to move, as accepted from callers that override the FEN turn field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    White,
    Black,
}

impl FromStr for Turn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Turn::White),
            "black" | "b" => Ok(Turn::Black),
            other => Err(format!(
                "invalid turn '{}', expected 'white' or 'black'",
                other
            )),
        }
    }
}

/// A chess move, displayed in UCI notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChessMove(Move);

impl ChessMove {
    pub fn inner(&self) -> &Move {
        &self.0
    }

    /// Destination square of the moving king for castling, `to()` otherwise.
    fn destination(&self) -> Square {
        match &self.0 {
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() {
                    File::G
                } else {
                    File::C
                };
                Square::from_coords(file, king.rank())
            }
            other => other.to(),
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Move::Normal {
                from, promotion, ..
            } => {
                write!(f, "{}{}", from, self.destination())?;
                if let Some(role) = promotion {
                    write!(f, "{}", role.char())?;
                }
                Ok(())
            }
            Move::EnPassant { from, to } => write!(f, "{}{}", from, to),
            Move::Castle { king, .. } => write!(f, "{}{}", king, self.destination()),
            Move::Put { role, to } => write!(f, "{}@{}", role.upper_char(), to),
        }
    }
}

/// Chess position wrapper.
#[derive(Debug, Clone, Default)]
pub struct ChessPosition {
    inner: Chess,
}

impl ChessPosition {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessPositionError> {
        let parsed = Fen::from_str(fen.trim()).map_err(|e| ChessPositionError::InvalidFen {
            fen: fen.to_string(),
            reason: e.to_string(),
        })?;
        let inner = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| ChessPositionError::IllegalPosition {
                fen: fen.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { inner })
    }

    /// Parses `fen` and forces the side to move, ignoring the FEN turn field.
    pub fn from_fen_with_turn(fen: &str, turn: Turn) -> Result<Self, ChessPositionError> {
        let mut fields: Vec<&str> = fen.split_whitespace().collect();
        let turn_field = match turn {
            Turn::White => "w",
            Turn::Black => "b",
        };
        match fields.len() {
            0 => {
                return Err(ChessPositionError::InvalidFen {
                    fen: fen.to_string(),
                    reason: "empty FEN".to_string(),
                })
            }
            1 => fields.extend([turn_field, "-", "-", "0", "1"]),
            _ => fields[1] = turn_field,
        }
        Self::from_fen(&fields.join(" "))
    }

    pub fn inner(&self) -> &Chess {
        &self.inner
    }

    pub fn turn(&self) -> Turn {
        match self.inner.turn() {
            Color::White => Turn::White,
            Color::Black => Turn::Black,
        }
    }

    /// Full FEN including move clocks.
    pub fn fen(&self) -> String {
        Fen(self.inner.clone().into_setup(EnPassantMode::Legal)).to_string()
    }

    /// Piece codes for the 64 squares in FEN order (rank 8 down to rank 1,
    /// file a to h). Black pieces are positive 1..=6 (p, n, b, r, q, k),
    /// white pieces negative, empty squares zero.
    pub fn board_array(&self) -> [i8; 64] {
        let board = self.inner.board();
        let mut cells = [0i8; 64];
        for (cell_index, cell) in cells.iter_mut().enumerate() {
            let rank = 7 - (cell_index / 8) as u32;
            let file = (cell_index % 8) as u32;
            if let Some(piece) = board.piece_at(Square::new(rank * 8 + file)) {
                let code = role_code(piece.role);
                *cell = match piece.color {
                    Color::Black => code,
                    Color::White => -code,
                };
            }
        }
        cells
    }

    /// Material balance in pawn units from the side to move.
    pub fn material_balance(&self) -> i64 {
        let board = self.inner.board();
        let mover = self.inner.turn();
        let mut balance = 0i64;
        for index in 0..64u32 {
            if let Some(piece) = board.piece_at(Square::new(index)) {
                if piece.role == Role::King {
                    continue;
                }
                let value = piece_kind(piece.role).victim_value();
                balance += if piece.color == mover { value } else { -value };
            }
        }
        balance
    }

    fn after(&self, mv: &ChessMove) -> Chess {
        let mut next = self.inner.clone();
        next.play_unchecked(&mv.0);
        next
    }
}

impl From<Chess> for ChessPosition {
    fn from(inner: Chess) -> Self {
        Self { inner }
    }
}

impl GamePosition for ChessPosition {
    type Move = ChessMove;

    fn legal_moves(&self) -> Vec<ChessMove> {
        self.inner.legal_moves().into_iter().map(ChessMove).collect()
    }

    fn apply(&self, mv: &ChessMove) -> Self {
        Self {
            inner: self.after(mv),
        }
    }

    fn is_capture(&self, mv: &ChessMove) -> bool {
        mv.0.is_capture()
    }

    fn gives_check(&self, mv: &ChessMove) -> bool {
        self.after(mv).is_check()
    }

    fn is_castling(&self, mv: &ChessMove) -> bool {
        mv.0.is_castle()
    }

    fn piece_captured(&self, mv: &ChessMove) -> Option<PieceKind> {
        mv.0.capture().map(piece_kind)
    }

    fn is_checkmate(&self) -> bool {
        self.inner.is_checkmate()
    }

    fn targets_center(&self, mv: &ChessMove) -> bool {
        CENTER_SQUARES.contains(&mv.destination())
    }

    /// FEN without the halfmove and fullmove clocks.
    fn canonical_key(&self) -> String {
        let fen = self.fen();
        fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }

    fn outcome(&self) -> Option<GameOutcome> {
        if !self.inner.legal_moves().is_empty() {
            return None;
        }
        if self.inner.is_check() {
            Some(GameOutcome::Loss)
        } else {
            Some(GameOutcome::Draw)
        }
    }
}

fn piece_kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn role_code(role: Role) -> i8 {
    match role {
        Role::Pawn => 1,
        Role::Knight => 2,
        Role::Bishop => 3,
        Role::Rook => 4,
        Role::Queen => 5,
        Role::King => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_move(position: &ChessPosition, uci: &str) -> ChessMove {
        position
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_string() == uci)
            .unwrap_or_else(|| panic!("move {} not legal", uci))
    }

    #[test]
    fn test_starting_position_has_twenty_moves() {
        let position = ChessPosition::new();
        assert_eq!(position.legal_moves().len(), 20);
        assert!(position.outcome().is_none());
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        let err = ChessPosition::from_fen("not a fen").unwrap_err();
        assert!(matches!(err, ChessPositionError::InvalidFen { .. }));
    }

    #[test]
    fn test_turn_override() {
        let fen = "k7/8/8/8/8/8/3q4/3R3K w - - 0 1";
        let position = ChessPosition::from_fen_with_turn(fen, Turn::Black).unwrap();
        assert_eq!(position.turn(), Turn::Black);

        let board_only = ChessPosition::from_fen_with_turn("8/8/8/8/8/5k2/8/5K2", Turn::White)
            .unwrap();
        assert_eq!(board_only.turn(), Turn::White);
    }

    #[test]
    fn test_turn_parsing() {
        assert_eq!("White".parse::<Turn>(), Ok(Turn::White));
        assert_eq!("b".parse::<Turn>(), Ok(Turn::Black));
        assert!("red".parse::<Turn>().is_err());
    }

    #[test]
    fn test_castling_displays_as_king_move() {
        let position =
            ChessPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let short = find_move(&position, "e1g1");
        assert!(position.is_castling(&short));
        let long = find_move(&position, "e1c1");
        assert!(position.is_castling(&long));
    }

    #[test]
    fn test_promotion_display() {
        let position = ChessPosition::from_fen("6k1/8/8/8/8/8/6p1/K7 b - - 0 1").unwrap();
        let promotion = find_move(&position, "g2g1q");
        assert_eq!(promotion.to_string(), "g2g1q");
        assert!(!position.is_capture(&promotion));
        let underpromotion = find_move(&position, "g2g1n");
        assert_eq!(underpromotion.to_string(), "g2g1n");
    }

    #[test]
    fn test_capture_and_check_queries() {
        // Black queen on d2 can take the rook on d1 with check.
        let position = ChessPosition::from_fen("k7/8/8/8/8/8/3q4/3R3K b - - 0 1").unwrap();
        let capture = find_move(&position, "d2d1");
        assert!(position.is_capture(&capture));
        assert_eq!(position.piece_captured(&capture), Some(PieceKind::Rook));
        assert!(position.gives_check(&capture));
    }

    #[test]
    fn test_en_passant_reports_pawn_capture() {
        let position =
            ChessPosition::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let en_passant = find_move(&position, "e5d6");
        assert_eq!(position.piece_captured(&en_passant), Some(PieceKind::Pawn));
    }

    #[test]
    fn test_center_detection() {
        let position = ChessPosition::new();
        assert!(position.targets_center(&find_move(&position, "e2e4")));
        assert!(position.targets_center(&find_move(&position, "d2d4")));
        assert!(!position.targets_center(&find_move(&position, "e2e3")));
    }

    #[test]
    fn test_checkmate_outcome() {
        // Fool's mate, white is mated.
        let position = ChessPosition::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert!(position.is_checkmate());
        assert_eq!(position.outcome(), Some(GameOutcome::Loss));
        assert!(position.is_terminal());
    }

    #[test]
    fn test_stalemate_outcome() {
        let position = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!position.is_checkmate());
        assert_eq!(position.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_canonical_key_ignores_move_clocks() {
        let early = ChessPosition::from_fen("8/8/8/8/8/5k2/8/5K2 b - - 0 1").unwrap();
        let late = ChessPosition::from_fen("8/8/8/8/8/5k2/8/5K2 b - - 37 80").unwrap();
        assert_eq!(early.canonical_key(), late.canonical_key());
        assert_eq!(early.canonical_key(), "8/8/8/8/8/5k2/8/5K2 b - -");

        let other_turn = ChessPosition::from_fen("8/8/8/8/8/5k2/8/5K2 w - - 0 1").unwrap();
        assert_ne!(early.canonical_key(), other_turn.canonical_key());
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let position = ChessPosition::new();
        let before = position.canonical_key();
        let next = position.apply(&find_move(&position, "e2e4"));
        assert_eq!(position.canonical_key(), before);
        assert_ne!(next.canonical_key(), before);
        assert_eq!(next.turn(), Turn::Black);
    }

    #[test]
    fn test_board_array_layout() {
        let cells = ChessPosition::new().board_array();
        // a8 black rook, e8 black king, e1 white king, h1 white rook.
        assert_eq!(cells[0], 4);
        assert_eq!(cells[4], 6);
        assert_eq!(cells[60], -6);
        assert_eq!(cells[63], -4);
        assert!(cells[16..48].iter().all(|&c| c == 0));
        assert_eq!(cells.iter().map(|&c| c as i32).sum::<i32>(), 0);
    }

    #[test]
    fn test_material_balance_from_side_to_move() {
        assert_eq!(ChessPosition::new().material_balance(), 0);
        let white_up_rook = "4k3/8/8/8/8/8/8/R3K3";
        let white_view = ChessPosition::from_fen_with_turn(white_up_rook, Turn::White).unwrap();
        let black_view = ChessPosition::from_fen_with_turn(white_up_rook, Turn::Black).unwrap();
        assert_eq!(white_view.material_balance(), 5);
        assert_eq!(black_view.material_balance(), -5);
    }
}
