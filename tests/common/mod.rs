//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use mcts_chess::{GameOutcome, GamePosition, OracleError, PieceKind, ValueOracle};

/// Subtraction game: players alternately remove 1..=`max_take` stones and the
/// player left without a move loses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeAway {
    pub pile: u32,
    pub max_take: u32,
    /// Plies played so far, part of the key so both sides stay distinct.
    pub ply: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Take(pub u32);

impl fmt::Display for Take {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take{}", self.0)
    }
}

impl TakeAway {
    pub fn new(pile: u32, max_take: u32) -> Self {
        Self {
            pile,
            max_take,
            ply: 0,
        }
    }
}

impl GamePosition for TakeAway {
    type Move = Take;

    fn legal_moves(&self) -> Vec<Take> {
        (1..=self.max_take.min(self.pile)).map(Take).collect()
    }

    fn apply(&self, mv: &Take) -> Self {
        Self {
            pile: self.pile - mv.0,
            max_take: self.max_take,
            ply: self.ply + 1,
        }
    }

    fn is_capture(&self, _mv: &Take) -> bool {
        false
    }

    /// Taking the last stone plays the role of a mating check.
    fn gives_check(&self, mv: &Take) -> bool {
        mv.0 == self.pile
    }

    fn is_castling(&self, _mv: &Take) -> bool {
        false
    }

    fn piece_captured(&self, _mv: &Take) -> Option<PieceKind> {
        None
    }

    fn is_checkmate(&self) -> bool {
        self.pile == 0
    }

    fn targets_center(&self, _mv: &Take) -> bool {
        false
    }

    fn canonical_key(&self) -> String {
        format!("{}/{}/{}", self.pile, self.max_take, self.ply % 2)
    }

    fn outcome(&self) -> Option<GameOutcome> {
        (self.pile == 0).then_some(GameOutcome::Loss)
    }
}

/// Returns a fixed value and counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingOracle {
    pub value: f64,
    calls: AtomicUsize,
}

impl CountingOracle {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ValueOracle<TakeAway> for CountingOracle {
    fn predict(&self, _position: &TakeAway) -> Result<f64, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}
