//! Move ordering used to bias expansion order.
//!
//! Scores are additive and tactical: captures weighted by victim value,
//! checks, checkmates, castling and central destinations. Ordering never
//! removes a move, it only decides which children are created first.

use serde::{Deserialize, Serialize};

use crate::game::position::GamePosition;

/// Bonuses applied by [`score_move`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingWeights {
    /// Multiplier applied to the captured piece's victim value.
    pub capture_multiplier: i64,
    pub check_bonus: i64,
    /// Must dominate every other combination of bonuses.
    pub checkmate_bonus: i64,
    /// King safety.
    pub castling_bonus: i64,
    pub center_bonus: i64,
}

impl Default for OrderingWeights {
    fn default() -> Self {
        Self {
            capture_multiplier: 10,
            check_bonus: 50,
            checkmate_bonus: 1_000_000,
            castling_bonus: 30,
            center_bonus: 5,
        }
    }
}

/// Heuristic score of `mv` in `position`. Higher sorts first.
pub fn score_move<P: GamePosition>(position: &P, mv: &P::Move, weights: &OrderingWeights) -> i64 {
    let mut score = 0i64;

    if position.is_capture(mv) {
        if let Some(victim) = position.piece_captured(mv) {
            score += weights.capture_multiplier * victim.victim_value();
        }
    }

    if position.gives_check(mv) {
        score += weights.check_bonus;
        // Only a checking move can mate, so the tentative apply is skipped otherwise.
        if position.apply(mv).is_checkmate() {
            score += weights.checkmate_bonus;
        }
    }

    if position.is_castling(mv) {
        score += weights.castling_bonus;
    }

    if position.targets_center(mv) {
        score += weights.center_bonus;
    }

    score
}

/// Pairs every move with its score, sorted by descending score.
///
/// The sort is stable, so equal scores keep move-generation order.
pub fn order_moves<P: GamePosition>(
    position: &P,
    moves: Vec<P::Move>,
    weights: &OrderingWeights,
) -> Vec<(P::Move, i64)> {
    let mut scored: Vec<(P::Move, i64)> = moves
        .into_iter()
        .map(|mv| {
            let score = score_move(position, &mv, weights);
            (mv, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}
