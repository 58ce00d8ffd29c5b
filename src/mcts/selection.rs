//! Tree descent and backpropagation.
//!
//! Selection score of a child:
//!
//! ```text
//! value_sum / (visits + eps) + C * sqrt(ln(parent_visits + 1) / (visits + 1))
//! ```

use crate::game::position::GamePosition;
use crate::mcts::hyperparameters::Backpropagation;
use crate::mcts::node::{NodeId, SearchTree};

/// Selection score of a child with the given statistics.
pub fn selection_score(
    parent_visits: u32,
    child_visits: u32,
    child_value_sum: f64,
    exploration_constant: f64,
    epsilon: f64,
) -> f64 {
    let exploitation = child_value_sum / (child_visits as f64 + epsilon);
    let exploration = exploration_constant
        * ((parent_visits as f64 + 1.0).ln() / (child_visits as f64 + 1.0)).sqrt();
    exploitation + exploration
}

/// Child of `id` with the highest selection score; ties go to the first
/// child in child order. `None` when `id` has no children.
pub fn select_child<P: GamePosition>(
    tree: &SearchTree<P>,
    id: NodeId,
    exploration_constant: f64,
    epsilon: f64,
) -> Option<NodeId> {
    let parent_visits = tree.node(id).visit_count;
    let mut best: Option<(NodeId, f64)> = None;

    for &child_id in tree.children(id) {
        let child = tree.node(child_id);
        let score = selection_score(
            parent_visits,
            child.visit_count,
            child.value_sum,
            exploration_constant,
            epsilon,
        );
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((child_id, score)),
        }
    }

    best.map(|(child_id, _)| child_id)
}

/// Follows [`select_child`] from `start` until a node without children.
pub fn select_leaf<P: GamePosition>(
    tree: &SearchTree<P>,
    start: NodeId,
    exploration_constant: f64,
    epsilon: f64,
) -> NodeId {
    let mut current = start;
    while let Some(child) = select_child(tree, current, exploration_constant, epsilon) {
        current = child;
    }
    current
}

/// Adds one visit and the evaluation of `leaf` to every node from `leaf` up
/// to the root inclusive.
///
/// `value` is the leaf evaluation from the side to move at `leaf`. With
/// [`Backpropagation::Negamax`] each node stores the value from the player
/// who moved into it, so the sign flips at every ply starting with a flip at
/// the leaf. With [`Backpropagation::Absolute`] `value` is added unchanged.
pub fn backpropagate<P: GamePosition>(
    tree: &mut SearchTree<P>,
    leaf: NodeId,
    value: f64,
    mode: Backpropagation,
) {
    let mut signed = match mode {
        Backpropagation::Negamax => -value,
        Backpropagation::Absolute => value,
    };
    let mut current = Some(leaf);
    while let Some(id) = current {
        tree.record_visit(id, signed);
        if mode == Backpropagation::Negamax {
            signed = -signed;
        }
        current = tree.node(id).parent;
    }
}
