pub mod move_ordering;

pub use move_ordering::{order_moves, score_move, OrderingWeights};
