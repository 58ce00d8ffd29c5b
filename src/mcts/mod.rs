pub mod algorithm;
pub mod error;
pub mod hyperparameters;
pub mod mcts_result;
pub mod node;
pub mod selection;

pub use algorithm::{search, Mcts, SearchLimits};
pub use error::SearchError;
pub use hyperparameters::{Backpropagation, SearchConfig};
pub use mcts_result::{ChildSummary, SearchResult};
pub use node::{Node, NodeId, NodeState, SearchTree};
