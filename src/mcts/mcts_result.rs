use crate::evaluation::cache::CacheStats;

/// Statistics of one root child after a search.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSummary<M> {
    pub mv: M,
    pub visit_count: u32,
    pub value_sum: f64,
    pub ordering_score: i64,
}

impl<M> ChildSummary<M> {
    pub fn average_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f64
        }
    }
}

/// Outcome of [`crate::mcts::Mcts::run`].
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub best_move: M,
    /// Iterations actually completed (fewer than requested if stopped early).
    pub iterations: usize,
    pub root_visits: u32,
    /// Root children in expansion order.
    pub children: Vec<ChildSummary<M>>,
    pub tree_size: usize,
    pub cache_stats: CacheStats,
    /// Whether the stop flag ended the search before the budget.
    pub stopped_early: bool,
}
