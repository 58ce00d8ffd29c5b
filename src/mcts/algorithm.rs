//! Monte Carlo Tree Search driven by a value oracle.
//!
//! Each iteration descends from the root with [`select_child`] until a node
//! without children, then:
//! - a node never visited (or terminal) is evaluated as is;
//! - a visited node is expanded and its first selected child is evaluated.
//!
//! The evaluation is then backpropagated to the root, so every iteration
//! evaluates exactly one node and performs at most one expansion. The root is
//! expanded once up front, which lets a single iteration already rank a move.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::evaluation::cache::{EvaluationCache, ValueCache};
use crate::evaluation::evaluate;
use crate::evaluation::oracle::ValueOracle;
use crate::game::position::GamePosition;
use crate::mcts::error::SearchError;
use crate::mcts::hyperparameters::SearchConfig;
use crate::mcts::mcts_result::{ChildSummary, SearchResult};
use crate::mcts::node::{NodeId, SearchTree};
use crate::mcts::selection::{backpropagate, select_child, select_leaf};

/// Termination conditions of one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits<'a> {
    pub iterations: usize,
    /// Checked between iterations only; an iteration always runs to completion.
    pub stop: Option<&'a AtomicBool>,
}

impl<'a> SearchLimits<'a> {
    pub fn iterations(iterations: usize) -> Self {
        Self {
            iterations,
            stop: None,
        }
    }

    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    fn should_stop(&self) -> bool {
        self.stop.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Search engine bound to a value oracle and an evaluation cache.
///
/// The cache outlives individual searches; each call to [`Mcts::run`]
/// builds and drops its own tree.
pub struct Mcts<O, C> {
    config: SearchConfig,
    oracle: O,
    cache: C,
    rng: StdRng,
}

impl<O> Mcts<O, EvaluationCache> {
    /// Engine owning a fresh [`EvaluationCache`] sized by `config.cache_capacity`.
    pub fn with_config_cache(config: SearchConfig, oracle: O) -> Result<Self, SearchError> {
        let capacity = NonZeroUsize::new(config.cache_capacity).ok_or_else(|| {
            SearchError::InvalidConfig("cache_capacity must be at least 1".to_string())
        })?;
        Self::new(config, oracle, EvaluationCache::new(capacity))
    }
}

impl<O, C: ValueCache> Mcts<O, C> {
    pub fn new(config: SearchConfig, oracle: O, cache: C) -> Result<Self, SearchError> {
        config
            .validate()
            .map_err(|e| SearchError::InvalidConfig(e.to_string()))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            oracle,
            cache,
            rng,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn into_cache(self) -> C {
        self.cache
    }

    /// Runs `iterations` iterations from `root` and returns the chosen move.
    pub fn search<P>(
        &mut self,
        root: &P,
        iterations: usize,
        exploratory: bool,
    ) -> Result<P::Move, SearchError>
    where
        P: GamePosition,
        O: ValueOracle<P>,
    {
        self.run(root, SearchLimits::iterations(iterations), exploratory)
            .map(|result| result.best_move)
    }

    /// Full search returning the chosen move with root statistics.
    ///
    /// Errors: [`SearchError::NoLegalMoves`] for a terminal root (checked
    /// first), [`SearchError::InvalidIterationBudget`] for a budget of zero or
    /// above `u32::MAX` and
    /// [`SearchError::OracleFailure`] as soon as the oracle fails.
    pub fn run<P>(
        &mut self,
        root: &P,
        limits: SearchLimits<'_>,
        exploratory: bool,
    ) -> Result<SearchResult<P::Move>, SearchError>
    where
        P: GamePosition,
        O: ValueOracle<P>,
    {
        let mut tree = SearchTree::create_root(root.clone());
        let root_id = tree.root();
        if tree.expand(root_id, &self.config.ordering) == 0 {
            return Err(SearchError::NoLegalMoves);
        }
        // Visit counters are u32.
        if limits.iterations == 0 || u32::try_from(limits.iterations).is_err() {
            return Err(SearchError::InvalidIterationBudget);
        }

        let mut completed = 0;
        let mut stopped_early = false;
        while completed < limits.iterations {
            if limits.should_stop() {
                stopped_early = true;
                break;
            }
            self.run_iteration(&mut tree)?;
            completed += 1;
        }

        let chosen = self
            .select_move(&tree, exploratory)
            .ok_or(SearchError::NoLegalMoves)?;
        let best_move = tree
            .node(chosen)
            .incoming_move
            .clone()
            .ok_or(SearchError::NoLegalMoves)?;

        let children: Vec<ChildSummary<P::Move>> = tree
            .children(root_id)
            .iter()
            .filter_map(|&id| {
                let node = tree.node(id);
                node.incoming_move.clone().map(|mv| ChildSummary {
                    mv,
                    visit_count: node.visit_count,
                    value_sum: node.value_sum,
                    ordering_score: node.ordering_score,
                })
            })
            .collect();

        let result = SearchResult {
            best_move,
            iterations: completed,
            root_visits: tree.node(root_id).visit_count,
            children,
            tree_size: tree.len(),
            cache_stats: self.cache.stats(),
            stopped_early,
        };
        log::debug!(
            "MCTS picked {} after {} iterations (tree={} nodes, cache={}/{}, hit rate {:.2})",
            result.best_move,
            result.iterations,
            result.tree_size,
            self.cache.len(),
            self.cache.capacity(),
            result.cache_stats.hit_rate()
        );
        Ok(result)
    }

    fn run_iteration<P>(&mut self, tree: &mut SearchTree<P>) -> Result<(), SearchError>
    where
        P: GamePosition,
        O: ValueOracle<P>,
    {
        let c = self.config.exploration_constant;
        let eps = self.config.epsilon;

        let leaf = select_leaf(tree, tree.root(), c, eps);
        let target = if tree.node(leaf).visit_count == 0 || tree.node(leaf).is_terminal() {
            leaf
        } else {
            tree.expand(leaf, &self.config.ordering);
            select_child(tree, leaf, c, eps).unwrap_or(leaf)
        };

        let value = self.evaluate_node(tree, target)?;
        backpropagate(tree, target, value, self.config.backpropagation);

        if log::log_enabled!(log::Level::Trace) {
            let node = tree.node(target);
            log::trace!(
                "iteration: node {} visits={} value_sum={:.4} eval={:.4}",
                target.index(),
                node.visit_count,
                node.value_sum,
                value
            );
        }
        Ok(())
    }

    /// Terminal positions score their outcome; others go through the cache.
    fn evaluate_node<P>(
        &mut self,
        tree: &mut SearchTree<P>,
        id: NodeId,
    ) -> Result<f64, SearchError>
    where
        P: GamePosition,
        O: ValueOracle<P>,
    {
        let outcome = tree.node(id).position.outcome();
        if let Some(outcome) = outcome {
            tree.mark_terminal(id);
            return Ok(outcome.value());
        }
        let value = evaluate(&tree.node(id).position, &self.oracle, &mut self.cache)?;
        Ok(value)
    }

    fn select_move<P: GamePosition>(
        &mut self,
        tree: &SearchTree<P>,
        exploratory: bool,
    ) -> Option<NodeId> {
        let children = tree.children(tree.root());
        if children.is_empty() {
            return None;
        }

        if !exploratory {
            let mut best: Option<(NodeId, u32)> = None;
            for &id in children {
                let visits = tree.node(id).visit_count;
                match best {
                    Some((_, best_visits)) if visits <= best_visits => {}
                    _ => best = Some((id, visits)),
                }
            }
            return best.map(|(id, _)| id);
        }

        let mut ranked: Vec<NodeId> = children.to_vec();
        ranked.sort_by(|a, b| tree.node(*b).visit_count.cmp(&tree.node(*a).visit_count));
        ranked.truncate(self.config.exploratory_top_k);
        let pick = self.rng.random_range(0..ranked.len());
        Some(ranked[pick])
    }
}

/// One-shot search with the default configuration.
///
/// `cache` may be reused across calls to amortize oracle work.
pub fn search<P, O, C>(
    root: &P,
    iterations: usize,
    oracle: &O,
    cache: &mut C,
    exploratory: bool,
) -> Result<P::Move, SearchError>
where
    P: GamePosition,
    O: ValueOracle<P> + ?Sized,
    C: ValueCache + ?Sized,
{
    let mut engine = Mcts::new(SearchConfig::default(), oracle, cache)?;
    engine.search(root, iterations, exploratory)
}
