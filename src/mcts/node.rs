//! Search tree storage.
//!
//! Nodes live in an arena owned by [`SearchTree`]; a node's children are
//! indices into the arena and its parent is a plain back-reference used only
//! to walk up during backpropagation. Dropping the tree frees every node.

use crate::game::position::GamePosition;
use crate::strategy::move_ordering::{order_moves, OrderingWeights};

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Expansion state. Transitions are one-way out of `Unexpanded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unexpanded,
    Expanded,
    /// No legal moves; the node stays a leaf forever.
    Terminal,
}

/// One position reached during search.
#[derive(Debug, Clone)]
pub struct Node<P: GamePosition> {
    pub position: P,
    /// Move that produced this node from its parent, `None` at the root.
    pub incoming_move: Option<P::Move>,
    /// Ordering score of `incoming_move` at expansion time.
    pub ordering_score: i64,
    pub parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) visit_count: u32,
    pub(crate) value_sum: f64,
    pub(crate) state: NodeState,
}

impl<P: GamePosition> Node<P> {
    fn new(
        position: P,
        incoming_move: Option<P::Move>,
        ordering_score: i64,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            position,
            incoming_move,
            ordering_score,
            parent,
            children: Vec::new(),
            visit_count: 0,
            value_sum: 0.0,
            state: NodeState::Unexpanded,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    /// Sum of every value backpropagated through this node.
    pub fn value_sum(&self) -> f64 {
        self.value_sum
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Mean backpropagated value, zero before the first visit.
    pub fn average_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f64
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.state == NodeState::Expanded
    }

    pub fn is_terminal(&self) -> bool {
        self.state == NodeState::Terminal
    }
}

/// Arena-backed tree rooted at the analysed position.
#[derive(Debug, Clone)]
pub struct SearchTree<P: GamePosition> {
    nodes: Vec<Node<P>>,
}

impl<P: GamePosition> SearchTree<P> {
    /// Creates a tree holding only an unexpanded root.
    pub fn create_root(position: P) -> Self {
        Self {
            nodes: vec![Node::new(position, None, 0, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).is_leaf()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id).is_expanded()
    }

    /// Expands `id` with one child per legal move, best ordering score first.
    ///
    /// Returns the number of children created. A node is expanded at most
    /// once; calling this on an expanded or terminal node is a no-op that
    /// returns 0. A node without legal moves becomes terminal.
    pub fn expand(&mut self, id: NodeId, weights: &OrderingWeights) -> usize {
        if self.nodes[id.0].state != NodeState::Unexpanded {
            return 0;
        }

        let parent_position = self.nodes[id.0].position.clone();
        let moves = parent_position.legal_moves();
        if moves.is_empty() {
            self.nodes[id.0].state = NodeState::Terminal;
            return 0;
        }

        let ordered = order_moves(&parent_position, moves, weights);
        let mut children = Vec::with_capacity(ordered.len());
        for (mv, score) in ordered {
            let child_position = parent_position.apply(&mv);
            let child_id = NodeId(self.nodes.len());
            self.nodes
                .push(Node::new(child_position, Some(mv), score, Some(id)));
            children.push(child_id);
        }

        let node = &mut self.nodes[id.0];
        node.children = children;
        node.state = NodeState::Expanded;
        node.children.len()
    }

    /// Marks `id` terminal. Only an unexpanded node can become terminal.
    pub(crate) fn mark_terminal(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        if node.state == NodeState::Unexpanded {
            node.state = NodeState::Terminal;
        }
    }

    /// Records one visit with `value` on `id`.
    pub(crate) fn record_visit(&mut self, id: NodeId, value: f64) {
        let node = &mut self.nodes[id.0];
        node.visit_count += 1;
        node.value_sum += value;
    }
}
