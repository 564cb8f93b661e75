use serde::Serialize;
use std::f64::consts::SQRT_2;

use crate::grid::Position;

/// Step cost used by uniform-cost search: 1 orthogonally, sqrt(2) diagonally.
pub fn move_cost(from: Position, to: Position) -> f64 {
    if from.is_diagonal_to(&to) {
        SQRT_2
    } else {
        1.0
    }
}

/// Handle of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub position: Position,
    pub parent: Option<NodeId>,
    /// Accumulated move cost from the root.
    pub cost: f64,
    /// Edges from the root.
    pub depth: usize,
}

/// Append-only store of search nodes.
///
/// A node's parent is fixed when it is inserted and always refers to an
/// earlier node, so walking parents from any node ends at a root.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn root(&mut self, position: Position) -> NodeId {
        self.insert(SearchNode {
            position,
            parent: None,
            cost: 0.0,
            depth: 0,
        })
    }

    /// Adds `position` as a successor of `parent`, extending its cost and depth.
    pub fn child(&mut self, parent: NodeId, position: Position) -> NodeId {
        let from = &self.nodes[parent.0];
        let node = SearchNode {
            position,
            parent: Some(parent),
            cost: from.cost + move_cost(from.position, position),
            depth: from.depth + 1,
        };
        self.insert(node)
    }

    fn insert(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn position(&self, id: NodeId) -> Position {
        self.nodes[id.0].position
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Positions from `id` back to its root, inclusive.
    pub fn ancestry(&self, id: NodeId) -> impl Iterator<Item = Position> + '_ {
        std::iter::successors(Some(id), move |current| self.nodes[current.0].parent)
            .map(move |current| self.nodes[current.0].position)
    }

    /// Root-to-`id` path.
    pub fn path_to(&self, id: NodeId) -> PathRecord {
        let mut cells: Vec<Position> = self.ancestry(id).collect();
        cells.reverse();
        PathRecord::new(cells)
    }
}

/// Ordered cells from start to target, produced once per successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathRecord {
    cells: Vec<Position>,
}

impl PathRecord {
    pub fn new(cells: Vec<Position>) -> Self {
        PathRecord { cells }
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Position> {
        self.cells
    }

    /// Number of cells, endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves.
    pub fn edge_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Sum of [`move_cost`] along the path.
    pub fn cost(&self) -> f64 {
        self.cells.windows(2).map(|w| move_cost(w[0], w[1])).sum()
    }

    pub fn start(&self) -> Option<Position> {
        self.cells.first().copied()
    }

    pub fn target(&self) -> Option<Position> {
        self.cells.last().copied()
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.cells.contains(pos)
    }

    pub(crate) fn extend(&mut self, tail: impl IntoIterator<Item = Position>) {
        self.cells.extend(tail);
    }
}
