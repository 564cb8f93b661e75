use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::algorithms::common::{SearchAlgorithm, SearchContext, Termination};
use crate::grid::Position;
use crate::node::{move_cost, NodeArena, NodeId};

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    order: u64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; equal costs pop in insertion order.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Uniform-cost (Dijkstra) search over orthogonal cost 1 and diagonal
/// cost sqrt(2).
///
/// Improved costs are pushed again rather than updated in place; outdated
/// heap entries are dropped when they surface.
#[derive(Debug, Default)]
pub struct UniformCost;

impl UniformCost {
    pub fn new() -> Self {
        UniformCost
    }
}

impl SearchAlgorithm for UniformCost {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination {
        let mut arena = NodeArena::new();
        let mut open: BinaryHeap<QueueEntry> = BinaryHeap::new();
        let mut best_cost: FxHashMap<Position, f64> = FxHashMap::default();
        let mut frontier: FxHashSet<Position> = FxHashSet::default();
        let mut explored: FxHashSet<Position> = FxHashSet::default();
        let mut order = 0u64;

        let root = arena.root(start);
        best_cost.insert(start, 0.0);
        open.push(QueueEntry {
            cost: 0.0,
            order,
            node: root,
        });
        frontier.insert(start);

        loop {
            if ctx.is_cancelled() {
                return Termination::Cancelled;
            }
            let Some(entry) = open.pop() else {
                return Termination::Exhausted;
            };
            let current = arena.position(entry.node);
            if explored.contains(&current) {
                continue;
            }
            if best_cost.get(&current).is_some_and(|&best| entry.cost > best) {
                continue;
            }
            frontier.remove(&current);
            if ctx.is_blocked(current) {
                continue;
            }

            explored.insert(current);
            ctx.expand(current, &frontier, &explored);

            if current == target {
                return Termination::Found(arena.path_to(entry.node));
            }

            for next in ctx.neighbors(current) {
                if explored.contains(&next) {
                    continue;
                }
                let cost = entry.cost + move_cost(current, next);
                if best_cost.get(&next).map_or(true, |&known| cost < known) {
                    best_cost.insert(next, cost);
                    order += 1;
                    open.push(QueueEntry {
                        cost,
                        order,
                        node: arena.child(entry.node, next),
                    });
                    frontier.insert(next);
                }
            }
        }
    }
}
