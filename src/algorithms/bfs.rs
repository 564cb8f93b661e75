use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use crate::algorithms::common::{SearchAlgorithm, SearchContext, Termination};
use crate::grid::Position;
use crate::node::{NodeArena, NodeId};

/// Breadth-first search: FIFO frontier, cells marked visited as soon as they
/// are queued. Paths are shortest by move count.
#[derive(Debug, Default)]
pub struct BreadthFirst;

impl BreadthFirst {
    pub fn new() -> Self {
        BreadthFirst
    }
}

impl SearchAlgorithm for BreadthFirst {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination {
        let mut arena = NodeArena::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let mut came_from: FxHashMap<Position, NodeId> = FxHashMap::default();
        let mut frontier: FxHashSet<Position> = FxHashSet::default();
        let mut explored: FxHashSet<Position> = FxHashSet::default();

        let root = arena.root(start);
        came_from.insert(start, root);
        queue.push_back(root);
        frontier.insert(start);

        loop {
            if ctx.is_cancelled() {
                return Termination::Cancelled;
            }
            let Some(id) = queue.pop_front() else {
                return Termination::Exhausted;
            };
            let current = arena.position(id);
            frontier.remove(&current);
            if ctx.is_blocked(current) {
                continue;
            }

            explored.insert(current);
            ctx.expand(current, &frontier, &explored);

            if current == target {
                return Termination::Found(arena.path_to(id));
            }

            for next in ctx.neighbors(current) {
                if let Entry::Vacant(slot) = came_from.entry(next) {
                    let child = arena.child(id, next);
                    slot.insert(child);
                    queue.push_back(child);
                    frontier.insert(next);
                }
            }
        }
    }
}
