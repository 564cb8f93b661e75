use rustc_hash::FxHashSet;

use crate::algorithms::common::{SearchAlgorithm, SearchContext, Termination};
use crate::grid::Position;
use crate::node::{NodeArena, NodeId};

/// Depth-first search with a LIFO frontier.
///
/// Cells are settled when popped, not when pushed: a cell can sit on the
/// stack several times and the first copy popped wins. The path found is
/// whatever branch reached the target first, not a shortest one.
#[derive(Debug, Default)]
pub struct DepthFirst;

impl DepthFirst {
    pub fn new() -> Self {
        DepthFirst
    }
}

impl SearchAlgorithm for DepthFirst {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination {
        let mut arena = NodeArena::new();
        let mut stack: Vec<NodeId> = vec![arena.root(start)];
        let mut frontier: FxHashSet<Position> = FxHashSet::default();
        let mut explored: FxHashSet<Position> = FxHashSet::default();
        frontier.insert(start);

        loop {
            if ctx.is_cancelled() {
                return Termination::Cancelled;
            }
            let Some(id) = stack.pop() else {
                return Termination::Exhausted;
            };
            let current = arena.position(id);
            if explored.contains(&current) {
                continue;
            }
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
                if !explored.contains(&next) {
                    stack.push(arena.child(id, next));
                    frontier.insert(next);
                }
            }
        }
    }
}
