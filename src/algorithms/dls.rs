use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithms::common::{SearchAlgorithm, SearchContext, Termination};
use crate::grid::Position;
use crate::node::{NodeArena, NodeId, PathRecord};

/// Result of one bounded depth-first pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PassOutcome {
    Found(PathRecord),
    /// Nothing left to pop. `cut_off` is true if some node sat at the limit
    /// and its children were never generated.
    Exhausted { cut_off: bool },
    Cancelled,
}

/// Depth-first search that never expands past `limit` moves from the start.
#[derive(Debug)]
pub struct DepthLimited {
    limit: usize,
}

impl DepthLimited {
    pub fn new(limit: usize) -> Self {
        DepthLimited { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl SearchAlgorithm for DepthLimited {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination {
        ctx.begin_pass(self.limit);
        match depth_limited_pass(ctx, start, target, self.limit) {
            PassOutcome::Found(path) => Termination::Found(path),
            PassOutcome::Exhausted { .. } => Termination::Exhausted,
            PassOutcome::Cancelled => Termination::Cancelled,
        }
    }
}

/// One pass of depth-limited search with fresh bookkeeping.
///
/// A cell reached again at a strictly shallower depth is pushed again, so
/// a target within `limit` moves is always found even when the first
/// branch to touch a cell took the long way there. Nodes at the limit are
/// goal-tested but not expanded.
pub(crate) fn depth_limited_pass(
    ctx: &mut SearchContext<'_>,
    start: Position,
    target: Position,
    limit: usize,
) -> PassOutcome {
    let mut arena = NodeArena::new();
    let mut shallowest: FxHashMap<Position, usize> = FxHashMap::default();
    let mut frontier: FxHashSet<Position> = FxHashSet::default();
    let mut explored: FxHashSet<Position> = FxHashSet::default();
    let mut stack: Vec<NodeId> = vec![arena.root(start)];
    let mut cut_off = false;

    shallowest.insert(start, 0);
    frontier.insert(start);

    loop {
        if ctx.is_cancelled() {
            return PassOutcome::Cancelled;
        }
        let Some(id) = stack.pop() else {
            return PassOutcome::Exhausted { cut_off };
        };
        let (current, depth) = {
            let node = arena.get(id);
            (node.position, node.depth)
        };
        if shallowest.get(&current).is_some_and(|&best| best < depth) {
            continue;
        }
        frontier.remove(&current);
        if ctx.is_blocked(current) {
            continue;
        }

        explored.insert(current);
        ctx.expand(current, &frontier, &explored);

        if current == target {
            return PassOutcome::Found(arena.path_to(id));
        }
        if depth >= limit {
            cut_off = true;
            continue;
        }

        let child_depth = depth + 1;
        for next in ctx.neighbors(current) {
            if shallowest.get(&next).map_or(true, |&known| child_depth < known) {
                shallowest.insert(next, child_depth);
                stack.push(arena.child(id, next));
                frontier.insert(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::testing::{assert_walkable, found_path, open_grid, run_engine};

    #[test]
    fn target_beyond_the_limit_is_not_found() {
        let mut env = open_grid(10, 10, Position::new(0, 0), Position::new(9, 9));
        let (termination, expansions) = run_engine(&mut DepthLimited::new(5), &mut env);
        assert_eq!(termination, Termination::Exhausted);
        assert_eq!(expansions, 59);
    }

    #[test]
    fn target_exactly_at_the_limit_is_found() {
        let mut env = open_grid(10, 10, Position::new(0, 0), Position::new(9, 9));
        let (termination, _) = run_engine(&mut DepthLimited::new(9), &mut env);
        let path = found_path(termination);
        assert_eq!(path.edge_count(), 9);
        assert_walkable(&env, &path);
    }

    #[test]
    fn limit_zero_only_tests_the_start() {
        let mut env = open_grid(5, 5, Position::new(2, 2), Position::new(2, 2));
        let (termination, expansions) = run_engine(&mut DepthLimited::new(0), &mut env);
        assert_eq!(found_path(termination).cells(), &[Position::new(2, 2)]);
        assert_eq!(expansions, 1);

        let mut env = open_grid(5, 5, Position::new(0, 0), Position::new(4, 4));
        let (termination, expansions) = run_engine(&mut DepthLimited::new(0), &mut env);
        assert_eq!(termination, Termination::Exhausted);
        assert_eq!(expansions, 1);
    }

    #[test]
    fn path_never_exceeds_the_limit() {
        let mut env = open_grid(8, 8, Position::new(0, 0), Position::new(3, 7));
        for limit in 7..12 {
            let (termination, _) = run_engine(&mut DepthLimited::new(limit), &mut env);
            let path = found_path(termination);
            assert!(path.edge_count() <= limit);
            assert_walkable(&env, &path);
        }
    }
}
