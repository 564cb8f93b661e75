use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use crate::algorithms::common::{SearchAlgorithm, SearchContext, Termination};
use crate::grid::Position;
use crate::node::{NodeArena, NodeId, PathRecord};

/// One direction of the search: its own tree, queue and visited map.
#[derive(Debug, Default)]
struct Side {
    arena: NodeArena,
    queue: VecDeque<NodeId>,
    visited: FxHashMap<Position, NodeId>,
}

impl Side {
    fn seeded(origin: Position) -> Self {
        let mut side = Side::default();
        let root = side.arena.root(origin);
        side.visited.insert(origin, root);
        side.queue.push_back(root);
        side
    }
}

/// Breadth-first search from both endpoints at once.
///
/// The two sides take turns expanding one whole layer each, forward
/// first. The search ends as soon as either side generates (or pops) a
/// cell the other side has already visited; finishing layer by layer keeps
/// the joined path shortest by move count.
#[derive(Debug, Default)]
pub struct Bidirectional;

impl Bidirectional {
    pub fn new() -> Self {
        Bidirectional
    }
}

impl SearchAlgorithm for Bidirectional {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination {
        let mut forward = Side::seeded(start);
        let mut backward = Side::seeded(target);
        let mut frontier: FxHashSet<Position> = FxHashSet::default();
        let mut explored: FxHashSet<Position> = FxHashSet::default();
        frontier.insert(start);
        frontier.insert(target);

        loop {
            for forward_turn in [true, false] {
                if forward.queue.is_empty() || backward.queue.is_empty() {
                    return Termination::Exhausted;
                }
                let (side, other) = if forward_turn {
                    (&mut forward, &backward)
                } else {
                    (&mut backward, &forward)
                };
                match expand_layer(ctx, side, other, &mut frontier, &mut explored) {
                    LayerResult::Met(meeting) => {
                        return Termination::Found(join(&forward, &backward, meeting));
                    }
                    LayerResult::Cancelled => return Termination::Cancelled,
                    LayerResult::Continue => {}
                }
            }
        }
    }
}

enum LayerResult {
    Met(Position),
    Cancelled,
    Continue,
}

/// Pops exactly the nodes queued before this layer began.
fn expand_layer(
    ctx: &mut SearchContext<'_>,
    side: &mut Side,
    other: &Side,
    frontier: &mut FxHashSet<Position>,
    explored: &mut FxHashSet<Position>,
) -> LayerResult {
    for _ in 0..side.queue.len() {
        if ctx.is_cancelled() {
            return LayerResult::Cancelled;
        }
        let Some(id) = side.queue.pop_front() else {
            break;
        };
        let current = side.arena.position(id);
        frontier.remove(&current);
        if ctx.is_blocked(current) {
            continue;
        }

        explored.insert(current);
        ctx.expand(current, frontier, explored);

        if other.visited.contains_key(&current) {
            return LayerResult::Met(current);
        }

        for next in ctx.neighbors(current) {
            if let Entry::Vacant(slot) = side.visited.entry(next) {
                let child = side.arena.child(id, next);
                slot.insert(child);
                side.queue.push_back(child);
                frontier.insert(next);
                if other.visited.contains_key(&next) {
                    return LayerResult::Met(next);
                }
            }
        }
    }
    LayerResult::Continue
}

/// Start-to-meeting from the forward tree, then meeting-to-target from the
/// backward one, with the meeting cell once.
fn join(forward: &Side, backward: &Side, meeting: Position) -> PathRecord {
    let mut path = forward.arena.path_to(forward.visited[&meeting]);
    path.extend(backward.arena.ancestry(backward.visited[&meeting]).skip(1));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::testing::{assert_walkable, found_path, open_grid, run_engine};

    #[test]
    fn empty_grid_path_matches_chebyshev_distance() {
        let start = Position::new(0, 0);
        let target = Position::new(3, 4);
        let mut env = open_grid(10, 10, start, target);

        let (termination, _) = run_engine(&mut Bidirectional::new(), &mut env);
        let path = found_path(termination);
        assert_eq!(path.edge_count(), start.chebyshev_distance(&target));
        assert_eq!(path.start(), Some(start));
        assert_eq!(path.target(), Some(target));
        assert_walkable(&env, &path);
    }

    #[test]
    fn joined_path_is_shortest_around_a_wall() {
        let mut env = open_grid(5, 5, Position::new(0, 0), Position::new(0, 4));
        for row in 0..4 {
            env.add_obstacle(Position::new(row, 2)).unwrap();
        }

        let (termination, expansions) = run_engine(&mut Bidirectional::new(), &mut env);
        let path = found_path(termination);
        assert_eq!(path.edge_count(), 10);
        assert!(path.contains(&Position::new(4, 2)));
        assert_walkable(&env, &path);
        assert_eq!(expansions, 20);
    }

    #[test]
    fn sealed_target_fails_fast() {
        // The backward side has nowhere to go after its first layer.
        let mut env = open_grid(5, 5, Position::new(0, 0), Position::new(4, 4));
        env.add_obstacle(Position::new(3, 4)).unwrap();
        env.add_obstacle(Position::new(4, 3)).unwrap();

        let (termination, expansions) = run_engine(&mut Bidirectional::new(), &mut env);
        assert_eq!(termination, Termination::Exhausted);
        assert_eq!(expansions, 2);
    }

    #[test]
    fn identical_endpoints_meet_immediately() {
        let mut env = open_grid(5, 5, Position::new(2, 2), Position::new(2, 2));
        let (termination, expansions) = run_engine(&mut Bidirectional::new(), &mut env);
        assert_eq!(found_path(termination).cells(), &[Position::new(2, 2)]);
        assert_eq!(expansions, 1);
    }

    #[test]
    fn adjacent_endpoints_meet_on_discovery() {
        let mut env = open_grid(5, 5, Position::new(2, 2), Position::new(2, 3));
        let (termination, expansions) = run_engine(&mut Bidirectional::new(), &mut env);
        assert_eq!(
            found_path(termination).cells(),
            &[Position::new(2, 2), Position::new(2, 3)]
        );
        assert_eq!(expansions, 1);
    }
}
