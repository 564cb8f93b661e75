use tracing::debug;

use crate::algorithms::common::{SearchAlgorithm, SearchContext, Termination};
use crate::algorithms::dls::{depth_limited_pass, PassOutcome};
use crate::grid::Position;

/// Iterative deepening: depth-limited passes with limits 0, 1, .. up to
/// `max_depth`, each starting from scratch.
///
/// Expansions accumulate across passes. A pass that never hit its limit
/// has seen everything reachable, so deeper passes are skipped.
#[derive(Debug)]
pub struct IterativeDeepening {
    max_depth: usize,
}

impl IterativeDeepening {
    pub fn new(max_depth: usize) -> Self {
        IterativeDeepening { max_depth }
    }
}

impl SearchAlgorithm for IterativeDeepening {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination {
        for limit in 0..=self.max_depth {
            ctx.begin_pass(limit);
            match depth_limited_pass(ctx, start, target, limit) {
                PassOutcome::Found(path) => return Termination::Found(path),
                PassOutcome::Cancelled => return Termination::Cancelled,
                PassOutcome::Exhausted { cut_off: true } => {}
                PassOutcome::Exhausted { cut_off: false } => {
                    debug!(limit, "reachable region exhausted below the limit");
                    return Termination::Exhausted;
                }
            }
        }
        Termination::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::bfs::BreadthFirst;
    use crate::algorithms::common::testing::{assert_walkable, found_path, open_grid, run_engine};

    #[test]
    fn finds_a_shortest_path_by_move_count() {
        let mut env = open_grid(5, 5, Position::new(0, 0), Position::new(0, 4));
        for row in 0..4 {
            env.add_obstacle(Position::new(row, 2)).unwrap();
        }

        let (termination, _) = run_engine(&mut IterativeDeepening::new(20), &mut env);
        let deepening = found_path(termination);
        let (termination, _) = run_engine(&mut BreadthFirst::new(), &mut env);
        let breadth = found_path(termination);

        assert_eq!(deepening.edge_count(), breadth.edge_count());
        assert_walkable(&env, &deepening);
    }

    #[test]
    fn expansions_accumulate_over_passes() {
        let mut env = open_grid(10, 10, Position::new(0, 0), Position::new(9, 9));
        let (termination, expansions) = run_engine(&mut IterativeDeepening::new(20), &mut env);
        assert_eq!(found_path(termination).edge_count(), 9);
        assert_eq!(expansions, 816);
    }

    #[test]
    fn gives_up_at_max_depth() {
        let mut env = open_grid(10, 10, Position::new(0, 0), Position::new(9, 9));
        let (termination, expansions) = run_engine(&mut IterativeDeepening::new(5), &mut env);
        assert_eq!(termination, Termination::Exhausted);
        assert_eq!(expansions, 125);
    }

    #[test]
    fn stops_early_once_nothing_is_cut_off() {
        // Three reachable cells in a row: passes 0..=3 expand 1 + 2 + 3 + 3.
        let mut env = open_grid(3, 3, Position::new(0, 0), Position::new(2, 2));
        for col in 0..3 {
            env.add_obstacle(Position::new(1, col)).unwrap();
        }
        let (termination, expansions) = run_engine(&mut IterativeDeepening::new(20), &mut env);
        assert_eq!(termination, Termination::Exhausted);
        assert_eq!(expansions, 9);
    }
}
