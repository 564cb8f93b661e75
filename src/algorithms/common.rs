use rand::rngs::StdRng;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::algorithms::Algorithm;
use crate::controller::CancellationToken;
use crate::events::{StepEvent, StepSink};
use crate::grid::{GridEnvironment, Position};
use crate::node::PathRecord;
use crate::obstacles::ObstaclePolicy;

/// How a single engine run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    Found(PathRecord),
    Exhausted,
    Cancelled,
}

/// A step-driven uninformed search over a [`GridEnvironment`].
///
/// Implementations pull neighbors and report every expansion through the
/// [`SearchContext`], and poll [`SearchContext::is_cancelled`] before each
/// expansion.
pub trait SearchAlgorithm {
    fn search(
        &mut self,
        ctx: &mut SearchContext<'_>,
        start: Position,
        target: Position,
    ) -> Termination;
}

/// Everything an engine touches while it runs: the grid, the obstacle
/// policy and its RNG, the step sink and the cancellation flag.
pub struct SearchContext<'a> {
    algorithm: Algorithm,
    env: &'a mut GridEnvironment,
    policy: ObstaclePolicy,
    rng: StdRng,
    sink: &'a mut dyn StepSink,
    cancel: &'a CancellationToken,
    expansions: usize,
    spawned: Vec<Position>,
    depth_limit: Option<usize>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        algorithm: Algorithm,
        env: &'a mut GridEnvironment,
        policy: ObstaclePolicy,
        rng: StdRng,
        sink: &'a mut dyn StepSink,
        cancel: &'a CancellationToken,
    ) -> Self {
        SearchContext {
            algorithm,
            env,
            policy,
            rng,
            sink,
            cancel,
            expansions: 0,
            spawned: Vec::new(),
            depth_limit: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        self.env.get_neighbors(pos)
    }

    /// True once a queued cell has been turned into an obstacle.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.env.is_obstacle(pos)
    }

    /// Records the expansion of `cell`, which must already be in `explored`.
    ///
    /// The obstacle policy gets its one roll for this step, then the sink
    /// sees the resulting state. Returns the obstacle spawned, if any.
    pub fn expand(
        &mut self,
        cell: Position,
        frontier: &FxHashSet<Position>,
        explored: &FxHashSet<Position>,
    ) -> Option<Position> {
        self.expansions += 1;

        let spawned = self
            .env
            .spawn_dynamic_obstacle(&self.policy, &mut self.rng, frontier, explored);
        if let Some(obstacle) = spawned {
            self.spawned.push(obstacle);
        }

        trace!(
            algorithm = %self.algorithm,
            expansion = self.expansions,
            cell = %cell,
            frontier = frontier.len(),
            explored = explored.len(),
            "expanded"
        );

        let event = StepEvent {
            algorithm: self.algorithm,
            expansion: self.expansions,
            cell,
            frontier,
            explored,
            spawned_obstacle: spawned,
            depth_limit: self.depth_limit,
            grid: &*self.env,
        };
        self.sink.on_step(&event);
        spawned
    }

    /// Marks the start of a bounded pass (DLS, or one IDDFS iteration).
    pub fn begin_pass(&mut self, depth_limit: usize) {
        debug!(algorithm = %self.algorithm, depth_limit, "depth-limited pass");
        self.depth_limit = Some(depth_limit);
        self.sink.on_pass_start(depth_limit);
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Expansion count and spawned obstacles, releasing the borrows.
    pub fn finish(self) -> (usize, Vec<Position>) {
        (self.expansions, self.spawned)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::SeedableRng;

    use super::*;
    use crate::events::NullSink;

    pub fn open_grid(rows: usize, cols: usize, start: Position, target: Position) -> GridEnvironment {
        let mut env = GridEnvironment::new(rows, cols).unwrap();
        env.set_start(start).unwrap();
        env.set_target(target).unwrap();
        env
    }

    /// Runs `engine` without dynamic obstacles; returns how it ended and
    /// the number of expansions.
    pub fn run_engine(
        engine: &mut dyn SearchAlgorithm,
        env: &mut GridEnvironment,
    ) -> (Termination, usize) {
        let start = env.start().unwrap();
        let target = env.target().unwrap();
        let cancel = CancellationToken::new();
        let mut sink = NullSink;
        let mut ctx = SearchContext::new(
            Algorithm::Bfs,
            env,
            ObstaclePolicy::disabled(),
            StdRng::seed_from_u64(0),
            &mut sink,
            &cancel,
        );
        let termination = engine.search(&mut ctx, start, target);
        (termination, ctx.expansions())
    }

    pub fn found_path(termination: Termination) -> PathRecord {
        match termination {
            Termination::Found(path) => path,
            other => panic!("expected a path, got {:?}", other),
        }
    }

    /// Every consecutive pair must be a legal move on `env`.
    pub fn assert_walkable(env: &GridEnvironment, path: &PathRecord) {
        for pair in path.cells().windows(2) {
            assert!(
                env.get_neighbors(pair[0]).contains(&pair[1]),
                "{} -> {} is not a legal move",
                pair[0],
                pair[1]
            );
        }
    }
}
