use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::algorithms::{Algorithm, SearchContext, Termination};
use crate::error::ConfigError;
use crate::events::StepSink;
use crate::grid::{GridEnvironment, Position};
use crate::node::PathRecord;
use crate::obstacles::ObstaclePolicy;

pub const DEFAULT_DEPTH_LIMIT: usize = 8;
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Cooperative stop flag, polled once per expansion.
///
/// Clones share the same flag, so a clone can be handed to a step sink, a
/// signal handler or another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Tunables shared by every run of a [`SearchController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchSettings {
    /// Bound for DLS.
    pub depth_limit: usize,
    /// Largest bound IDDFS tries before giving up.
    pub max_depth: usize,
    pub obstacle_policy: ObstaclePolicy,
    /// Seeds the per-run RNG; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
            obstacle_policy: ObstaclePolicy::default(),
            seed: None,
        }
    }
}

impl SearchSettings {
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_obstacle_policy(mut self, policy: ObstaclePolicy) -> Self {
        self.obstacle_policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn without_dynamic_obstacles(self) -> Self {
        self.with_obstacle_policy(ObstaclePolicy::disabled())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.obstacle_policy.validate()
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Terminal state of one search.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Found(PathRecord),
    NotFound,
    Cancelled,
    MissingEndpoint,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Found(_) => "found",
            Outcome::NotFound => "not found",
            Outcome::Cancelled => "cancelled",
            Outcome::MissingEndpoint => "missing endpoint",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Termination> for Outcome {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Found(path) => Outcome::Found(path),
            Termination::Exhausted => Outcome::NotFound,
            Termination::Cancelled => Outcome::Cancelled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub algorithm: Algorithm,
    pub outcome: Outcome,
    pub nodes_explored: usize,
    pub elapsed: Duration,
    /// Obstacles spawned during this run, in spawn order. They stay in the
    /// grid afterwards.
    pub dynamic_obstacles: Vec<Position>,
}

impl SearchResult {
    pub fn path(&self) -> Option<&PathRecord> {
        match &self.outcome {
            Outcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, Outcome::Found(_))
    }
}

/// Runs one algorithm at a time to completion or cancellation.
#[derive(Debug, Clone)]
pub struct SearchController {
    settings: SearchSettings,
    cancel: CancellationToken,
}

impl SearchController {
    pub fn new(settings: SearchSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(SearchController {
            settings,
            cancel: CancellationToken::new(),
        })
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Handle for stopping the current run. Starting a run clears any
    /// earlier request.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Searches `env` from its start to its target with `algorithm`.
    ///
    /// The environment stays mutably borrowed for the whole run: the
    /// obstacle policy writes to it, and nobody else can.
    pub fn run(
        &self,
        env: &mut GridEnvironment,
        algorithm: Algorithm,
        sink: &mut dyn StepSink,
    ) -> SearchResult {
        self.cancel.reset();
        let started = Instant::now();

        let (Some(start), Some(target)) = (env.start(), env.target()) else {
            warn!(%algorithm, "search requested without both endpoints set");
            let result = SearchResult {
                algorithm,
                outcome: Outcome::MissingEndpoint,
                nodes_explored: 0,
                elapsed: started.elapsed(),
                dynamic_obstacles: Vec::new(),
            };
            sink.on_finish(&result);
            return result;
        };

        info!(%algorithm, %start, %target, "search started");

        let mut engine = algorithm.build(&self.settings);
        let mut ctx = SearchContext::new(
            algorithm,
            env,
            self.settings.obstacle_policy,
            self.settings.rng(),
            sink,
            &self.cancel,
        );
        let termination = engine.search(&mut ctx, start, target);
        let (nodes_explored, dynamic_obstacles) = ctx.finish();

        let result = SearchResult {
            algorithm,
            outcome: termination.into(),
            nodes_explored,
            elapsed: started.elapsed(),
            dynamic_obstacles,
        };
        info!(
            %algorithm,
            outcome = %result.outcome,
            nodes_explored,
            path_length = result.path().map(PathRecord::edge_count),
            elapsed = ?result.elapsed,
            "search finished"
        );
        sink.on_finish(&result);
        result
    }
}
