use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

use crate::error::ConfigError;
use crate::grid::{GridEnvironment, Position};

pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.03;

/// Which cells a dynamic obstacle may not land on, besides existing
/// obstacles and the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpawnExclusion {
    /// Also keep clear of everything in the frontier or explored set.
    #[default]
    SearchState,
    /// Only the endpoints are protected.
    EndpointsOnly,
}

impl FromStr for SpawnExclusion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "search-state" | "search_state" => Ok(SpawnExclusion::SearchState),
            "endpoints" | "endpoints-only" | "endpoints_only" => Ok(SpawnExclusion::EndpointsOnly),
            _ => Err(ConfigError::UnknownSpawnExclusion(s.to_string())),
        }
    }
}

/// Per-expansion chance of a new obstacle appearing, and where it may go.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstaclePolicy {
    pub probability: f64,
    pub exclusion: SpawnExclusion,
}

impl ObstaclePolicy {
    pub fn new(probability: f64, exclusion: SpawnExclusion) -> Result<Self, ConfigError> {
        let policy = ObstaclePolicy {
            probability,
            exclusion,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// A policy that never spawns anything.
    pub fn disabled() -> Self {
        ObstaclePolicy {
            probability: 0.0,
            exclusion: SpawnExclusion::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.probability) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability(self.probability))
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.probability > 0.0
    }
}

impl Default for ObstaclePolicy {
    fn default() -> Self {
        ObstaclePolicy {
            probability: DEFAULT_SPAWN_PROBABILITY,
            exclusion: SpawnExclusion::default(),
        }
    }
}

impl GridEnvironment {
    /// Rolls the policy once and, on success, turns a uniformly chosen free
    /// cell into an obstacle. Start and target are never chosen.
    pub fn spawn_dynamic_obstacle<R: Rng>(
        &mut self,
        policy: &ObstaclePolicy,
        rng: &mut R,
        frontier: &FxHashSet<Position>,
        explored: &FxHashSet<Position>,
    ) -> Option<Position> {
        if !policy.is_enabled() || !rng.gen_bool(policy.probability) {
            return None;
        }

        let cols = self.cols();
        let candidates: Vec<Position> = (0..self.rows())
            .flat_map(|row| (0..cols).map(move |col| Position::new(row, col)))
            .filter(|pos| !self.is_obstacle(*pos) && !self.is_endpoint(*pos))
            .filter(|pos| match policy.exclusion {
                SpawnExclusion::SearchState => !frontier.contains(pos) && !explored.contains(pos),
                SpawnExclusion::EndpointsOnly => true,
            })
            .collect();

        let spawned = *candidates.choose(rng)?;
        self.obstacles.insert(spawned);
        self.dynamic.insert(spawned);
        debug!(position = %spawned, candidates = candidates.len(), "dynamic obstacle spawned");
        Some(spawned)
    }
}
