use pathfinding::prelude::bfs;
use serde::Serialize;
use std::fmt;

use crate::algorithms::Algorithm;
use crate::controller::SearchResult;
use crate::grid::{GridEnvironment, Position};
use crate::node::PathRecord;

/// Report for one finished search, in the shape the CLI prints and
/// serializes.
#[derive(Debug, Clone, Serialize)]
pub struct SearchStatistics {
    pub algorithm: Algorithm,
    pub outcome: &'static str,
    pub nodes_explored: usize,
    /// Moves on the returned path.
    pub path_length: Option<usize>,
    pub path_cost: Option<f64>,
    /// Fewest moves from start to target on the grid as it was before the
    /// search started.
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: f64,
    pub elapsed_ms: f64,
    pub dynamic_obstacles: usize,
    pub path: Option<PathRecord>,
}

impl SearchStatistics {
    pub fn from_result(result: &SearchResult, optimal_path_length: Option<usize>) -> Self {
        let path = result.path();
        let mut stats = SearchStatistics {
            algorithm: result.algorithm,
            outcome: result.outcome.label(),
            nodes_explored: result.nodes_explored,
            path_length: path.map(PathRecord::edge_count),
            path_cost: path.map(PathRecord::cost),
            optimal_path_length,
            route_efficiency: 0.0,
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
            dynamic_obstacles: result.dynamic_obstacles.len(),
            path: path.cloned(),
        };
        stats.calculate_efficiency();
        stats
    }

    /// Ratio of moves taken to the reference optimum; 0 when either is
    /// unknown.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match (self.path_length, self.optimal_path_length) {
            (Some(taken), Some(optimal)) if optimal > 0 => taken as f64 / optimal as f64,
            (Some(0), Some(0)) => 1.0,
            _ => 0.0,
        };
    }

    pub fn extra_moves(&self) -> Option<usize> {
        Some(self.path_length?.saturating_sub(self.optimal_path_length?))
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Outcome: {}", self.outcome)?;
        writeln!(f, "Nodes Explored: {}", self.nodes_explored)?;
        match (self.path_length, self.path_cost) {
            (Some(length), Some(cost)) => {
                writeln!(f, "Path Length: {} moves", length)?;
                writeln!(f, "Path Cost: {:.3}", cost)?;
            }
            _ => writeln!(f, "Path Length: -")?,
        }
        match self.optimal_path_length {
            Some(optimal) => writeln!(f, "Optimal Path Length: {}", optimal)?,
            None => writeln!(f, "Optimal Path Length: unreachable")?,
        }
        writeln!(f, "Dynamic Obstacles: {}", self.dynamic_obstacles)?;
        writeln!(f, "Elapsed: {:.3} ms", self.elapsed_ms)?;
        writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;

        if let Some(extra) = self.extra_moves() {
            if extra > 0 {
                writeln!(f, "Extra moves over the optimum: {}", extra)?;
            }
        }
        Ok(())
    }
}

/// Fewest moves between the endpoints of `env` as it stands, or `None` if
/// an endpoint is unset or the target is walled off.
pub fn reference_path_length(env: &GridEnvironment) -> Option<usize> {
    let start = env.start()?;
    let target = env.target()?;
    bfs(
        &start,
        |p: &Position| env.get_neighbors(*p),
        |p: &Position| *p == target,
    )
    .map(|path| path.len().saturating_sub(1))
}
