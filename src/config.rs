use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithms::Algorithm;
use crate::controller::{SearchSettings, DEFAULT_DEPTH_LIMIT, DEFAULT_MAX_DEPTH};
use crate::error::ConfigError;
use crate::grid::{GridEnvironment, Neighborhood, Position};
use crate::obstacles::{ObstaclePolicy, SpawnExclusion, DEFAULT_SPAWN_PROBABILITY};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Uninformed search on a grid with appearing obstacles", long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    #[arg(long, default_value_t = 20)]
    pub cols: usize,

    #[arg(long, default_value_t = 50)]
    pub num_walls: usize,

    /// Start cell as `row,col`; random in the top-left quadrant if omitted.
    #[arg(long)]
    pub start: Option<Position>,

    /// Target cell as `row,col`; random in the bottom-right quadrant if omitted.
    #[arg(long)]
    pub target: Option<Position>,

    /// bfs, dfs, ucs, dls, iddfs, bidirectional, or all to compare them.
    #[arg(long, default_value = "bfs")]
    pub algorithm: String,

    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Chance of an obstacle appearing after each expansion.
    #[arg(long, default_value_t = DEFAULT_SPAWN_PROBABILITY)]
    pub obstacle_probability: f64,

    #[arg(long, default_value = "search-state")]
    pub spawn_exclusion: SpawnExclusion,

    #[arg(long, default_value = "eight")]
    pub neighborhood: Neighborhood,

    /// Seeds both the wall layout and the obstacle draws.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Print statistics as JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Config {
    pub fn is_comparison(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case("all")
    }

    /// The algorithms to run, in run order.
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        if self.is_comparison() {
            Ok(Algorithm::ALL.to_vec())
        } else {
            Ok(vec![self.algorithm.parse()?])
        }
    }

    pub fn search_settings(&self) -> Result<SearchSettings, ConfigError> {
        let policy = ObstaclePolicy::new(self.obstacle_probability, self.spawn_exclusion)?;
        let settings = SearchSettings::default()
            .with_depth_limit(self.depth_limit)
            .with_max_depth(self.max_depth)
            .with_obstacle_policy(policy);
        Ok(match self.seed {
            Some(seed) => settings.with_seed(seed),
            None => settings,
        })
    }

    /// Random wall layout, with `--start` and `--target` applied on top.
    pub fn build_environment(&self) -> Result<GridEnvironment, ConfigError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut env = GridEnvironment::random(self.rows, self.cols, self.num_walls, &mut rng)?
            .with_neighborhood(self.neighborhood);
        if let Some(start) = self.start {
            env.set_start(start)?;
        }
        if let Some(target) = self.target {
            env.set_target(target)?;
        }
        Ok(env)
    }
}
