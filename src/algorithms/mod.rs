pub mod bfs;
pub mod bidirectional;
pub mod common;
pub mod dfs;
pub mod dls;
pub mod iddfs;
pub mod ucs;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::controller::SearchSettings;
use crate::error::ConfigError;

pub use bfs::BreadthFirst;
pub use bidirectional::Bidirectional;
pub use common::{SearchAlgorithm, SearchContext, Termination};
pub use dfs::DepthFirst;
pub use dls::DepthLimited;
pub use iddfs::IterativeDeepening;
pub use ucs::UniformCost;

/// The six uninformed strategies, chosen once per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bfs,
    Dfs,
    Ucs,
    Dls,
    Iddfs,
    Bidirectional,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::Dls,
        Algorithm::Iddfs,
        Algorithm::Bidirectional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Ucs => "ucs",
            Algorithm::Dls => "dls",
            Algorithm::Iddfs => "iddfs",
            Algorithm::Bidirectional => "bidirectional",
        }
    }

    /// Instantiates the engine with the bounds from `settings`.
    pub fn build(&self, settings: &SearchSettings) -> Box<dyn SearchAlgorithm> {
        match self {
            Algorithm::Bfs => Box::new(BreadthFirst::new()),
            Algorithm::Dfs => Box::new(DepthFirst::new()),
            Algorithm::Ucs => Box::new(UniformCost::new()),
            Algorithm::Dls => Box::new(DepthLimited::new(settings.depth_limit)),
            Algorithm::Iddfs => Box::new(IterativeDeepening::new(settings.max_depth)),
            Algorithm::Bidirectional => Box::new(Bidirectional::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::Ucs => "UCS",
            Algorithm::Dls => "DLS",
            Algorithm::Iddfs => "IDDFS",
            Algorithm::Bidirectional => "Bidirectional",
        };
        f.write_str(label)
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("BFS".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert_eq!("iddfs".parse::<Algorithm>().unwrap(), Algorithm::Iddfs);
        assert_eq!(
            "Bidirectional".parse::<Algorithm>().unwrap(),
            Algorithm::Bidirectional
        );
        assert_eq!(
            "a_star".parse::<Algorithm>().unwrap_err(),
            ConfigError::UnknownAlgorithm("a_star".to_string())
        );
    }

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn display_uses_short_labels() {
        assert_eq!(Algorithm::Ucs.to_string(), "UCS");
        assert_eq!(Algorithm::Bidirectional.to_string(), "Bidirectional");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Algorithm::Iddfs).unwrap(),
            r#""iddfs""#
        );
    }
}
