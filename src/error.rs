use thiserror::Error;

use crate::grid::Position;

/// Errors raised while configuring a grid or a search.
///
/// Nothing in here is produced once a search is running: search outcomes
/// (not found, cancelled, missing endpoints) are ordinary values of
/// [`crate::controller::Outcome`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("dynamic obstacle probability must be within 0.0..=1.0, got {0}")]
    InvalidProbability(f64),

    #[error("position {position} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },

    #[error("unknown algorithm '{0}' (expected bfs, dfs, ucs, dls, iddfs, bidirectional or all)")]
    UnknownAlgorithm(String),

    #[error("unknown neighborhood '{0}' (expected eight or six)")]
    UnknownNeighborhood(String),

    #[error("unknown spawn exclusion '{0}' (expected search-state or endpoints)")]
    UnknownSpawnExclusion(String),

    #[error("cannot parse '{0}' as a position, expected 'row,col'")]
    InvalidPosition(String),
}
