//! Uninformed search (BFS, DFS, UCS, DLS, IDDFS, bidirectional BFS) on a
//! grid whose obstacles can appear while the search runs.
//!
//! Build a [`GridEnvironment`], hand it to a [`SearchController`] with an
//! [`Algorithm`] and a [`StepSink`], and get back a [`SearchResult`].

pub mod algorithms;
pub mod comparison;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod grid;
pub mod node;
pub mod obstacles;
pub mod statistics;

pub use algorithms::Algorithm;
pub use controller::{CancellationToken, Outcome, SearchController, SearchResult, SearchSettings};
pub use error::ConfigError;
pub use events::{ChannelSink, NullSink, StepEvent, StepSink};
pub use grid::{GridEnvironment, Neighborhood, Position};
pub use node::PathRecord;
pub use obstacles::{ObstaclePolicy, SpawnExclusion};
