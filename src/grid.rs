use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Number of king moves between two cells.
    pub fn chebyshev_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    pub fn is_diagonal_to(&self, other: &Position) -> bool {
        self.row != other.row && self.col != other.col
    }

    fn offset(&self, dr: isize, dc: isize) -> (isize, isize) {
        (self.row as isize + dr, self.col as isize + dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = ConfigError;

    /// Parses `row,col`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidPosition(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(Position { row, col })
    }
}

/// Which moves a cell offers, always enumerated clockwise starting Up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Neighborhood {
    /// All eight king moves.
    #[default]
    Eight,
    /// Up, Up-Right, Right, Down, Down-Left, Left.
    Six,
}

const EIGHT_WAY: [(isize, isize); 8] = [
    (-1, 0),  // Up
    (-1, 1),  // Up-Right
    (0, 1),   // Right
    (1, 1),   // Down-Right
    (1, 0),   // Down
    (1, -1),  // Down-Left
    (0, -1),  // Left
    (-1, -1), // Up-Left
];

const SIX_WAY: [(isize, isize); 6] = [(-1, 0), (-1, 1), (0, 1), (1, 0), (1, -1), (0, -1)];

impl Neighborhood {
    pub fn directions(&self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::Eight => &EIGHT_WAY,
            Neighborhood::Six => &SIX_WAY,
        }
    }
}

impl FromStr for Neighborhood {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eight" | "8" => Ok(Neighborhood::Eight),
            "six" | "6" => Ok(Neighborhood::Six),
            _ => Err(ConfigError::UnknownNeighborhood(s.to_string())),
        }
    }
}

/// The searchable world: fixed dimensions, endpoints and the obstacle set.
///
/// Start and target are never obstacles. Setting either one clears an
/// obstacle on that cell, and adding an obstacle on either is ignored.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    rows: usize,
    cols: usize,
    start: Option<Position>,
    target: Option<Position>,
    pub(crate) obstacles: FxHashSet<Position>,
    /// Obstacles that appeared during a search, a subset of `obstacles`.
    pub(crate) dynamic: FxHashSet<Position>,
    neighborhood: Neighborhood,
}

impl GridEnvironment {
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidDimensions { rows, cols });
        }
        Ok(GridEnvironment {
            rows,
            cols,
            start: None,
            target: None,
            obstacles: FxHashSet::default(),
            dynamic: FxHashSet::default(),
            neighborhood: Neighborhood::default(),
        })
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Random layout: start in the top-left quadrant, target in the
    /// bottom-right one, and up to `num_walls` walls that never cover either.
    pub fn random<R: Rng>(
        rows: usize,
        cols: usize,
        num_walls: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let mut env = GridEnvironment::new(rows, cols)?;

        let start = Position::new(
            rng.gen_range(0..(rows / 2).max(1)),
            rng.gen_range(0..(cols / 2).max(1)),
        );
        let target = Position::new(rng.gen_range(rows / 2..rows), rng.gen_range(cols / 2..cols));
        env.set_start(start)?;
        env.set_target(target)?;

        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < num_walls && attempts < num_walls * 3 {
            let pos = Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
            if env.add_obstacle(pos)? {
                walls_placed += 1;
            }
            attempts += 1;
        }

        Ok(env)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn target(&self) -> Option<Position> {
        self.target
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    pub fn is_valid(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn is_dynamic_obstacle(&self, pos: Position) -> bool {
        self.dynamic.contains(&pos)
    }

    pub fn is_endpoint(&self, pos: Position) -> bool {
        self.start == Some(pos) || self.target == Some(pos)
    }

    pub fn set_start(&mut self, pos: Position) -> Result<(), ConfigError> {
        self.check_bounds(pos)?;
        self.clear_cell(pos);
        self.start = Some(pos);
        Ok(())
    }

    pub fn set_target(&mut self, pos: Position) -> Result<(), ConfigError> {
        self.check_bounds(pos)?;
        self.clear_cell(pos);
        self.target = Some(pos);
        Ok(())
    }

    /// Returns whether the obstacle was newly placed. Endpoints are skipped.
    pub fn add_obstacle(&mut self, pos: Position) -> Result<bool, ConfigError> {
        self.check_bounds(pos)?;
        if self.is_endpoint(pos) {
            return Ok(false);
        }
        Ok(self.obstacles.insert(pos))
    }

    pub fn remove_obstacle(&mut self, pos: Position) -> bool {
        self.dynamic.remove(&pos);
        self.obstacles.remove(&pos)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn dynamic_obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.dynamic.iter().copied()
    }

    /// Drops every obstacle, static or dynamic. Endpoints are kept.
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
        self.dynamic.clear();
    }

    /// Removes only the obstacles spawned during earlier searches.
    pub fn clear_dynamic_obstacles(&mut self) {
        for pos in self.dynamic.drain() {
            self.obstacles.remove(&pos);
        }
    }

    /// Passable cells adjacent to `pos`, clockwise from Up.
    ///
    /// A diagonal move is only offered when both orthogonal cells it cuts
    /// across are free, so the search never squeezes between two walls that
    /// touch at a corner.
    pub fn get_neighbors(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);

        for &(dr, dc) in self.neighborhood.directions() {
            let (nr, nc) = pos.offset(dr, dc);
            if !self.is_valid(nr, nc) {
                continue;
            }
            let next = Position::new(nr as usize, nc as usize);
            if self.is_obstacle(next) {
                continue;
            }
            if dr != 0 && dc != 0 {
                let vertical = Position::new(nr as usize, pos.col);
                let horizontal = Position::new(pos.row, nc as usize);
                if self.is_obstacle(vertical) || self.is_obstacle(horizontal) {
                    continue;
                }
            }
            neighbors.push(next);
        }
        neighbors
    }

    fn clear_cell(&mut self, pos: Position) {
        self.obstacles.remove(&pos);
        self.dynamic.remove(&pos);
    }

    fn check_bounds(&self, pos: Position) -> Result<(), ConfigError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(ConfigError::OutOfBounds {
                position: pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}
