use rustc_hash::FxHashSet;
use std::fmt::Write;
use std::thread;
use std::time::Duration;

use crate::controller::SearchResult;
use crate::events::{StepEvent, StepSink};
use crate::grid::{GridEnvironment, Position};
use crate::node::PathRecord;

pub const LEGEND: &str =
    "Legend: S=Start, T=Target, #=Wall, X=Dynamic obstacle, *=Path, o=Frontier, +=Explored, .=Empty";

/// Draws `env` as text, one row per line, with row and column indices.
///
/// Endpoints win over everything, then obstacles, then the path, then the
/// frontier, then the explored set.
pub fn render_grid(
    env: &GridEnvironment,
    path: Option<&PathRecord>,
    frontier: &FxHashSet<Position>,
    explored: &FxHashSet<Position>,
) -> String {
    let on_path: FxHashSet<Position> = path
        .map(|path| path.cells().iter().copied().collect())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str("   ");
    for col in 0..env.cols() {
        let _ = write!(out, "{:2}", col % 10);
    }
    out.push('\n');

    for row in 0..env.rows() {
        let _ = write!(out, "{:2} ", row);
        for col in 0..env.cols() {
            let pos = Position::new(row, col);
            let symbol = if Some(pos) == env.start() {
                'S'
            } else if Some(pos) == env.target() {
                'T'
            } else if env.is_dynamic_obstacle(pos) {
                'X'
            } else if env.is_obstacle(pos) {
                '#'
            } else if on_path.contains(&pos) {
                '*'
            } else if frontier.contains(&pos) {
                'o'
            } else if explored.contains(&pos) {
                '+'
            } else {
                '.'
            };
            out.push(symbol);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Redraws the whole grid after every expansion, then sleeps for `delay`.
#[derive(Debug, Clone)]
pub struct TerminalSink {
    delay: Duration,
    pass: Option<usize>,
}

impl TerminalSink {
    pub fn new(delay: Duration) -> Self {
        TerminalSink { delay, pass: None }
    }
}

impl StepSink for TerminalSink {
    fn on_step(&mut self, event: &StepEvent<'_>) {
        clear_screen();
        println!("=== GRID SEARCH ===");
        print!(
            "Algorithm: {} | Expansion: {} | Cell: {} | Frontier: {} | Explored: {}",
            event.algorithm,
            event.expansion,
            event.cell,
            event.frontier.len(),
            event.explored.len()
        );
        if let Some(limit) = event.depth_limit {
            print!(" | Depth limit: {}", limit);
        }
        println!();
        if let Some(obstacle) = event.spawned_obstacle {
            println!("New obstacle at {}", obstacle);
        }
        println!("{}", LEGEND);
        print!(
            "{}",
            render_grid(event.grid, None, event.frontier, event.explored)
        );
        thread::sleep(self.delay);
    }

    fn on_pass_start(&mut self, depth_limit: usize) {
        self.pass = Some(depth_limit);
    }

    fn on_finish(&mut self, result: &SearchResult) {
        match self.pass {
            Some(limit) => println!(
                "{}: {} after {} expansions (last depth limit {})",
                result.algorithm, result.outcome, result.nodes_explored, limit
            ),
            None => println!(
                "{}: {} after {} expansions",
                result.algorithm, result.outcome, result.nodes_explored
            ),
        }
        self.pass = None;
    }
}
