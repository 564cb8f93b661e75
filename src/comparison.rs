use serde::Serialize;
use tracing::info;

use crate::algorithms::Algorithm;
use crate::controller::{SearchController, SearchSettings};
use crate::error::ConfigError;
use crate::events::NullSink;
use crate::grid::GridEnvironment;
use crate::statistics::{reference_path_length, SearchStatistics};

/// Every algorithm run once against copies of the same grid.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Seed shared by every run, so each sees the same obstacle draws.
    pub seed: u64,
    pub optimal_path_length: Option<usize>,
    pub results: Vec<SearchStatistics>,
}

/// Runs all six algorithms on clones of `env`.
///
/// Without a seed in `settings`, one is drawn here and reused for every
/// run.
pub fn run_all_algorithms(
    env: &GridEnvironment,
    settings: SearchSettings,
) -> Result<ComparisonReport, ConfigError> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    let controller = SearchController::new(SearchSettings {
        seed: Some(seed),
        ..settings
    })?;
    let optimal_path_length = reference_path_length(env);

    info!(
        seed,
        algorithms = Algorithm::ALL.len(),
        optimal_path_length,
        "running comparison"
    );

    let mut results = Vec::with_capacity(Algorithm::ALL.len());
    for (i, algorithm) in Algorithm::ALL.into_iter().enumerate() {
        info!(
            "running algorithm {} of {}: {}",
            i + 1,
            Algorithm::ALL.len(),
            algorithm
        );
        let mut grid = env.clone();
        let result = controller.run(&mut grid, algorithm, &mut NullSink);
        results.push(SearchStatistics::from_result(&result, optimal_path_length));
    }

    Ok(ComparisonReport {
        seed,
        optimal_path_length,
        results,
    })
}

/// Prints the comparison as a table followed by a short analysis.
pub fn print_comparison_results(report: &ComparisonReport) {
    println!("\n=== ALGORITHM COMPARISON RESULTS ===");
    println!("Seed: {} (for reproducibility)", report.seed);
    match report.optimal_path_length {
        Some(optimal) => println!("Optimal path length (BFS reference): {}", optimal),
        None => println!("Optimal path length (BFS reference): unreachable"),
    }
    println!();

    println!(
        "{:<14} {:<17} {:<9} {:<7} {:<9} {:<11} {:<10} {:<10}",
        "Algorithm", "Outcome", "Explored", "Moves", "Cost", "Efficiency", "Obstacles", "Time"
    );
    println!("{}", "-".repeat(94));

    for stats in &report.results {
        let moves = stats
            .path_length
            .map_or_else(|| "-".to_string(), |moves| moves.to_string());
        let cost = stats
            .path_cost
            .map_or_else(|| "-".to_string(), |cost| format!("{:.3}", cost));
        println!(
            "{:<14} {:<17} {:<9} {:<7} {:<9} {:<11} {:<10} {:<10}",
            stats.algorithm.to_string(),
            stats.outcome,
            stats.nodes_explored,
            moves,
            cost,
            format!("{:.3}", stats.route_efficiency),
            stats.dynamic_obstacles,
            format!("{:.2}ms", stats.elapsed_ms),
        );
    }
    println!();

    let found: Vec<&SearchStatistics> = report
        .results
        .iter()
        .filter(|stats| stats.path_length.is_some())
        .collect();

    if found.is_empty() {
        println!("No algorithm reached the target.");
        return;
    }

    println!("=== PERFORMANCE ANALYSIS ===");
    if let Some(fewest) = found.iter().min_by_key(|stats| stats.nodes_explored) {
        println!(
            "Fewest expansions: {} ({} nodes)",
            fewest.algorithm, fewest.nodes_explored
        );
    }
    if let Some(shortest) = found.iter().min_by_key(|stats| stats.path_length) {
        println!(
            "Fewest moves: {} ({} moves)",
            shortest.algorithm,
            shortest.path_length.unwrap_or_default()
        );
    }
    if let Some(cheapest) = found.iter().min_by(|a, b| {
        a.path_cost
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.path_cost.unwrap_or(f64::INFINITY))
    }) {
        println!(
            "Cheapest path: {} (cost {:.3})",
            cheapest.algorithm,
            cheapest.path_cost.unwrap_or_default()
        );
    }
    if let Some(fastest) = found
        .iter()
        .min_by(|a, b| a.elapsed_ms.total_cmp(&b.elapsed_ms))
    {
        println!("Fastest: {} ({:.2}ms)", fastest.algorithm, fastest.elapsed_ms);
    }

    if found.len() > 1 {
        let explored: Vec<usize> = found.iter().map(|stats| stats.nodes_explored).collect();
        let min = explored.iter().copied().min().unwrap_or_default();
        let max = explored.iter().copied().max().unwrap_or_default();
        println!(
            "Expansion range: {} to {} ({:.1}x)",
            min,
            max,
            max as f64 / min.max(1) as f64
        );
    }
}
