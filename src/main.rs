use clap::Parser;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::error::Error;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use grid_search::comparison::{print_comparison_results, run_all_algorithms};
use grid_search::config::Config;
use grid_search::controller::{SearchController, SearchSettings};
use grid_search::display::{render_grid, TerminalSink, LEGEND};
use grid_search::events::{NullSink, StepSink};
use grid_search::statistics::{reference_path_length, SearchStatistics};

#[derive(Serialize)]
struct JsonReport<'a, T: Serialize> {
    settings: &'a SearchSettings,
    report: T,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let settings = config.search_settings()?;
    let algorithms = config.algorithms()?;
    let env = config.build_environment()?;
    let chatty = !config.quiet && !config.json;

    if chatty {
        println!("Starting grid search...");
        println!(
            "Grid size: {}x{}, Walls: {}",
            env.rows(),
            env.cols(),
            env.obstacle_count()
        );
        if let (Some(start), Some(target)) = (env.start(), env.target()) {
            println!("Start: {}, Target: {}", start, target);
        }
        println!(
            "Dynamic obstacle probability: {}",
            settings.obstacle_policy.probability
        );
        println!();
    }

    if config.is_comparison() {
        let report = run_all_algorithms(&env, settings)?;
        if config.json {
            let json = JsonReport {
                settings: &settings,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        } else {
            print_comparison_results(&report);
        }
        return Ok(());
    }

    let controller = SearchController::new(settings)?;
    let optimal_path_length = reference_path_length(&env);
    let animate = !config.no_visualization && !config.json && !config.quiet;

    for algorithm in algorithms {
        let mut grid = env.clone();
        let mut terminal = TerminalSink::new(Duration::from_millis(config.delay_ms));
        let mut null = NullSink;
        let sink: &mut dyn StepSink = if animate { &mut terminal } else { &mut null };

        let result = controller.run(&mut grid, algorithm, sink);
        let stats = SearchStatistics::from_result(&result, optimal_path_length);

        if config.json {
            let json = JsonReport {
                settings: &settings,
                report: &stats,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
            continue;
        }

        if !config.quiet {
            let empty = FxHashSet::default();
            println!("\n{}", LEGEND);
            print!("{}", render_grid(&grid, result.path(), &empty, &empty));
        }

        println!("\n=== FINAL RESULTS ===");
        print!("{}", stats);
    }
    Ok(())
}
