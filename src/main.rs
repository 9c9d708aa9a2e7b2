//! symgp - evolve arithmetic expressions that fit a table of fitness cases.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use symgp::config::ConfigManager;
use symgp::data::CsvConnector;
use symgp::engines::generation::{ConsoleProgressCallback, EvolutionEngine, SilentProgressCallback};
use symgp::functions::SymbolRegistry;
use symgp::types::RunReport;

/// Symbolic regression with tree-based genetic programming
#[derive(Parser, Debug)]
#[command(name = "symgp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file of fitness cases (inputs a, b, ... then the target)
    #[arg(short, long)]
    fitness_cases: PathBuf,

    /// TOML or JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    population_size: Option<usize>,

    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long)]
    elite_size: Option<usize>,

    #[arg(long)]
    generations: Option<usize>,

    #[arg(long)]
    tournament_size: Option<usize>,

    /// Random seed (default: from the configuration)
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    crossover_probability: Option<f64>,

    #[arg(long)]
    mutation_probability: Option<f64>,

    /// Fraction of the fitness cases used for training
    #[arg(long)]
    test_train_split: Option<f64>,

    /// Print the whole population every generation
    #[arg(short, long)]
    verbose: bool,

    /// Evaluate fitness in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the effective configuration to this file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Print the final report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut manager = ConfigManager::new();
    match &args.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => manager.load_from_env().context("reading configuration from the environment")?,
    }
    manager.update(|config| {
        let search = &mut config.search;
        if let Some(value) = args.population_size {
            search.population_size = value;
        }
        if let Some(value) = args.max_depth {
            search.max_depth = value;
        }
        if let Some(value) = args.elite_size {
            search.elite_size = value;
        }
        if let Some(value) = args.generations {
            search.generations = value;
        }
        if let Some(value) = args.tournament_size {
            search.tournament_size = value;
        }
        if let Some(value) = args.seed {
            search.seed = Some(value);
        }
        if let Some(value) = args.crossover_probability {
            search.crossover_probability = value;
        }
        if let Some(value) = args.mutation_probability {
            search.mutation_probability = value;
        }
        if let Some(value) = args.test_train_split {
            search.test_train_split = value;
        }
        search.verbose |= args.verbose;
        search.parallel_evaluation |= args.parallel;
    })?;

    if let Some(path) = &args.save_config {
        manager
            .save_to_file(path)
            .with_context(|| format!("saving configuration to {}", path.display()))?;
    }

    let config = manager.get().clone();
    let dataset = CsvConnector::load_dataset(&args.fitness_cases)
        .with_context(|| format!("loading fitness cases from {}", args.fitness_cases.display()))?;
    let registry = Arc::new(SymbolRegistry::from_config(&config.symbols, &dataset.variables)?);

    let mut engine = EvolutionEngine::new(config.search.clone(), registry, &dataset.cases)?;
    let report = if args.json {
        engine.run(SilentProgressCallback)?
    } else {
        engine.run(ConsoleProgressCallback::new(config.search.verbose))?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "Best solution on train data: Genome: {}, Fitness: {:.4}",
        report.best_genome, report.train_fitness
    );
    match report.test_fitness {
        Some(fitness) => println!(
            "Best solution of test data: Genome: {}, Fitness: {:.4}",
            report.best_genome, fitness
        ),
        None => println!("Best solution of test data: no test rows"),
    }
    println!("Formula: {}", report.best_formula);
    println!(
        "Fitness evaluations: {}, cache hits: {}, cache entries: {}",
        report.fitness_evaluations, report.cache_hits, report.cache_size
    );
}
