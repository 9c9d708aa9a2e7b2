use super::evolution_engine::ProgressCallback;
use super::genome::Individual;
use crate::engines::metrics::GenerationStats;

/// Prints one stats line per generation, and the whole population when verbose.
pub struct ConsoleProgressCallback {
    verbose: bool,
}

impl ConsoleProgressCallback {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting", generation);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, population: &[&Individual]) {
        if self.verbose {
            println!("-------------POPULATION:-------------");
            for individual in population {
                println!("{}", individual);
            }
        }
        println!("{}", stats);
    }
}

/// Discards all progress.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _stats: &GenerationStats, _population: &[&Individual]) {}
}
