// src/engines/metrics/stats.rs
use crate::engines::generation::Individual;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Mean, population standard deviation and maximum of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
}

impl Summary {
    pub fn calculate(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { mean: 0.0, std: 0.0, max: 0.0 };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        Self {
            mean,
            std: Self::std_dev(values, mean),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    fn std_dev(values: &[f64], mean: f64) -> f64 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

/// One generation's population statistics.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub duration: Duration,
    pub fitness: Summary,
    pub size: Summary,
    pub depth: Summary,
    /// `Genome: ..., Fitness: ...` of the best individual
    pub best: String,
}

impl GenerationStats {
    /// `population` must already be sorted best first.
    pub fn calculate(generation: usize, duration: Duration, population: &[&Individual]) -> Self {
        let fitness: Vec<f64> = population.iter().map(|i| i.fitness).collect();
        let size: Vec<f64> = population.iter().map(|i| i.genome.node_count() as f64).collect();
        let depth: Vec<f64> = population.iter().map(|i| i.genome.max_depth() as f64).collect();

        Self {
            generation,
            duration,
            fitness: Summary::calculate(&fitness),
            size: Summary::calculate(&size),
            depth: Summary::calculate(&depth),
            best: population.first().map(|i| i.to_string()).unwrap_or_default(),
        }
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generation: {}, Duration: {:.4}, fit ave: {:.2}+/-{:.3}, size ave: {:.2}+/-{:.3} \
             depth ave: {:.2}+/-{:.3}, max size: {}, max depth: {}, max fit:{:.6} best solution: {}",
            self.generation,
            self.duration.as_secs_f64(),
            self.fitness.mean,
            self.fitness.std,
            self.size.mean,
            self.size.std,
            self.depth.mean,
            self.depth.std,
            self.size.max as usize,
            self.depth.max as usize,
            self.fitness.max,
            self.best
        )
    }
}
