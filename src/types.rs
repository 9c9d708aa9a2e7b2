use serde::{Deserialize, Serialize};

/// A single-character token in a genome: an arithmetic function or a terminal.
pub type Symbol = char;

/// Input rows with their target values.
///
/// `inputs[i][k]` is the value of the `k`-th variable (`a`, `b`, ...) for row `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessCases {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl FitnessCases {
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<f64>) -> Self {
        debug_assert_eq!(inputs.len(), targets.len());
        Self { inputs, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of input variables per row (0 when there are no rows).
    pub fn width(&self) -> usize {
        self.inputs.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&[f64], f64)> {
        self.inputs
            .iter()
            .map(Vec::as_slice)
            .zip(self.targets.iter().copied())
    }
}

/// Final outcome of one evolutionary search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub best_genome: String,
    pub best_formula: String,
    pub train_fitness: f64,
    pub test_fitness: Option<f64>,
    pub generations: usize,
    pub fitness_evaluations: usize,
    pub cache_hits: usize,
    pub cache_size: usize,
}
