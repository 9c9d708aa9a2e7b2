pub mod evaluator;

pub use evaluator::{evaluate, FitnessEvaluator};
