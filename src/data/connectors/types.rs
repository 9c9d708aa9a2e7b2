use crate::types::{FitnessCases, Symbol};

/// Fitness cases loaded from disk together with their variable symbols.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: String,
    pub cases: FitnessCases,
    /// Variable symbol of each input column, in column order
    pub variables: Vec<Symbol>,
}
