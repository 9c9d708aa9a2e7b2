//! Genome and individual representation for genetic programming
//!
//! A genome is an arithmetic expression tree (see [`Node`]). Each individual
//! owns exactly one genome and the fitness last computed for it. Fitness is
//! the negative mean squared error on the training cases, so 0 is a perfect
//! fit and every other value is negative.
//!
//! # Example
//!
//! ```
//! use symgp::engines::generation::{Individual, Node};
//!
//! let individual = Individual::new(Node::new('7'));
//! assert_eq!(individual.fitness, f64::NEG_INFINITY);
//! ```

use super::tree::Node;
use std::fmt;

pub type Genome = Node;

/// Fitness of an individual that has not been evaluated yet.
pub const DEFAULT_FITNESS: f64 = f64::NEG_INFINITY;

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: f64,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: DEFAULT_FITNESS,
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome: {}, Fitness: {:.4}", self.genome, self.fitness)
    }
}
