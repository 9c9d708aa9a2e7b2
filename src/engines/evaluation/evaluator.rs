//! Fitness of genomes against fitness cases.
//!
//! Fitness is the negative mean squared error over the training rows, so it
//! is never positive and 0 is a perfect fit. Results are memoised in a
//! [`FitnessCache`] keyed by the genome's canonical string.

use crate::data::FitnessCache;
use crate::engines::generation::{Individual, Node};
use crate::error::{GpError, Result};
use crate::functions::registry::variable_index;
use crate::functions::SymbolRegistry;
use crate::types::{FitnessCases, Symbol};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Value of a missing node. Well-formed genomes never reach it.
pub const ABSENT_NODE_VALUE: f64 = f64::MIN;

/// Interpret a genome on one input row.
pub fn evaluate(node: Option<&Node>, row: &[f64], registry: &SymbolRegistry) -> f64 {
    let Some(node) = node else {
        return ABSENT_NODE_VALUE;
    };

    match registry.primitive(node.value) {
        Some(primitive) => {
            let args = [
                evaluate(node.left.as_deref(), row, registry),
                evaluate(node.right.as_deref(), row, registry),
            ];
            primitive.execute(&args[..primitive.arity().min(args.len())])
        }
        None => terminal_value(node.value, row),
    }
}

fn terminal_value(symbol: Symbol, row: &[f64]) -> f64 {
    if let Some(digit) = symbol.to_digit(10) {
        return f64::from(digit);
    }
    variable_index(symbol)
        .and_then(|i| row.get(i).copied())
        .unwrap_or(ABSENT_NODE_VALUE)
}

pub struct FitnessEvaluator {
    registry: Arc<SymbolRegistry>,
    training: Arc<FitnessCases>,
    evaluations: AtomicUsize,
    parallel: bool,
}

impl FitnessEvaluator {
    /// Every variable terminal must index into the training rows.
    pub fn new(registry: Arc<SymbolRegistry>, training: Arc<FitnessCases>, parallel: bool) -> Result<Self> {
        if training.is_empty() {
            return Err(GpError::Validation(
                "Fitness evaluation needs at least one training row".to_string(),
            ));
        }
        let width = training.width();
        if let Some(symbol) = registry
            .variables()
            .find(|s| variable_index(*s).map_or(true, |i| i >= width))
        {
            return Err(GpError::Validation(format!(
                "Variable {:?} has no column in rows of width {}",
                symbol, width
            )));
        }

        Ok(Self {
            registry,
            training,
            evaluations: AtomicUsize::new(0),
            parallel,
        })
    }

    /// Fitness on the training rows. Counts as one evaluation.
    pub fn evaluate_genome(&self, genome: &Node) -> f64 {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.evaluate_on(genome, &self.training)
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Fitness on arbitrary rows, e.g. the held-out test split.
    /// `None` when there are no rows.
    pub fn evaluate_on(&self, genome: &Node, cases: &FitnessCases) -> Option<f64> {
        if cases.is_empty() {
            return None;
        }

        let squared_error: f64 = cases
            .rows()
            .map(|(row, target)| {
                let error = evaluate(Some(genome), row, &self.registry) - target;
                error * error
            })
            .sum();
        let fitness = -(squared_error / cases.len() as f64);

        if fitness.is_nan() {
            log::trace!("Non-finite fitness for {}, clamped", genome);
            return Some(f64::NEG_INFINITY);
        }
        Some(fitness)
    }

    /// Assign a fitness to every individual, reusing cached values.
    pub fn evaluate_population(&self, population: &mut [Individual], cache: &mut FitnessCache) -> Result<()> {
        let precomputed = if self.parallel {
            self.evaluate_misses_parallel(population, cache)
        } else {
            HashMap::new()
        };

        for individual in population.iter_mut() {
            let key = individual.genome.to_canonical_string();
            let fitness = match cache.get(&key) {
                Some(fitness) => fitness,
                None => {
                    let fitness = match precomputed.get(&key) {
                        Some(fitness) => *fitness,
                        None => self.evaluate_genome(&individual.genome),
                    };
                    cache.insert(key, fitness)
                }
            };

            if fitness > 0.0 {
                return Err(GpError::Invariant(format!(
                    "positive fitness {} for {}",
                    fitness, individual.genome
                )));
            }
            individual.fitness = fitness;
        }

        log::debug!(
            "Fitness cache: {} entries, {} hits, {} misses",
            cache.len(),
            cache.hits(),
            cache.misses()
        );
        Ok(())
    }

    /// Evaluate each distinct uncached genome once, in parallel. The cache
    /// itself is only written afterwards, from the calling thread.
    fn evaluate_misses_parallel(&self, population: &[Individual], cache: &FitnessCache) -> HashMap<String, f64> {
        let mut seen = HashSet::new();
        let misses: Vec<(String, &Node)> = population
            .iter()
            .map(|individual| (individual.genome.to_canonical_string(), &individual.genome))
            .filter(|(key, _)| cache.peek(key).is_none() && seen.insert(key.clone()))
            .collect();

        misses
            .into_par_iter()
            .map(|(key, genome)| (key, self.evaluate_genome(genome)))
            .collect()
    }

    /// Number of genomes actually interpreted so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn training(&self) -> &FitnessCases {
        &self.training
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<SymbolRegistry> {
        let digits: Vec<Symbol> = ('0'..='9').collect();
        Arc::new(SymbolRegistry::new(&['+', '-', '*', '/'], &digits, &['a', 'b']).unwrap())
    }

    fn cases() -> Arc<FitnessCases> {
        // target = a * b + 1
        Arc::new(FitnessCases::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 5.0]],
            vec![3.0, 13.0, 1.0],
        ))
    }

    fn tree(genome: &str) -> Node {
        Node::from_canonical_string(genome, &registry()).unwrap()
    }

    #[test]
    fn test_protected_division() {
        let registry = registry();
        assert_eq!(evaluate(Some(&tree("/40")), &[], &registry), 4.0);
        assert_eq!(evaluate(Some(&tree("/93")), &[], &registry), 3.0);
    }

    #[test]
    fn test_variables_and_absent_node() {
        let registry = registry();
        assert_eq!(evaluate(Some(&tree("-ba")), &[2.0, 7.0], &registry), 5.0);
        assert_eq!(evaluate(Some(&Node::new('A')), &[2.5], &registry), 2.5);
        assert_eq!(evaluate(None, &[], &registry), ABSENT_NODE_VALUE);
    }

    #[test]
    fn test_fitness_is_negative_mse() {
        let evaluator = FitnessEvaluator::new(registry(), cases(), false).unwrap();

        assert_eq!(evaluator.evaluate_genome(&tree("+*ab1")), 0.0);
        // Errors 1, 1, 1 against a * b.
        assert_eq!(evaluator.evaluate_genome(&tree("*ab")), -1.0);
        assert_eq!(evaluator.evaluations(), 2);
    }

    #[test]
    fn test_rejects_variables_without_columns() {
        let narrow = Arc::new(FitnessCases::new(vec![vec![1.0]], vec![1.0]));
        assert!(FitnessEvaluator::new(registry(), narrow, false).is_err());
        assert!(FitnessEvaluator::new(registry(), Arc::new(FitnessCases::default()), false).is_err());
    }

    #[test]
    fn test_cache_skips_repeat_evaluations() {
        let evaluator = FitnessEvaluator::new(registry(), cases(), false).unwrap();
        let mut cache = FitnessCache::new();
        let mut population = vec![
            Individual::new(tree("*ab")),
            Individual::new(tree("*ab")),
            Individual::new(tree("+ab")),
        ];

        evaluator.evaluate_population(&mut population, &mut cache).unwrap();
        assert_eq!(evaluator.evaluations(), 2);
        assert_eq!(population[0].fitness, population[1].fitness);

        evaluator.evaluate_population(&mut population, &mut cache).unwrap();
        assert_eq!(evaluator.evaluations(), 2);
        assert_eq!(cache.hits(), 4);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let genomes = ["*ab", "+ab", "*ab", "/a0", "-+ab1"];
        let run = |parallel| {
            let evaluator = FitnessEvaluator::new(registry(), cases(), parallel).unwrap();
            let mut cache = FitnessCache::new();
            let mut population: Vec<Individual> =
                genomes.iter().map(|g| Individual::new(tree(g))).collect();
            evaluator.evaluate_population(&mut population, &mut cache).unwrap();
            let fitness: Vec<f64> = population.iter().map(|i| i.fitness).collect();
            (fitness, evaluator.evaluations(), cache.hits(), cache.misses())
        };

        assert_eq!(run(false), run(true));
    }
}
