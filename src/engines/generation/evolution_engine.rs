use crate::config::{ConfigSection, SearchConfig};
use crate::data::{FitnessCache, TrainTestSplitter};
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    genome::Individual,
    growth::ramped_half_and_half,
    operators::{subtree_crossover, subtree_mutation, tournament_selection},
};
use crate::engines::metrics::GenerationStats;
use crate::error::{GpError, Result};
use crate::functions::SymbolRegistry;
use crate::memory::{Arena, Handle};
use crate::types::{FitnessCases, RunReport};
use crate::utils::random::{sample_without_replacement, seeded_rng};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    /// `population` is sorted best first.
    fn on_generation_complete(&mut self, stats: &GenerationStats, population: &[&Individual]);
}

pub struct EvolutionEngine {
    config: SearchConfig,
    registry: Arc<SymbolRegistry>,
    evaluator: FitnessEvaluator,
    test_cases: FitnessCases,
    cache: FitnessCache,
    rng: StdRng,
}

impl EvolutionEngine {
    /// Seed the run's random source and split `cases` into training and
    /// test rows with it.
    pub fn new(
        config: SearchConfig,
        registry: Arc<SymbolRegistry>,
        cases: &FitnessCases,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = seeded_rng(config.seed);
        let split = TrainTestSplitter::new(config.test_train_split).split(cases, &mut rng)?;
        log::info!(
            "Fitness cases split into {} training and {} test rows",
            split.training.len(),
            split.test.len()
        );

        let evaluator = FitnessEvaluator::new(
            Arc::clone(&registry),
            Arc::new(split.training),
            config.parallel_evaluation,
        )?;

        Ok(Self {
            config,
            registry,
            evaluator,
            test_cases: split.test,
            cache: FitnessCache::new(),
            rng,
        })
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<RunReport> {
        let population_size = self.config.population_size;
        // Parents and offspring are both live during replacement.
        let mut arena = Arena::with_capacity(2 * population_size)?;

        log::info!(
            "Starting search: population {}, generations {}, max depth {}",
            population_size,
            self.config.generations,
            self.config.max_depth
        );

        // Initialize population
        callback.on_generation_start(0);
        let started = Instant::now();
        let mut initial = ramped_half_and_half(
            population_size,
            self.config.max_depth,
            &self.registry,
            &mut self.rng,
        )?;
        self.evaluator.evaluate_population(&mut initial, &mut self.cache)?;
        let mut population = store(&mut arena, initial)?;
        sort_by_fitness(&arena, &mut population);
        self.report(0, started, &arena, &population, &mut callback)?;

        // Evolution loop
        let mut generation = 1;
        while generation < self.config.generations {
            callback.on_generation_start(generation);
            let started = Instant::now();

            let mut offspring = self.breed(&arena, &population)?;
            self.evaluator.evaluate_population(&mut offspring, &mut self.cache)?;
            let offspring = store(&mut arena, offspring)?;

            population = generational_replacement(&mut arena, population, offspring, self.config.elite_size);
            self.report(generation, started, &arena, &population, &mut callback)?;

            generation += 1;
        }

        let best = population
            .first()
            .and_then(|handle| arena.get(*handle))
            .cloned()
            .ok_or_else(|| GpError::Invariant("search ended with an empty population".to_string()))?;
        let released = arena.teardown();
        log::debug!("Arena teardown released {} individuals", released);

        let test_fitness = self.evaluator.evaluate_on(&best.genome, &self.test_cases);

        let report = RunReport {
            best_genome: best.genome.to_canonical_string(),
            best_formula: best.genome.to_formula(&self.registry),
            train_fitness: best.fitness,
            test_fitness,
            generations: self.config.generations,
            fitness_evaluations: self.evaluator.evaluations(),
            cache_hits: self.cache.hits(),
            cache_size: self.cache.len(),
        };
        log::info!(
            "Search finished: {} with training fitness {:.6} after {} evaluations",
            report.best_genome,
            report.train_fitness,
            report.fitness_evaluations
        );
        Ok(report)
    }

    /// Tournament selection, then crossover and mutation of random winner
    /// pairs until a full population of offspring exists.
    fn breed(&mut self, arena: &Arena<Individual>, population: &[Handle]) -> Result<Vec<Individual>> {
        let population_size = self.config.population_size;
        let fitness: Vec<f64> = population.iter().map(|h| arena[*h].fitness).collect();
        let winners = tournament_selection(&fitness, self.config.tournament_size, &mut self.rng);

        let mut offspring = Vec::with_capacity(population_size);
        while offspring.len() < population_size {
            let pair = sample_without_replacement(&mut self.rng, winners.len(), 2);
            let &[first, second] = pair.as_slice() else {
                return Err(GpError::Invariant(format!(
                    "cannot draw two parents from {} winners",
                    winners.len()
                )));
            };
            let parent1 = &arena[population[winners[first]]];
            let parent2 = &arena[population[winners[second]]];

            let (mut child1, mut child2) = subtree_crossover(
                &parent1.genome,
                &parent2.genome,
                self.config.max_depth,
                self.config.crossover_probability,
                &mut self.rng,
            )?;

            // Apply mutation
            for child in [&mut child1, &mut child2] {
                subtree_mutation(
                    child,
                    self.config.max_depth,
                    self.config.mutation_probability,
                    &self.registry,
                    &mut self.rng,
                )?;
            }

            offspring.push(Individual::new(child1));
            if offspring.len() < population_size {
                offspring.push(Individual::new(child2));
            }
        }

        Ok(offspring)
    }

    fn report<C: ProgressCallback>(
        &self,
        generation: usize,
        started: Instant,
        arena: &Arena<Individual>,
        population: &[Handle],
        callback: &mut C,
    ) -> Result<()> {
        if arena.len() != population.len() {
            return Err(GpError::Invariant(format!(
                "arena holds {} individuals for a population of {}",
                arena.len(),
                population.len()
            )));
        }
        let individuals: Vec<&Individual> = population.iter().map(|h| &arena[*h]).collect();
        self.check_invariants(&individuals)?;

        let stats = GenerationStats::calculate(generation, started.elapsed(), &individuals);
        callback.on_generation_complete(&stats, &individuals);
        Ok(())
    }

    fn check_invariants(&self, population: &[&Individual]) -> Result<()> {
        for individual in population {
            let depth = individual.genome.max_depth();
            if depth > self.config.max_depth {
                return Err(GpError::DepthExceeded {
                    depth,
                    max_depth: self.config.max_depth,
                });
            }
            individual.genome.check_arity(&self.registry)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    pub fn cache(&self) -> &FitnessCache {
        &self.cache
    }

    pub fn test_cases(&self) -> &FitnessCases {
        &self.test_cases
    }
}

fn store(arena: &mut Arena<Individual>, individuals: Vec<Individual>) -> Result<Vec<Handle>> {
    individuals
        .into_iter()
        .map(|individual| arena.allocate(individual))
        .collect()
}

/// Sort handles by fitness, best first.
pub fn sort_by_fitness(arena: &Arena<Individual>, handles: &mut [Handle]) {
    handles.sort_by(|a, b| {
        arena[*b]
            .fitness
            .partial_cmp(&arena[*a].fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Generational replacement with elitism.
///
/// The `i`-th best parent (for `i < elite_size`) takes the place of the
/// `i`-th worst offspring only if it is strictly fitter. Displaced offspring
/// and parents that were not kept are released from the arena. Returns the
/// new population, best first.
pub fn generational_replacement(
    arena: &mut Arena<Individual>,
    mut old_population: Vec<Handle>,
    mut new_population: Vec<Handle>,
    elite_size: usize,
) -> Vec<Handle> {
    sort_by_fitness(arena, &mut old_population);
    sort_by_fitness(arena, &mut new_population);

    let size = new_population.len();
    let elites = elite_size.min(old_population.len()).min(size);
    let mut kept = vec![false; old_population.len()];

    for i in 0..elites {
        let target = size - 1 - i;
        if arena[old_population[i]].fitness > arena[new_population[target]].fitness {
            arena.release(new_population[target]);
            new_population[target] = old_population[i];
            kept[i] = true;
        }
    }

    for (handle, kept) in old_population.into_iter().zip(kept) {
        if !kept {
            arena.release(handle);
        }
    }

    sort_by_fitness(arena, &mut new_population);
    new_population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::Node;

    fn individual(genome: char, fitness: f64) -> Individual {
        Individual {
            genome: Node::new(genome),
            fitness,
        }
    }

    fn allocate(arena: &mut Arena<Individual>, fitness: &[f64]) -> Vec<Handle> {
        fitness
            .iter()
            .map(|f| arena.allocate(individual('1', *f)).unwrap())
            .collect()
    }

    #[test]
    fn test_elites_replace_worst_offspring() {
        let mut arena = Arena::with_capacity(6).unwrap();
        let old = allocate(&mut arena, &[-3.0, -1.0, -2.0]);
        let new = allocate(&mut arena, &[-6.0, -0.5, -5.0]);

        let population = generational_replacement(&mut arena, old, new, 2);
        let fitness: Vec<f64> = population.iter().map(|h| arena[*h].fitness).collect();

        assert_eq!(fitness, vec![-0.5, -1.0, -2.0]);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_elite_needs_strictly_better_fitness() {
        let mut arena = Arena::with_capacity(4).unwrap();
        let old = allocate(&mut arena, &[-1.0, -9.0]);
        let new = allocate(&mut arena, &[-0.5, -1.0]);

        let population = generational_replacement(&mut arena, old.clone(), new.clone(), 1);

        assert_eq!(population, vec![new[0], new[1]]);
        assert!(old.iter().all(|h| !arena.contains(*h)));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_odd_population_keeps_size_and_live_count() {
        let mut arena = Arena::with_capacity(14).unwrap();
        let old = allocate(&mut arena, &[-1.0, -2.0, -3.0, -4.0, -5.0, -6.0, -7.0]);
        let new = allocate(&mut arena, &[-0.5, -8.0, -9.0, -1.5, -10.0, -2.5, -11.0]);

        let population = generational_replacement(&mut arena, old, new, 2);
        let fitness: Vec<f64> = population.iter().map(|h| arena[*h].fitness).collect();

        assert_eq!(fitness, vec![-0.5, -1.0, -1.5, -2.0, -2.5, -8.0, -9.0]);
        assert_eq!(arena.len(), 7);
        assert!(population.iter().all(|h| arena.contains(*h)));
    }

    #[test]
    fn test_zero_elites_is_pure_generational() {
        let mut arena = Arena::with_capacity(4).unwrap();
        let old = allocate(&mut arena, &[0.0, -0.1]);
        let new = allocate(&mut arena, &[-5.0, -4.0]);

        let population = generational_replacement(&mut arena, old, new.clone(), 0);
        assert_eq!(population, vec![new[1], new[0]]);
    }

    #[test]
    fn test_sort_by_fitness_puts_best_first() {
        let mut arena = Arena::with_capacity(3).unwrap();
        let mut handles = allocate(&mut arena, &[-2.0, f64::NEG_INFINITY, -0.1]);
        sort_by_fitness(&arena, &mut handles);

        let fitness: Vec<f64> = handles.iter().map(|h| arena[*h].fitness).collect();
        assert_eq!(fitness, vec![-0.1, -2.0, f64::NEG_INFINITY]);
    }
}
