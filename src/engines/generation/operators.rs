use crate::engines::generation::growth::generate_tree;
use crate::engines::generation::tree::Node;
use crate::error::{GpError, Result};
use crate::functions::SymbolRegistry;
use crate::utils::random::{sample_without_replacement, uniform_probability};
use rand::Rng;

/// Subtree mutation: replace a random node with a freshly grown subtree.
///
/// The replacement is limited to the depth left below the chosen node, so
/// the tree never grows past `max_depth`. Returns whether a mutation happened.
pub fn subtree_mutation<R: Rng>(
    root: &mut Node,
    max_depth: usize,
    mutation_probability: f64,
    registry: &SymbolRegistry,
    rng: &mut R,
) -> Result<bool> {
    if uniform_probability(rng) >= mutation_probability {
        return Ok(false);
    }

    let index = rng.gen_range(0..root.node_count());
    let depth = root
        .depth_at(index)
        .ok_or_else(|| GpError::Invariant(format!("no node at mutation point {}", index)))?;
    let subtree = generate_tree(max_depth.saturating_sub(depth), false, registry, rng)?;

    match root.node_at_mut(index) {
        Some(node) => *node = subtree,
        None => {
            return Err(GpError::Invariant(format!(
                "no node at mutation point {}",
                index
            )))
        }
    }

    let new_depth = root.max_depth();
    if new_depth > max_depth {
        return Err(GpError::DepthExceeded {
            depth: new_depth,
            max_depth,
        });
    }
    Ok(true)
}

/// Subtree crossover: swap random subtrees between copies of two parents.
///
/// The parents are never modified. A swap that would push either child past
/// `max_depth` is skipped and the copies come back unchanged.
pub fn subtree_crossover<R: Rng>(
    parent1: &Node,
    parent2: &Node,
    max_depth: usize,
    crossover_probability: f64,
    rng: &mut R,
) -> Result<(Node, Node)> {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    if uniform_probability(rng) < crossover_probability {
        let point1 = rng.gen_range(0..child1.node_count());
        let point2 = rng.gen_range(0..child2.node_count());
        swap_subtrees(&mut child1, point1, &mut child2, point2, max_depth)?;
    }

    Ok((child1, child2))
}

/// Exchange the subtree at pre-order `point1` of `tree1` with the one at
/// `point2` of `tree2`. Returns `false` when the depth check rejects the swap.
pub fn swap_subtrees(
    tree1: &mut Node,
    point1: usize,
    tree2: &mut Node,
    point2: usize,
    max_depth: usize,
) -> Result<bool> {
    let (depth1, subtree_depth1) = crossover_point(tree1, point1)?;
    let (depth2, subtree_depth2) = crossover_point(tree2, point2)?;

    if depth1 + subtree_depth2 > max_depth || depth2 + subtree_depth1 > max_depth {
        log::debug!(
            "Crossover too deep: {}@{} <-> {}@{} (max depth {})",
            tree1,
            point1,
            tree2,
            point2,
            max_depth
        );
        return Ok(false);
    }

    match (tree1.node_at_mut(point1), tree2.node_at_mut(point2)) {
        (Some(a), Some(b)) => std::mem::swap(a, b),
        _ => {
            return Err(GpError::Invariant(
                "crossover point vanished before the swap".to_string(),
            ))
        }
    }
    Ok(true)
}

/// Depth of the node at `point` and depth of the subtree rooted there.
fn crossover_point(tree: &Node, point: usize) -> Result<(usize, usize)> {
    tree.pre_order()
        .nth(point)
        .map(|(depth, node)| (depth, node.max_depth()))
        .ok_or_else(|| {
            GpError::Validation(format!(
                "Crossover point {} outside a tree of {} nodes",
                point,
                tree.node_count()
            ))
        })
}

/// Tournament selection over a population's fitness values.
///
/// Runs one tournament per individual. Each tournament draws
/// `tournament_size` distinct contestants and keeps the fittest (the first
/// drawn wins ties). Returns the winners' indices.
pub fn tournament_selection<R: Rng>(
    fitness: &[f64],
    tournament_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    (0..fitness.len())
        .filter_map(|_| {
            sample_without_replacement(rng, fitness.len(), tournament_size)
                .into_iter()
                .reduce(|best, i| if fitness[i] > fitness[best] { i } else { best })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> SymbolRegistry {
        let digits: Vec<Symbol> = ('0'..='9').collect();
        SymbolRegistry::new(&['+', '-', '*', '/'], &digits, &['a']).unwrap()
    }

    fn tree(genome: &str) -> Node {
        Node::from_canonical_string(genome, &registry()).unwrap()
    }

    #[test]
    fn test_swap_exchanges_whole_subtrees() {
        let mut child1 = tree("*+543");
        let mut child2 = tree("/+129");

        assert!(swap_subtrees(&mut child1, 1, &mut child2, 1, 3).unwrap());
        assert_eq!(child1.to_canonical_string(), "*+123");
        assert_eq!(child2.to_canonical_string(), "/+549");
        assert!(child1.max_depth() <= 3 && child2.max_depth() <= 3);
    }

    #[test]
    fn test_swap_rejected_when_too_deep() {
        let mut child1 = tree("*+543");
        let mut child2 = tree("/+129");

        // '5' sits at depth 2; grafting the depth-1 '+12' there needs depth 3.
        assert!(!swap_subtrees(&mut child1, 2, &mut child2, 1, 2).unwrap());
        assert_eq!(child1.to_canonical_string(), "*+543");
        assert_eq!(child2.to_canonical_string(), "/+129");
    }

    #[test]
    fn test_swap_rejects_out_of_range_point() {
        let mut child1 = tree("*+543");
        let mut child2 = tree("/+129");
        assert!(swap_subtrees(&mut child1, 5, &mut child2, 0, 3).is_err());
    }

    #[test]
    fn test_crossover_leaves_parents_untouched() {
        let parent1 = tree("*+543");
        let parent2 = tree("/+129");
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let (child1, child2) = subtree_crossover(&parent1, &parent2, 3, 1.0, &mut rng).unwrap();
            assert_eq!(parent1.to_canonical_string(), "*+543");
            assert_eq!(parent2.to_canonical_string(), "/+129");
            assert_eq!(child1.node_count() + child2.node_count(), 10);
            assert!(child1.max_depth() <= 3 && child2.max_depth() <= 3);
        }
    }

    #[test]
    fn test_crossover_disabled_returns_copies() {
        let parent1 = tree("*+543");
        let parent2 = tree("/+129");
        let mut rng = StdRng::seed_from_u64(3);

        let (child1, child2) = subtree_crossover(&parent1, &parent2, 3, 0.0, &mut rng).unwrap();
        assert_eq!(child1, parent1);
        assert_eq!(child2, parent2);
    }

    #[test]
    fn test_mutation_respects_depth_limit() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..200 {
            let mut genome = tree("+*6*572");
            let mutated = subtree_mutation(&mut genome, 3, 1.0, &registry, &mut rng).unwrap();
            assert!(mutated);
            assert!(genome.max_depth() <= 3);
            assert!(genome.check_arity(&registry).is_ok());
        }
    }

    #[test]
    fn test_mutation_gate() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(17);
        let mut genome = tree("+*6*572");

        assert!(!subtree_mutation(&mut genome, 3, 0.0, &registry, &mut rng).unwrap());
        assert_eq!(genome.to_canonical_string(), "+*6*572");
    }

    #[test]
    fn test_tournament_of_whole_population_picks_best() {
        let fitness = [-4.0, -0.5, -3.0, -2.0];
        let mut rng = StdRng::seed_from_u64(0);

        let winners = tournament_selection(&fitness, fitness.len(), &mut rng);
        assert_eq!(winners, vec![1; 4]);
    }

    #[test]
    fn test_tournament_winners_in_range() {
        let fitness: Vec<f64> = (0..10).map(|i| -(i as f64)).collect();
        let mut rng = StdRng::seed_from_u64(8);

        let winners = tournament_selection(&fitness, 3, &mut rng);
        assert_eq!(winners.len(), 10);
        // The two weakest can never beat two other distinct contestants.
        assert!(winners.iter().all(|&i| i < 8));
    }
}
