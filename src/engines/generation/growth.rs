//! Random tree generation: the "grow" and "full" methods and ramped
//! half-and-half initialization.

use super::genome::Individual;
use super::tree::{Node, Side};
use crate::error::{GpError, Result};
use crate::functions::SymbolRegistry;
use crate::types::Symbol;
use rand::Rng;

/// Draw the symbol for a child of a node at `curr_depth`.
///
/// Terminals are forced once the next level would reach `max_depth`. Below
/// that, `must_fill` always picks a function; otherwise a fair coin decides
/// between a terminal and a function.
pub fn random_symbol<R: Rng>(
    curr_depth: usize,
    max_depth: usize,
    must_fill: bool,
    registry: &SymbolRegistry,
    rng: &mut R,
) -> Symbol {
    let pool = if curr_depth + 1 >= max_depth || (!must_fill && rng.gen_bool(0.5)) {
        registry.terminals()
    } else {
        registry.functions()
    };
    pool[rng.gen_range(0..pool.len())]
}

/// Fill every child slot of `node`, recursing into new function children.
///
/// The subtree rooted at `node` ends up at most `max_depth - curr_depth` deep.
pub fn grow<R: Rng>(
    node: &mut Node,
    curr_depth: usize,
    max_depth: usize,
    must_fill: bool,
    registry: &SymbolRegistry,
    rng: &mut R,
) -> Result<()> {
    grow_node(node, curr_depth, max_depth, must_fill, registry, rng)?;

    let depth = node.max_depth();
    if curr_depth + depth > max_depth {
        return Err(GpError::DepthExceeded {
            depth: curr_depth + depth,
            max_depth,
        });
    }
    Ok(())
}

fn grow_node<R: Rng>(
    node: &mut Node,
    curr_depth: usize,
    max_depth: usize,
    must_fill: bool,
    registry: &SymbolRegistry,
    rng: &mut R,
) -> Result<()> {
    if curr_depth >= max_depth {
        return Ok(());
    }

    let arity = registry
        .arity(node.value)
        .ok_or(GpError::UnknownSymbol(node.value))?;

    for i in 0..arity {
        let side = Side::from_index(i).ok_or(GpError::ArityMismatch {
            symbol: node.value,
            expected: 2,
            actual: arity,
        })?;

        let symbol = random_symbol(curr_depth, max_depth, must_fill, registry, rng);
        let child = node.append_node(symbol, side)?;

        if curr_depth + 1 < max_depth && registry.is_function(symbol) {
            grow_node(child, curr_depth + 1, max_depth, must_fill, registry, rng)?;
        }
    }
    Ok(())
}

/// A new tree no deeper than `max_depth`.
pub fn generate_tree<R: Rng>(
    max_depth: usize,
    must_fill: bool,
    registry: &SymbolRegistry,
    rng: &mut R,
) -> Result<Node> {
    let symbol = random_symbol(0, max_depth, must_fill, registry, rng);
    let mut tree = Node::new(symbol);

    if registry.is_function(symbol) {
        grow(&mut tree, 0, max_depth, must_fill, registry, rng)?;
    }
    Ok(tree)
}

/// Ramped half-and-half: individual `i` gets depth limit `i % max_depth + 1`
/// and a coin flip between the full and grow methods.
pub fn ramped_half_and_half<R: Rng>(
    population_size: usize,
    max_depth: usize,
    registry: &SymbolRegistry,
    rng: &mut R,
) -> Result<Vec<Individual>> {
    (0..population_size)
        .map(|i| {
            let full = rng.gen_bool(0.5);
            let depth_limit = i % max_depth + 1;
            let tree = generate_tree(depth_limit, full, registry, rng)?;
            Ok(Individual::new(tree))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> SymbolRegistry {
        let digits: Vec<Symbol> = ('0'..='9').collect();
        SymbolRegistry::new(&['+', '-', '*', '/'], &digits, &['a']).unwrap()
    }

    #[test]
    fn test_forced_terminal_at_depth_limit() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let symbol = random_symbol(2, 3, true, &registry, &mut rng);
            assert!(!registry.is_function(symbol));
        }
    }

    #[test]
    fn test_full_method_builds_complete_trees() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(5);
        let tree = generate_tree(3, true, &registry, &mut rng).unwrap();

        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.node_count(), 15);
        for (depth, node) in tree.pre_order() {
            assert_eq!(registry.is_function(node.value), depth < 3);
            assert_eq!(node.is_leaf(), depth == 3);
        }
    }

    #[test]
    fn test_grow_respects_depth_limit() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(11);
        for max_depth in 0..6 {
            for _ in 0..50 {
                let tree = generate_tree(max_depth, false, &registry, &mut rng).unwrap();
                assert!(tree.max_depth() <= max_depth);
                assert!(tree.check_arity(&registry).is_ok());
            }
        }
    }

    #[test]
    fn test_grow_rejects_occupied_slot() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(2);
        let mut node = Node::new('+');
        node.append_node('1', Side::Left).unwrap();

        let result = grow(&mut node, 0, 3, false, &registry, &mut rng);
        assert!(matches!(result, Err(GpError::SlotOccupied { .. })));
    }

    #[test]
    fn test_ramped_half_and_half() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(7);
        let population = ramped_half_and_half(20, 4, &registry, &mut rng).unwrap();

        assert_eq!(population.len(), 20);
        for (i, individual) in population.iter().enumerate() {
            assert!(individual.genome.max_depth() <= i % 4 + 1);
            assert_eq!(individual.fitness, f64::NEG_INFINITY);
        }
    }
}
