//! Binary expression trees used as genomes.
//!
//! A parent exclusively owns its children, so a tree is a plain value:
//! `Clone` is a deep copy and two trees never share nodes. Indices address
//! nodes in pre-order (depth-first, left to right) with the root at 0.

use crate::error::{GpError, Result};
use crate::functions::SymbolRegistry;
use crate::types::Symbol;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Child slot of the `i`-th argument of a function.
    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub value: Symbol,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

impl Node {
    pub fn new(value: Symbol) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Box<Node>> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Attach a new leaf with `value` on `side` and return it.
    ///
    /// An occupied slot is left untouched and reported as an error.
    pub fn append_node(&mut self, value: Symbol, side: Side) -> Result<&mut Node> {
        let parent = self.value;
        let slot = self.slot_mut(side);
        if slot.is_some() {
            return Err(GpError::SlotOccupied { parent, side });
        }
        Ok(slot.insert(Box::new(Node::new(value))).as_mut())
    }

    /// Present children, left before right.
    pub fn children(&self) -> Vec<&Node> {
        self.left.as_deref().into_iter().chain(self.right.as_deref()).collect()
    }

    pub fn num_children(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Nodes with their depth, in pre-order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![(0, self)],
        }
    }

    pub fn node_count(&self) -> usize {
        self.pre_order().count()
    }

    /// Edges from the root to the deepest node, counted level by level.
    pub fn max_depth(&self) -> usize {
        let mut frontier = VecDeque::from([self]);
        let mut depth = 0;

        loop {
            for _ in 0..frontier.len() {
                if let Some(node) = frontier.pop_front() {
                    frontier.extend(node.children());
                }
            }
            if frontier.is_empty() {
                return depth;
            }
            depth += 1;
        }
    }

    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.pre_order().nth(index).map(|(_, node)| node)
    }

    pub fn node_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        let mut stack = vec![self];
        let mut position = 0;

        while let Some(node) = stack.pop() {
            if position == index {
                return Some(node);
            }
            position += 1;

            let Node { left, right, .. } = node;
            if let Some(right) = right.as_deref_mut() {
                stack.push(right);
            }
            if let Some(left) = left.as_deref_mut() {
                stack.push(left);
            }
        }
        None
    }

    pub fn depth_at(&self, index: usize) -> Option<usize> {
        self.pre_order().nth(index).map(|(depth, _)| depth)
    }

    /// Pre-order concatenation of the symbols, e.g. `*+543`.
    pub fn to_canonical_string(&self) -> String {
        self.pre_order().map(|(_, node)| node.value).collect()
    }

    /// Parenthesised infix rendering, e.g. `((5 + 4) * 3)`.
    pub fn to_formula(&self, registry: &SymbolRegistry) -> String {
        match registry.primitive(self.value) {
            Some(primitive) if primitive.arity() == self.num_children() => {
                let args: Vec<String> = self
                    .children()
                    .into_iter()
                    .map(|child| child.to_formula(registry))
                    .collect();
                primitive.format(&args)
            }
            _ => self.value.to_string(),
        }
    }

    /// Rebuild a tree from its canonical string.
    pub fn from_canonical_string(genome: &str, registry: &SymbolRegistry) -> Result<Node> {
        let mut symbols = genome.chars();
        let root = Self::parse_pre_order(&mut symbols, registry)?;

        if symbols.next().is_some() {
            return Err(GpError::Validation(format!(
                "Trailing symbols after a complete tree in {:?}",
                genome
            )));
        }
        Ok(root)
    }

    fn parse_pre_order(symbols: &mut std::str::Chars<'_>, registry: &SymbolRegistry) -> Result<Node> {
        let value = symbols
            .next()
            .ok_or_else(|| GpError::Validation("Genome string ended early".to_string()))?;
        let arity = registry.arity(value).ok_or(GpError::UnknownSymbol(value))?;

        let mut node = Node::new(value);
        for i in 0..arity {
            let side = Side::from_index(i).ok_or(GpError::ArityMismatch {
                symbol: value,
                expected: 2,
                actual: arity,
            })?;
            let child = Self::parse_pre_order(symbols, registry)?;
            *node.slot_mut(side) = Some(Box::new(child));
        }
        Ok(node)
    }

    /// Every node must own exactly as many children as its symbol's arity.
    pub fn check_arity(&self, registry: &SymbolRegistry) -> Result<()> {
        for (_, node) in self.pre_order() {
            let expected = registry
                .arity(node.value)
                .ok_or(GpError::UnknownSymbol(node.value))?;
            let actual = node.num_children();
            if expected != actual || (actual == 1 && node.left.is_none()) {
                return Err(GpError::ArityMismatch {
                    symbol: node.value,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

/// Number of nodes in a possibly absent tree.
pub fn node_count(tree: Option<&Node>) -> usize {
    tree.map_or(0, Node::node_count)
}

/// Depth of a possibly absent tree.
pub fn max_depth(tree: Option<&Node>) -> usize {
    tree.map_or(0, Node::max_depth)
}

/// Pre-order traversal with an explicit stack.
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push((depth + 1, right));
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push((depth + 1, left));
        }
        Some((depth, node))
    }
}
