use crate::config::SymbolConfig;
use crate::error::{GpError, Result};
use crate::functions::{
    primitives::{Add, Multiply, ProtectedDivide, Subtract},
    traits::Primitive,
};
use crate::types::Symbol;
use std::{collections::HashMap, sync::Arc};

/// The symbol source: which symbols may appear in a genome and their arities.
///
/// Functions are backed by a [`Primitive`]; terminals are the digit constants
/// `0`-`9` and the input variables `a`, `b`, ... taken from the dataset.
pub struct SymbolRegistry {
    primitives: HashMap<Symbol, Arc<dyn Primitive>>,
    functions: Vec<Symbol>,
    terminals: Vec<Symbol>,
    arities: HashMap<Symbol, usize>,
}

impl SymbolRegistry {
    pub fn new(functions: &[Symbol], constants: &[Symbol], variables: &[Symbol]) -> Result<Self> {
        let available: HashMap<Symbol, Arc<dyn Primitive>> = Self::available_primitives()
            .into_iter()
            .map(|p| (p.alias(), p))
            .collect();

        let mut registry = Self {
            primitives: HashMap::new(),
            functions: Vec::new(),
            terminals: Vec::new(),
            arities: HashMap::new(),
        };

        for &symbol in functions {
            let primitive = available
                .get(&symbol)
                .cloned()
                .ok_or(GpError::UnknownSymbol(symbol))?;
            registry.register(symbol, primitive.arity())?;
            log::debug!("Registered function {:?} ({})", symbol, primitive.ui_name());
            registry.functions.push(symbol);
            registry.primitives.insert(symbol, primitive);
        }

        for &symbol in constants {
            if !symbol.is_ascii_digit() {
                return Err(GpError::Configuration(format!(
                    "Constant {:?} must be a digit 0-9",
                    symbol
                )));
            }
            registry.register(symbol, 0)?;
            registry.terminals.push(symbol);
        }

        for &symbol in variables {
            if !symbol.is_ascii_alphabetic() {
                return Err(GpError::Configuration(format!(
                    "Variable {:?} must be a letter",
                    symbol
                )));
            }
            registry.register(symbol, 0)?;
            registry.terminals.push(symbol);
        }

        if registry.functions.is_empty() {
            return Err(GpError::Configuration("At least one function symbol is required".to_string()));
        }
        if registry.terminals.is_empty() {
            return Err(GpError::Configuration("At least one terminal symbol is required".to_string()));
        }

        Ok(registry)
    }

    pub fn from_config(config: &SymbolConfig, variables: &[Symbol]) -> Result<Self> {
        let functions = parse_symbols(&config.functions)?;
        let constants = parse_symbols(&config.constants)?;
        Self::new(&functions, &constants, variables)
    }

    fn available_primitives() -> Vec<Arc<dyn Primitive>> {
        vec![
            Arc::new(Add),
            Arc::new(Subtract),
            Arc::new(Multiply),
            Arc::new(ProtectedDivide),
        ]
    }

    fn register(&mut self, symbol: Symbol, arity: usize) -> Result<()> {
        if self.arities.insert(symbol, arity).is_some() {
            return Err(GpError::Configuration(format!(
                "Symbol {:?} is defined more than once",
                symbol
            )));
        }
        Ok(())
    }

    pub fn functions(&self) -> &[Symbol] {
        &self.functions
    }

    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn arity(&self, symbol: Symbol) -> Option<usize> {
        self.arities.get(&symbol).copied()
    }

    pub fn is_valid(&self, symbol: Symbol) -> bool {
        self.arities.contains_key(&symbol)
    }

    pub fn is_function(&self, symbol: Symbol) -> bool {
        self.primitives.contains_key(&symbol)
    }

    pub fn primitive(&self, symbol: Symbol) -> Option<&dyn Primitive> {
        self.primitives.get(&symbol).map(|p| p.as_ref())
    }

    /// Input variables, in the order they were registered.
    pub fn variables(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.iter().copied().filter(|s| s.is_ascii_alphabetic())
    }
}

/// Parse configured single-character symbol strings.
pub fn parse_symbols(values: &[String]) -> Result<Vec<Symbol>> {
    values
        .iter()
        .map(|value| {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => Ok(symbol),
                _ => Err(GpError::Configuration(format!(
                    "Symbol {:?} must be exactly one character",
                    value
                ))),
            }
        })
        .collect()
}

/// Position of a variable symbol in an input row (`a`/`A` -> 0).
pub fn variable_index(symbol: Symbol) -> Option<usize> {
    if symbol.is_ascii_alphabetic() {
        Some((symbol.to_ascii_lowercase() as u8 - b'a') as usize)
    } else {
        None
    }
}
