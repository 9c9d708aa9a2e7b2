use super::traits::ConfigSection;
use crate::error::GpError;
use crate::functions::registry::parse_symbols;
use serde::{Deserialize, Serialize};

/// Function and constant symbols available to the search.
///
/// Input variables are not listed here; they come from the dataset header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    pub functions: Vec<String>,
    pub constants: Vec<String>,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            functions: ["+", "-", "*", "/"].iter().map(|s| s.to_string()).collect(),
            constants: (0..=9).map(|d| d.to_string()).collect(),
        }
    }
}

impl ConfigSection for SymbolConfig {
    fn section_name() -> &'static str {
        "symbols"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.functions.is_empty() {
            return Err(GpError::Configuration(
                "At least one function symbol is required".to_string()
            ));
        }
        parse_symbols(&self.functions)?;

        for symbol in parse_symbols(&self.constants)? {
            if !symbol.is_ascii_digit() {
                return Err(GpError::Configuration(format!(
                    "Constant {:?} must be a digit 0-9",
                    symbol
                )));
            }
        }
        Ok(())
    }
}
