use crate::types::Symbol;

/// Function symbol that combines the values of its children.
pub trait Primitive: Send + Sync {
    fn ui_name(&self) -> &'static str;

    /// Symbol used for this function inside a genome
    fn alias(&self) -> Symbol;

    /// Number of children a node with this symbol must own
    fn arity(&self) -> usize;

    /// Apply to already evaluated children, left to right
    fn execute(&self, args: &[f64]) -> f64;

    /// Render as infix text for reports
    fn format(&self, args: &[String]) -> String;
}
