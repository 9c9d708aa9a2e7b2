use crate::functions::traits::Primitive;
use crate::types::Symbol;

/// Denominators closer to zero than this are replaced by 1.0.
pub const PROTECTED_DIVISION_THRESHOLD: f64 = 1e-5;

// --- Arithmetic ---
pub struct Add;
impl Primitive for Add {
    fn ui_name(&self) -> &'static str { "Addition" }
    fn alias(&self) -> Symbol { '+' }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> f64 {
        args[0] + args[1]
    }
    fn format(&self, args: &[String]) -> String {
        format!("({} + {})", args[0], args[1])
    }
}

pub struct Subtract;
impl Primitive for Subtract {
    fn ui_name(&self) -> &'static str { "Subtraction" }
    fn alias(&self) -> Symbol { '-' }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> f64 {
        args[0] - args[1]
    }
    fn format(&self, args: &[String]) -> String {
        format!("({} - {})", args[0], args[1])
    }
}

pub struct Multiply;
impl Primitive for Multiply {
    fn ui_name(&self) -> &'static str { "Multiplication" }
    fn alias(&self) -> Symbol { '*' }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> f64 {
        args[0] * args[1]
    }
    fn format(&self, args: &[String]) -> String {
        format!("({} * {})", args[0], args[1])
    }
}

// --- Protected division ---
pub struct ProtectedDivide;
impl Primitive for ProtectedDivide {
    fn ui_name(&self) -> &'static str { "Protected Division" }
    fn alias(&self) -> Symbol { '/' }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> f64 {
        let denominator = if args[1].abs() < PROTECTED_DIVISION_THRESHOLD {
            1.0
        } else {
            args[1]
        };
        args[0] / denominator
    }
    fn format(&self, args: &[String]) -> String {
        format!("({} / {})", args[0], args[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(Add.execute(&[2.0, 3.0]), 5.0);
        assert_eq!(Subtract.execute(&[2.0, 3.0]), -1.0);
        assert_eq!(Multiply.execute(&[2.0, 3.0]), 6.0);
        assert_eq!(ProtectedDivide.execute(&[3.0, 2.0]), 1.5);
    }

    #[test]
    fn test_division_by_near_zero_uses_one() {
        assert_eq!(ProtectedDivide.execute(&[4.0, 0.0]), 4.0);
        assert_eq!(ProtectedDivide.execute(&[4.0, 1e-6]), 4.0);
        assert_eq!(ProtectedDivide.execute(&[4.0, -1e-6]), 4.0);
        assert_eq!(ProtectedDivide.execute(&[4.0, 1e-5]), 4.0 / 1e-5);
    }

    #[test]
    fn test_format_is_infix() {
        let args = vec!["a".to_string(), "3".to_string()];
        assert_eq!(Multiply.format(&args), "(a * 3)");
        assert_eq!(ProtectedDivide.format(&args), "(a / 3)");
    }
}
