use crate::error::{GpError, Result};
use crate::types::Symbol;
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Validate a fitness-case table and return the input variable symbols.
    ///
    /// Every column but the last is an input; input `k` must start with the
    /// `k`-th letter of the alphabet so variables resolve by letter position.
    pub fn validate_fitness_cases(df: &DataFrame) -> Result<Vec<Symbol>> {
        if df.width() < 2 {
            return Err(GpError::DataLoading(format!(
                "Expected at least one input column and a target column, found {} column(s)",
                df.width()
            )));
        }
        if df.height() == 0 {
            return Err(GpError::DataLoading("Fitness case file has no rows".to_string()));
        }

        for series in df.get_columns() {
            if !matches!(series.dtype(), DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
                return Err(GpError::DataLoading(format!(
                    "Column '{}' must be numeric, found {:?}",
                    series.name(),
                    series.dtype()
                )));
            }
            if series.null_count() > 0 {
                return Err(GpError::DataLoading(format!(
                    "Column '{}' contains {} missing value(s)",
                    series.name(),
                    series.null_count()
                )));
            }
        }

        let names = df.get_column_names();
        let inputs = &names[..names.len() - 1];
        Self::variable_symbols(inputs.iter().map(|name| name.as_str()))
    }

    /// Map input column names to `a`, `b`, `c`, ... in order.
    pub fn variable_symbols<'a, I>(names: I) -> Result<Vec<Symbol>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(k, name)| {
                let expected = u8::try_from(k)
                    .ok()
                    .filter(|k| *k < 26)
                    .map(|k| (b'a' + k) as char)
                    .ok_or_else(|| {
                        GpError::Validation(format!("Too many input columns ({}), at most 26 are supported", k + 1))
                    })?;

                match name.chars().next().map(|c| c.to_ascii_lowercase()) {
                    Some(symbol) if symbol == expected => Ok(symbol),
                    _ => Err(GpError::Validation(format!(
                        "Input column {} is named '{}', but must start with '{}' (inputs are read in alphabetical order)",
                        k + 1,
                        name,
                        expected
                    ))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_valid_table() {
        let df = df! {
            "a" => &[1.0, 2.0],
            "B" => &[3, 4],
            "y" => &[5.0, 6.0],
        }
        .unwrap();

        assert_eq!(DataValidator::validate_fitness_cases(&df).unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn test_rejects_out_of_order_inputs() {
        let df = df! {
            "b" => &[1.0, 2.0],
            "a" => &[3.0, 4.0],
            "y" => &[5.0, 6.0],
        }
        .unwrap();

        assert!(matches!(
            DataValidator::validate_fitness_cases(&df),
            Err(GpError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_single_column() {
        let df = df! { "y" => &[1.0, 2.0] }.unwrap();
        assert!(DataValidator::validate_fitness_cases(&df).is_err());
    }

    #[test]
    fn test_variable_symbols_accept_long_names() {
        let symbols = DataValidator::variable_symbols(["alpha", "Beta", "cost"]).unwrap();
        assert_eq!(symbols, vec!['a', 'b', 'c']);
    }
}
