use super::{types::Dataset, validator::DataValidator};
use crate::error::{GpError, Result};
use crate::types::FitnessCases;
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GpError::DataLoading(format!(
                "Fitness case file not found: {}",
                path.display()
            )));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| GpError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load and validate a fitness case file.
    pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let df = Self::load(&path)?;
        let (cases, variables) = Self::to_fitness_cases(&df)?;
        log::info!(
            "Loaded {} fitness cases with variables {:?} from {}",
            cases.len(),
            variables,
            path.as_ref().display()
        );

        Ok(Dataset {
            source: path.as_ref().to_string_lossy().to_string(),
            cases,
            variables,
        })
    }

    /// Split a validated table into row-major inputs and the last-column targets.
    pub fn to_fitness_cases(df: &DataFrame) -> Result<(FitnessCases, Vec<char>)> {
        let variables = DataValidator::validate_fitness_cases(df)?;
        let height = df.height();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        let (target_name, input_names) = names
            .split_last()
            .ok_or_else(|| GpError::DataLoading("Fitness case file has no columns".to_string()))?;

        let mut inputs = vec![Vec::with_capacity(input_names.len()); height];
        for name in input_names {
            let column = df.column(name)?.cast(&DataType::Float64)?;
            let values = column.f64()?;
            for (i, row) in inputs.iter_mut().enumerate() {
                row.push(Self::cell(values, name, i)?);
            }
        }

        let column = df.column(target_name)?.cast(&DataType::Float64)?;
        let values = column.f64()?;
        let targets = (0..height)
            .map(|i| Self::cell(values, target_name, i))
            .collect::<Result<Vec<f64>>>()?;

        Ok((FitnessCases::new(inputs, targets), variables))
    }

    fn cell(values: &Float64Chunked, column: &str, row: usize) -> Result<f64> {
        values.get(row).ok_or_else(|| {
            GpError::DataLoading(format!("Missing value in column '{}' at row {}", column, row + 1))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_to_fitness_cases() {
        let df = df! {
            "a" => &[1.0, 2.0, 3.0],
            "b" => &[4, 5, 6],
            "target" => &[5.0, 7.0, 9.0],
        }
        .unwrap();

        let (cases, variables) = CsvConnector::to_fitness_cases(&df).unwrap();
        assert_eq!(variables, vec!['a', 'b']);
        assert_eq!(cases.inputs, vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert_eq!(cases.targets, vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_missing_file() {
        let result = CsvConnector::load("does/not/exist.csv");
        assert!(matches!(result, Err(GpError::DataLoading(_))));
    }
}
