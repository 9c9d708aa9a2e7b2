use crate::error::{GpError, Result};
use crate::types::FitnessCases;
use rand::seq::SliceRandom;
use rand::Rng;

/// Training and held-out test cases.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub training: FitnessCases,
    pub test: FitnessCases,
}

/// Random split of the fitness cases into training and test rows.
pub struct TrainTestSplitter {
    train_fraction: f64,
}

impl TrainTestSplitter {
    pub fn new(train_fraction: f64) -> Self {
        Self { train_fraction }
    }

    /// Shuffle the rows and put the first `floor(rows * train_fraction)` into training.
    pub fn split<R: Rng>(&self, cases: &FitnessCases, rng: &mut R) -> Result<DataSplit> {
        let total_rows = cases.len();
        let train_rows = (total_rows as f64 * self.train_fraction).floor() as usize;

        if train_rows == 0 || train_rows > total_rows {
            return Err(GpError::Validation(format!(
                "Invalid split: {} of {} rows would be used for training",
                train_rows, total_rows
            )));
        }

        let mut order: Vec<usize> = (0..total_rows).collect();
        order.shuffle(rng);

        let pick = |indices: &[usize]| {
            FitnessCases::new(
                indices.iter().map(|&i| cases.inputs[i].clone()).collect(),
                indices.iter().map(|&i| cases.targets[i]).collect(),
            )
        };

        let split = DataSplit {
            training: pick(&order[..train_rows]),
            test: pick(&order[train_rows..]),
        };

        if split.test.is_empty() {
            log::warn!("Test split is empty; the out-of-sample report will be skipped");
        }

        Ok(split)
    }
}
