pub mod cache;
pub mod connectors;
pub mod splitter;

pub use cache::FitnessCache;
pub use connectors::{CsvConnector, DataValidator, Dataset};
pub use splitter::{DataSplit, TrainTestSplitter};
