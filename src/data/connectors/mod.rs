mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::Dataset;
pub use validator::DataValidator;
