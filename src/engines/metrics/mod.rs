pub mod stats;

pub use stats::{GenerationStats, Summary};
