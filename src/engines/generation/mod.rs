pub mod evolution_engine;
pub mod genome;
pub mod growth;
pub mod operators;
pub mod progress;
pub mod tree;

pub use evolution_engine::{EvolutionEngine, ProgressCallback};
pub use genome::{Genome, Individual};
pub use progress::{ConsoleProgressCallback, SilentProgressCallback};
pub use tree::{Node, Side};
