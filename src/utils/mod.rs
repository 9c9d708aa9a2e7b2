pub mod random;

pub use random::{sample_without_replacement, seeded_rng, uniform_probability};
