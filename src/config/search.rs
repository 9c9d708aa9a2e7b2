use super::traits::ConfigSection;
use crate::error::GpError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value of `seed` that asks for OS entropy instead of a fixed seed.
pub const ENTROPY_SEED: &str = "entropy";

/// Parameters of one evolutionary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub population_size: usize,
    /// Maximum number of edges from the root to the deepest node
    pub max_depth: usize,
    pub elite_size: usize,
    pub generations: usize,
    pub tournament_size: usize,
    /// `None` seeds from OS entropy, written as `seed = "entropy"`
    #[serde(serialize_with = "serialize_seed", deserialize_with = "deserialize_seed")]
    pub seed: Option<u64>,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    /// Fraction of the fitness cases used for training
    pub test_train_split: f64,
    pub verbose: bool,
    /// Evaluate cache misses with rayon
    pub parallel_evaluation: bool,
}

fn serialize_seed<S: Serializer>(seed: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match seed {
        Some(seed) => serializer.serialize_u64(*seed),
        None => serializer.serialize_str(ENTROPY_SEED),
    }
}

/// Accepts an integer, `"entropy"` or null.
fn deserialize_seed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seed {
        Fixed(u64),
        Named(String),
    }

    match Option::<Seed>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seed::Fixed(seed)) => Ok(Some(seed)),
        Some(Seed::Named(name)) if name.eq_ignore_ascii_case(ENTROPY_SEED) => Ok(None),
        Some(Seed::Named(name)) => Err(serde::de::Error::custom(format!(
            "seed must be a non-negative integer or \"{}\", found {:?}",
            ENTROPY_SEED, name
        ))),
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_depth: 5,
            elite_size: 3,
            generations: 100,
            tournament_size: 5,
            seed: Some(0),
            crossover_probability: 0.8,
            mutation_probability: 0.2,
            test_train_split: 0.7,
            verbose: false,
            parallel_evaluation: false,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.population_size < 2 {
            return Err(GpError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.max_depth < 1 {
            return Err(GpError::Configuration(
                "Max depth must be at least 1".to_string()
            ));
        }
        if self.generations < 1 {
            return Err(GpError::Configuration(
                "Generations must be at least 1".to_string()
            ));
        }
        if self.tournament_size < 1 || self.tournament_size > self.population_size {
            return Err(GpError::Configuration(format!(
                "Tournament size must be between 1 and the population size ({})",
                self.population_size
            )));
        }
        if self.elite_size > self.population_size {
            return Err(GpError::Configuration(format!(
                "Elite size must not exceed the population size ({})",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(GpError::Configuration(
                "Crossover probability must be between 0 and 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(GpError::Configuration(
                "Mutation probability must be between 0 and 1".to_string()
            ));
        }
        if !(self.test_train_split > 0.0 && self.test_train_split <= 1.0) {
            return Err(GpError::Configuration(
                "Test/train split must be in (0, 1]".to_string()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases = [
            SearchConfig { population_size: 1, ..Default::default() },
            SearchConfig { max_depth: 0, ..Default::default() },
            SearchConfig { generations: 0, ..Default::default() },
            SearchConfig { tournament_size: 0, ..Default::default() },
            SearchConfig { tournament_size: 101, ..Default::default() },
            SearchConfig { elite_size: 101, ..Default::default() },
            SearchConfig { crossover_probability: 1.5, ..Default::default() },
            SearchConfig { mutation_probability: -0.1, ..Default::default() },
            SearchConfig { test_train_split: 0.0, ..Default::default() },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_entropy_seed_survives_toml() {
        let config = SearchConfig { seed: None, ..Default::default() };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("seed = \"entropy\""), "{}", text);

        let reloaded: SearchConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded.seed, None);
    }

    #[test]
    fn test_seed_forms() {
        let fixed: SearchConfig = toml::from_str("seed = 42").unwrap();
        assert_eq!(fixed.seed, Some(42));

        let null: SearchConfig = serde_json::from_str(r#"{"seed": null}"#).unwrap();
        assert_eq!(null.seed, None);

        let missing: SearchConfig = toml::from_str("").unwrap();
        assert_eq!(missing.seed, Some(0));

        assert!(toml::from_str::<SearchConfig>("seed = \"random\"").is_err());
    }
}
