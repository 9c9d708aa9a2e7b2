use super::{search::SearchConfig, symbols::SymbolConfig, traits::ConfigSection};
use crate::error::GpError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides, e.g. `SYMGP_SEARCH__POPULATION_SIZE=50`.
pub const ENV_PREFIX: &str = "SYMGP";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub symbols: SymbolConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GpError> {
        self.search.validate().map_err(section_error::<SearchConfig>)?;
        self.symbols.validate().map_err(section_error::<SymbolConfig>)?;
        Ok(())
    }
}

fn section_error<S: ConfigSection>(error: GpError) -> GpError {
    match error {
        GpError::Configuration(message) => {
            GpError::Configuration(format!("[{}] {}", S::section_name(), message))
        }
        other => other,
    }
}

pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Load a TOML or JSON file (by extension) with environment overrides on top.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GpError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GpError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(Self::environment())
            .build()?;

        self.commit(settings.try_deserialize()?)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Defaults with environment overrides only.
    pub fn load_from_env(&mut self) -> Result<(), GpError> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        self.commit(settings.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn commit(&mut self, config: AppConfig) -> Result<(), GpError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let toml_str = toml::to_string_pretty(&self.config)?;

        std::fs::write(path, toml_str)
            .map_err(|e| GpError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&mut self, f: F) -> Result<(), GpError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.clone();
        f(&mut config);
        self.commit(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
