pub mod manager;
pub mod search;
pub mod symbols;
pub mod traits;

pub use manager::{AppConfig, ConfigManager};
pub use search::SearchConfig;
pub use symbols::SymbolConfig;
pub use traits::ConfigSection;
