use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Public TheMealDB endpoint used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Provider configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Root of the recipe API (without trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number of leading categories whose meals are loaded
    #[serde(default = "default_category_limit")]
    pub category_limit: usize,
    /// Number of leading meals loaded per category
    #[serde(default = "default_meals_per_category")]
    pub meals_per_category: usize,
    /// Request timeout in seconds; requests never time out when unset
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category_limit: default_category_limit(),
            meals_per_category: default_meals_per_category(),
            timeout: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_category_limit() -> usize {
    5
}

fn default_meals_per_category() -> usize {
    10
}

impl ProviderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALDB__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALDB__CATEGORY_LIMIT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Load configuration from an optional `config.toml` and `MEALDB__*`
/// environment variables, falling back to defaults.
pub fn load_config() -> Result<ProviderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("MEALDB")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
