//! API configuration
//!
//! Values come from `API_`-prefixed environment variables. Nested sections use
//! a double underscore, e.g. `API_CARD_REGISTRY__TIMEOUT_SECS=2` or
//! `API_DATABASE__URL=postgres://...`.

use serde::Deserialize;

use domain_account::RegistryConfig;
use infra_db::DatabaseConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Account store connection
    pub database: DatabaseConfig,
    pub client_directory: RegistryConfig,
    pub product_parameters: RegistryConfig,
    pub card_registry: RegistryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            database: DatabaseConfig::default(),
            client_directory: RegistryConfig::new("http://localhost:9050/v1/client"),
            product_parameters: RegistryConfig::new("http://localhost:9054/v1/productParameter"),
            card_registry: RegistryConfig::new("http://localhost:9056/v1/card"),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("API")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Builds the configuration over the defaults
    ///
    /// Registry base URLs are seeded explicitly so that overriding a single
    /// registry field keeps the default endpoint.
    fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = ApiConfig::default();
        config::Config::builder()
            .set_default("client_directory.base_url", defaults.client_directory.base_url)?
            .set_default("product_parameters.base_url", defaults.product_parameters.base_url)?
            .set_default("card_registry.base_url", defaults.card_registry.base_url)?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
