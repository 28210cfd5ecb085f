//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_session_ttl_hours() -> i64 {
    12
}

fn default_list_view_capacity() -> usize {
    256
}

fn default_widget_cache_capacity() -> u64 {
    1024
}

fn default_busy_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_busy_timeout_secs")]
    pub database_busy_timeout_secs: u64,
    pub templates_dir: String,
    pub secret: String,
    /// Directory holding the blob store objects (e.g. generated reports).
    pub storage_root: String,
    /// Public path prefix under which stored objects are served.
    pub storage_url_prefix: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Maximum number of customer list views kept in memory.
    #[serde(default = "default_list_view_capacity")]
    pub list_view_capacity: usize,
    /// Maximum number of widget cache entries kept in memory, over all browsers.
    #[serde(default = "default_widget_cache_capacity")]
    pub widget_cache_capacity: u64,
}

impl ServerConfig {
    /// Layers `config/default.yaml`, `config/<APP_ENV>.yaml` and `APP_*` variables.
    ///
    /// `APP_ENV` defaults to `local`; the environment file is optional.
    pub fn load() -> Result<Self, config::ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    pub fn busy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.database_busy_timeout_secs)
    }
}
