use serde::Deserialize;

// Top-level configuration, one section per collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub identity: IdentityConfig,
}

// HTTP service settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Booking backend (REST)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Bearer token attached to backend calls when present.
    pub auth_token: Option<String>,
}

// National identity registry
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_token: Option<String>,
}

impl Config {
    /// Defaults overridden by `NORTE_<SECTION>__<KEY>` variables,
    /// e.g. `NORTE_BACKEND__AUTH_TOKEN` or `NORTE_APP__PORT`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000)?
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "norte_booking=debug,tower_http=debug")?
            .set_default("backend.base_url", "http://localhost:3001/api")?
            .set_default("identity.base_url", "http://localhost:3001/api/reniec")?
            .add_source(config::Environment::with_prefix("NORTE").prefix_separator("_").separator("__"))
            .build()?
            .try_deserialize()
    }
}
