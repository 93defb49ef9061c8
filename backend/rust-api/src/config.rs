use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    /// Seed the built-in rank ladder at startup when the table is empty.
    pub seed_default_ranks: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .set_default("listen_addr", "0.0.0.0:8081")?
            .set_default("seed_default_ranks", true)?
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
