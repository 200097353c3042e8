//! Config module contains the app settings.

use std::env;

use config_crate::{Config as RawConfig, ConfigError, Environment, File};

/// Application settings, layered from `config/base.toml`, an optional
/// `config/<RUN_MODE>.toml` and `COUPONS_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: Server,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub database: String,
    pub thread_count: usize,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let mut s = RawConfig::new();

        s.merge(File::with_name("config/base"))?;

        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        s.merge(File::with_name(&format!("config/{}", env)).required(false))?;

        s.merge(Environment::with_prefix("COUPONS"))?;

        s.try_into()
    }
}
