use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub database: DatabaseConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Base URL of the local Ollama instance
    pub base_url: String,
    /// Upper bound on a single engine call (list or generate)
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file path for the request log
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

/// Load configuration from a TOML file with `JAGAD__`-prefixed environment
/// overrides (e.g. `JAGAD__SERVER__PORT=9000`).
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("JAGAD").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.host.parse::<std::net::IpAddr>().is_err() {
        anyhow::bail!("Invalid server host: {}", cfg.server.host);
    }

    if cfg.engine.base_url.is_empty() {
        anyhow::bail!("Engine base_url must not be empty");
    }

    if !cfg.engine.base_url.starts_with("http://") && !cfg.engine.base_url.starts_with("https://") {
        anyhow::bail!(
            "Engine base_url must be an http(s) URL, got: {}",
            cfg.engine.base_url
        );
    }

    if cfg.engine.timeout_seconds == 0 {
        anyhow::bail!("Engine timeout_seconds must be greater than zero");
    }

    if cfg.database.path.is_empty() {
        anyhow::bail!("Database path must not be empty");
    }

    Ok(())
}
