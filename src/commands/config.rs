use anyhow::Result;
use colored::Colorize;
use jagad::config;
use std::path::Path;

/// Execute the config show command
pub fn show(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Listen address: {}:{}", cfg.server.host, cfg.server.port);
    println!("  Engine: {}", cfg.engine.base_url);
    println!("  Request log: {}", cfg.database.path);
    println!(
        "  Metrics: {}",
        if cfg.metrics.enabled { "enabled" } else { "disabled" }
    );

    Ok(())
}
