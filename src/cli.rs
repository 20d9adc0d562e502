use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jagad", version, about = "Just Another Generative AI Deployment")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server (default)
    Start,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Query the request log
    Logs(crate::commands::logs::LogsArgs),

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_start() {
        let cli = Cli {
            config: PathBuf::from("config.toml"),
            command: None,
        };

        matches!(cli.get_command(), Commands::Start);
    }

    #[test]
    fn test_cli_parsing_custom_config_path() {
        let args = vec!["jagad", "--config", "/etc/jagad.toml", "start"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/jagad.toml"));
        matches!(cli.get_command(), Commands::Start);
    }

    #[test]
    fn test_cli_parsing_config_validate() {
        let args = vec!["jagad", "config", "validate"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Config { action } => {
                matches!(action, ConfigCommands::Validate);
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_cli_parsing_logs_with_filters() {
        let args = vec!["jagad", "logs", "--endpoint", "/api/llm/inference", "--limit", "10"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Logs(logs_args) => {
                assert_eq!(logs_args.endpoint.as_deref(), Some("/api/llm/inference"));
                assert_eq!(logs_args.limit, 10);
            }
            _ => panic!("Expected Logs command"),
        }
    }
}
