//! Request log query command
//!
//! Query and display the persisted call records from the CLI.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use jagad::config;
use jagad::request_log::{LogFilter, RequestLogEntry, RequestLogStore};
use std::path::Path;

/// Query and display request log entries
#[derive(Debug, Clone, Parser)]
pub struct LogsArgs {
    /// Filter by endpoint (e.g. "/api/llm/inference")
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Filter by model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Filter by status code (e.g. 400)
    #[arg(short, long)]
    pub status: Option<u16>,

    /// Only show failed calls
    #[arg(long)]
    pub errors_only: bool,

    /// Maximum number of results
    #[arg(long, default_value = "50")]
    pub limit: usize,

    /// Show oldest first (default: newest first)
    #[arg(long)]
    pub oldest_first: bool,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: String,
}

/// Execute the logs command
pub async fn execute(config_path: &Path, args: LogsArgs) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    let store = RequestLogStore::new(&format!("sqlite:{}", cfg.database.path)).await?;

    let filter = LogFilter {
        endpoint: args.endpoint.clone(),
        model: args.model.clone(),
        status_code: args.status,
        errors_only: args.errors_only,
        limit: Some(args.limit),
        oldest_first: args.oldest_first,
    };

    let entries = store.query(&filter).await?;

    if entries.is_empty() {
        println!("{}", "No request log entries match the criteria".yellow());
        return Ok(());
    }

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{}", json);
        }
        _ => {
            display_entries_text(&entries);
        }
    }

    Ok(())
}

/// Display entries in human-friendly text format
fn display_entries_text(entries: &[RequestLogEntry]) {
    println!("{}", format!("Found {} request log entries", entries.len()).bold());
    println!();

    for entry in entries {
        let timestamp = entry.created_at.format("%Y-%m-%d %H:%M:%S%.3f");

        let status_colored = if entry.status_code >= 500 {
            entry.status_code.to_string().red().bold()
        } else if entry.status_code >= 400 {
            entry.status_code.to_string().yellow().bold()
        } else {
            entry.status_code.to_string().green()
        };

        let model_display = entry
            .model
            .as_ref()
            .map(|m| format!(" model={}", m))
            .unwrap_or_default();

        let duration_display = entry
            .response_time_ms
            .map(|ms| format!(" {:.1}ms", ms))
            .unwrap_or_default();

        println!(
            "{} #{} {} {}{}{}",
            timestamp.to_string().dimmed(),
            entry.id,
            status_colored,
            entry.endpoint.cyan(),
            model_display.dimmed(),
            duration_display.dimmed(),
        );

        if let Some(error) = &entry.error_message {
            println!("  {}", format!("error: {}", error).red());
        }
    }
}
