//! Logs command - inspect the local event log
//!
//! The log only records what the app did (commands run, screens opened,
//! sessions ended, sections that failed to load), never cycle or symptom
//! data, so it is safe to paste into a bug report.

use anyhow::Result;
use chrono::{Duration, Local, TimeZone};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::Cell;
use dialoguer::Confirm;
use luna_core::services::{EntryPoint, LogEntry, LoggingService};

use super::get_luna_dir;
use crate::output;

const ERROR_PREVIEW_CHARS: usize = 60;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show what Luna did recently
    List {
        /// How many events to show
        #[arg(short = 'n', long, default_value = "30")]
        limit: usize,
        /// Only events that carry an error
        #[arg(long, alias = "errors")]
        failures: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget events older than a number of days
    Clear {
        /// Keep events from the last N days
        #[arg(long, default_value = "30")]
        keep_days: u32,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how many events are stored and where
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let luna_dir = get_luna_dir()?;
    std::fs::create_dir_all(&luna_dir)?;
    let service = LoggingService::new(&luna_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List {
            limit,
            failures,
            json,
        } => list(&service, limit, failures, json),
        LogsCommands::Clear {
            keep_days,
            yes,
            json,
        } => clear(&service, keep_days, yes, json),
        LogsCommands::Stats { json } => stats(&service, json),
    }
}

fn list(service: &LoggingService, limit: usize, failures: bool, json: bool) -> Result<()> {
    let entries = if failures {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        output::info(if failures {
            "No failures recorded."
        } else {
            "No events recorded yet."
        });
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["When", "From", "Event", "Screen / command", "Details", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(local_time(entry.timestamp)),
            Cell::new(&entry.entry_point),
            Cell::new(&entry.event),
            Cell::new(location(entry)),
            Cell::new(entry.error_details.as_deref().unwrap_or("")),
            Cell::new(entry.error_message.as_deref().map(preview).unwrap_or_default())
                .fg(comfy_table::Color::Red),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn clear(service: &LoggingService, keep_days: u32, yes: bool, json: bool) -> Result<()> {
    if !yes
        && !json
        && !Confirm::new()
            .with_prompt(format!("Forget events older than {} days?", keep_days))
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let cutoff = Local::now() - Duration::days(i64::from(keep_days));
    let deleted = service.delete_before(cutoff.timestamp_millis())?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted, "keepDays": keep_days }));
    } else {
        output::success(&format!("Removed {} events.", deleted));
    }
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let total = service.count()?;
    let failures = service.count_errors()?;
    let latest = service.get_recent(1)?.into_iter().next();
    let db_path = service.db_path();
    let size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "events": total,
                "failures": failures,
                "latestEvent": latest.as_ref().map(|e| &e.event),
                "path": db_path.to_string_lossy(),
                "sizeBytes": size_bytes,
            })
        );
        return Ok(());
    }

    println!("{}", "Event log".bold());
    println!("  Events:   {}", total);
    println!("  Failures: {}", failures);
    if let Some(entry) = latest {
        println!("  Latest:   {} ({})", entry.event, local_time(entry.timestamp).dimmed());
    }
    println!("  File:     {} ({} KiB)", db_path.display(), size_bytes.div_ceil(1024));
    Ok(())
}

fn local_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn location(entry: &LogEntry) -> String {
    match (&entry.screen, &entry.command) {
        (Some(screen), Some(command)) => format!("{} ({})", screen, command),
        (Some(screen), None) => screen.clone(),
        (None, Some(command)) => format!("luna {}", command),
        (None, None) => String::new(),
    }
}

fn preview(message: &str) -> String {
    if message.chars().count() <= ERROR_PREVIEW_CHARS {
        return message.to_string();
    }
    let cut: String = message.chars().take(ERROR_PREVIEW_CHARS - 1).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(screen: Option<&str>, command: Option<&str>) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: 0,
            entry_point: "cli".to_string(),
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: "command_executed".to_string(),
            screen: screen.map(str::to_string),
            command: command.map(str::to_string),
            error_message: None,
            error_details: None,
        }
    }

    #[test]
    fn test_location_prefers_screen() {
        assert_eq!(location(&entry(Some("calendar"), None)), "calendar");
        assert_eq!(location(&entry(None, Some("status"))), "luna status");
        assert_eq!(location(&entry(Some("home"), Some("app"))), "home (app)");
        assert_eq!(location(&entry(None, None)), "");
    }

    #[test]
    fn test_preview_shortens_long_errors() {
        assert_eq!(preview("HTTP 503"), "HTTP 503");

        let long = "x".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), ERROR_PREVIEW_CHARS);
        assert!(shown.ends_with('…'));
    }
}
