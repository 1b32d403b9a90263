//! Log command - record a period start or a symptom

use anyhow::Result;
use clap::Subcommand;
use dialoguer::{Confirm, Select};
use luna_core::domain::symptom::{SEVERITY_LEVELS, SYMPTOM_OPTIONS};
use luna_core::services::{EntryPoint, LogEvent};

use super::{command_failed, get_context, get_logger, log_event, require_session};
use crate::output;

#[derive(Subcommand)]
pub enum LogCommands {
    /// Record that your period started today
    Period {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a symptom
    Symptom {
        /// Symptom name, e.g. Cramps
        #[arg(long)]
        name: Option<String>,
        /// Severity from 1 (mild) to 5 (very strong)
        #[arg(long)]
        severity: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: LogCommands) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    let ctx = get_context()?;
    require_session(&ctx)?;

    match command {
        LogCommands::Period { force, json } => {
            log_event(&logger, LogEvent::new("command_executed").with_command("log period"));

            if !force && !json && !confirm_period_start()? {
                println!("Cancelled.");
                return Ok(());
            }

            let message = ctx
                .tracking_service
                .record_period_start()
                .await
                .map_err(|e| command_failed(&logger, "log period", e))?;

            if json {
                println!("{}", serde_json::json!({ "message": message }));
            } else {
                output::success(&message);
            }
        }
        LogCommands::Symptom {
            name,
            severity,
            json,
        } => {
            log_event(&logger, LogEvent::new("command_executed").with_command("log symptom"));

            let (name, severity) = match (name, severity) {
                (Some(name), Some(severity)) => (name, severity),
                (name, severity) => prompt_symptom(name, severity)?,
            };

            let logged = ctx
                .tracking_service
                .record_symptom(&name, &severity)
                .await
                .map_err(|e| command_failed(&logger, "log symptom", e))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&logged)?);
            } else {
                output::success(&format!("Logged {}.", logged.symptom_name));
            }
        }
    }

    Ok(())
}

pub fn confirm_period_start() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Did your period start today?")
        .default(true)
        .interact()?)
}

/// Pick whichever of symptom and severity was not given
pub fn prompt_symptom(name: Option<String>, severity: Option<String>) -> Result<(String, String)> {
    let name = match name {
        Some(name) => name,
        None => {
            let index = Select::new()
                .with_prompt("Symptom")
                .items(&SYMPTOM_OPTIONS)
                .default(0)
                .interact()?;
            SYMPTOM_OPTIONS[index].to_string()
        }
    };

    let severity = match severity {
        Some(severity) => severity,
        None => {
            let labels: Vec<String> = SEVERITY_LEVELS
                .iter()
                .map(|(key, label)| format!("{} - {}", key, label))
                .collect();
            let index = Select::new()
                .with_prompt("Severity")
                .items(&labels)
                .default(0)
                .interact()?;
            SEVERITY_LEVELS[index].0.to_string()
        }
    };

    Ok((name, severity))
}
