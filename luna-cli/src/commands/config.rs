//! Config command - show or change the backend settings

use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use luna_core::adapters::HttpBackend;
use luna_core::config::Config;

use super::get_luna_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the backend API URL
    SetUrl {
        /// e.g. https://luna.example.com/api
        url: String,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let luna_dir = get_luna_dir()?;
    std::fs::create_dir_all(&luna_dir)?;
    let mut config = Config::load(&luna_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "apiUrl": config.api_url,
                        "timeoutSecs": config.timeout.as_secs(),
                        "dataDir": luna_dir.to_string_lossy(),
                    })
                );
            } else {
                let mut table = output::create_table();
                table.add_row(vec!["API URL".to_string(), config.api_url.clone()]);
                table.add_row(vec![
                    "Timeout".to_string(),
                    format!("{}s", config.timeout.as_secs()),
                ]);
                table.add_row(vec!["Data directory".to_string(), luna_dir.display().to_string()]);
                println!("{}", table);
            }
        }
        ConfigCommands::SetUrl { url, timeout } => {
            if let Some(secs) = timeout {
                config.timeout = Duration::from_secs(secs.max(1));
            }
            // Reject URLs the client could not use
            HttpBackend::new(&url, config.timeout)?;
            config.api_url = url;
            config.save(&luna_dir)?;
            output::success(&format!("API URL set to {}", config.api_url));
        }
    }

    Ok(())
}
