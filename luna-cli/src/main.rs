//! Luna CLI - cycle tracking in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use luna_core::MonthCursor;

mod commands;
mod output;

use commands::{app, ask, calendar, config, export, insights, log, logout, logs, setup, status};

/// Luna - cycle tracking in your terminal
#[derive(Parser)]
#[command(name = "luna", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive app
    App,

    /// Set up your profile, or update your cycle info
    Setup {
        /// First day of your last period (YYYY-MM-DD)
        #[arg(long)]
        last_period: Option<NaiveDate>,
        /// Average cycle length in days
        #[arg(long)]
        cycle_length: Option<u32>,
    },

    /// Show your current phase and next period
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the calendar with predicted period days
    Calendar {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<MonthCursor>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize your symptom history
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a period start or a symptom
    Log {
        #[command(subcommand)]
        command: log::LogCommands,
    },

    /// Download your symptom report as PDF
    Export {
        /// File or directory to write to
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the cycle assistant a question
    Ask {
        /// Your question
        message: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out on this device
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// View and manage the local event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show or change backend settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::App => runtime.block_on(app::run()),
        Commands::Setup {
            last_period,
            cycle_length,
        } => runtime.block_on(setup::run(last_period, cycle_length)),
        Commands::Status { json } => runtime.block_on(status::run(json)),
        Commands::Calendar { month, json } => runtime.block_on(calendar::run(month, json)),
        Commands::Insights { json } => runtime.block_on(insights::run(json)),
        Commands::Log { command } => runtime.block_on(log::run(command)),
        Commands::Export { output, json } => runtime.block_on(export::run(output, json)),
        Commands::Ask { message, json } => runtime.block_on(ask::run(message, json)),
        Commands::Logout { force } => logout::run(force),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
