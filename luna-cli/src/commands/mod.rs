//! CLI command implementations

pub mod app;
pub mod ask;
pub mod calendar;
pub mod config;
pub mod export;
pub mod insights;
pub mod log;
pub mod logout;
pub mod logs;
pub mod setup;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use luna_core::services::{EntryPoint, LogEvent, LoggingService};
use luna_core::{Error, LunaContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(entry_point: EntryPoint) -> Option<LoggingService> {
    let luna_dir = get_luna_dir().ok()?;
    std::fs::create_dir_all(&luna_dir).ok()?;
    LoggingService::new(&luna_dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the luna directory from environment or default
pub fn get_luna_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LUNA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".luna"))
        .ok_or_else(|| anyhow!("Could not find home directory; set LUNA_DIR"))
}

/// Get or create the luna context
pub fn get_context() -> Result<LunaContext> {
    let luna_dir = get_luna_dir()?;
    LunaContext::new(&luna_dir).context("Failed to initialize luna context")
}

/// Today in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Log a failed command and turn it into a user-facing error
///
/// A rejected or missing credential has already ended the session; the
/// message points back to setup.
pub fn command_failed(logger: &Option<LoggingService>, command: &str, err: Error) -> anyhow::Error {
    if err.is_unauthenticated() {
        log_event(
            logger,
            LogEvent::new("session_ended").with_command(command),
        );
        return anyhow!("Your session has ended. Run `luna setup` to start again.");
    }

    log_event(
        logger,
        LogEvent::new("command_failed")
            .with_command(command)
            .with_error(err.to_string()),
    );

    // A store that refused a write may accept it on the next attempt
    if err.is_retryable() || matches!(err, Error::Storage(_)) {
        anyhow!("{}\nPlease try again.", err)
    } else {
        anyhow!("{}", err)
    }
}

/// Require completed onboarding before talking to the backend
///
/// A missing credential is left for the backend gateway to handle, so it
/// ends the session like any other rejection.
pub fn require_session(ctx: &LunaContext) -> Result<()> {
    if ctx.onboarding.is_complete() {
        Ok(())
    } else {
        Err(anyhow!("You're not set up yet. Run `luna setup` first."))
    }
}
