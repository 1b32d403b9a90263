//! Logout command - forget the session on this device

use anyhow::Result;
use dialoguer::Confirm;
use luna_core::services::{EntryPoint, LogEvent};

use super::{command_failed, get_context, get_logger, log_event};
use crate::output;

pub fn run(force: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("logout"));

    let ctx = get_context()?;
    if !ctx.credentials.is_present() && !ctx.onboarding.is_complete() {
        output::info("Not signed in.");
        return Ok(());
    }

    if !force
        && !Confirm::new()
            .with_prompt("Sign out of Luna on this device?")
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.credentials
        .clear()
        .map_err(|e| command_failed(&logger, "logout", e))?;
    log_event(&logger, LogEvent::new("session_ended").with_details("signed_out"));
    output::success("Signed out.");
    Ok(())
}
