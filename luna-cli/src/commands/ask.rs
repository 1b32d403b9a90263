//! Ask command - chat with the cycle assistant

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use luna_core::services::{EntryPoint, LogEvent};

use super::{command_failed, get_context, get_logger, log_event, require_session};
use crate::output;

pub async fn run(message: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("ask"));

    let ctx = get_context()?;
    require_session(&ctx)?;

    let message = match message {
        Some(message) => message,
        None => Input::new().with_prompt("Ask Luna").interact_text()?,
    };

    let reply = output::with_spinner(
        "Thinking...",
        json,
        ctx.tracking_service.ask_assistant(&message),
    )
    .await
    .map_err(|e| command_failed(&logger, "ask", e))?;

    if json {
        println!("{}", serde_json::json!({ "reply": reply }));
    } else {
        print_reply(&reply);
    }
    Ok(())
}

pub fn print_reply(reply: &str) {
    println!("{} {}", "Luna:".magenta().bold(), reply);
}
