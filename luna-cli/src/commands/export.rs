//! Export command - download the symptom report PDF

use std::path::PathBuf;

use anyhow::Result;
use luna_core::services::{EntryPoint, LogEvent};

use super::{command_failed, get_context, get_logger, log_event, require_session};
use crate::output;

pub async fn run(output_path: Option<PathBuf>, json: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("export"));

    let ctx = get_context()?;
    require_session(&ctx)?;

    let target = output_path.unwrap_or_else(|| PathBuf::from("."));
    let written = output::with_spinner(
        "Downloading report...",
        json,
        ctx.export_service.export_pdf(&target),
    )
    .await
    .map_err(|e| command_failed(&logger, "export", e))?;

    if json {
        println!("{}", serde_json::json!({ "path": written.to_string_lossy() }));
    } else {
        output::success(&format!("Saved report to {}", written.display()));
    }
    Ok(())
}
