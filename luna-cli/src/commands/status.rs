//! Status command - current phase, fertile window and next period

use anyhow::Result;
use colored::Colorize;
use luna_core::services::{EntryPoint, HomeView, LogEvent};
use luna_core::TrendSummary;

use super::{command_failed, get_context, get_logger, log_event, require_session, today};
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("status"));

    let ctx = get_context()?;
    require_session(&ctx)?;

    let home = output::with_spinner(
        "Loading your cycle...",
        json,
        ctx.view_service.load_home(today()),
    )
    .await
    .map_err(|e| command_failed(&logger, "status", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&home)?);
        return Ok(());
    }

    render_home(&home);
    if let Some(trend) = &home.trend {
        println!();
        render_trend(trend);
    }
    Ok(())
}

/// Home summary, shared with the interactive app
pub fn render_home(home: &HomeView) {
    println!("{}", "Your Cycle".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Phase".to_string(), home.status.phase.label().to_string()]);
    table.add_row(vec![
        "Cycle day".to_string(),
        home.status.day_in_cycle.to_string(),
    ]);
    table.add_row(vec![
        "Fertile window".to_string(),
        if home.insight.is_fertile { "Yes" } else { "No" }.to_string(),
    ]);
    table.add_row(vec![
        "Next period".to_string(),
        home.insight.days_until_next.to_string(),
    ]);
    println!("{}", table);

    for section in &home.degraded {
        output::warning(&format!("Couldn't load {} right now.", section));
    }
}

pub fn render_trend(trend: &TrendSummary) {
    println!("{}", "Symptom trend".magenta().bold());
    if let Some(message) = &trend.message {
        println!("  {}", message);
    }
    if !trend.common_symptoms.is_empty() {
        println!("  Common now: {}", trend.common_symptoms.join(", "));
    }
}
