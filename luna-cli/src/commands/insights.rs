//! Insights command - symptom history summary

use anyhow::Result;
use colored::Colorize;
use luna_core::domain::symptom::severity_label;
use luna_core::services::{EntryPoint, InsightsView, LogEvent};

use super::status::render_trend;
use super::{command_failed, get_context, get_logger, log_event, require_session};
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("insights"));

    let ctx = get_context()?;
    require_session(&ctx)?;

    let view = output::with_spinner(
        "Loading insights...",
        json,
        ctx.view_service.load_insights(),
    )
    .await
    .map_err(|e| command_failed(&logger, "insights", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    render(&view);
    Ok(())
}

pub fn render(view: &InsightsView) {
    let summary = &view.summary;
    println!("{}", "Insights".bold());
    println!();

    if summary.total == 0 {
        output::info("No symptoms logged yet. Try `luna log symptom`.");
    } else {
        println!("Entries logged: {}", summary.total);
        if let Some((name, count)) = &summary.top_symptom {
            println!("Most frequent:  {} ({}x)", name, count);
        }

        let mut severity = output::create_table();
        severity.set_header(vec!["Severity", "Count"]);
        for (key, count) in &summary.severity_counts {
            let label = if key.is_empty() {
                "Unrated".to_string()
            } else {
                severity_label(key)
            };
            severity.add_row(vec![label, count.to_string()]);
        }
        println!("{}", severity);

        let mut history = output::create_table();
        history.set_header(vec!["Day", "Symptom", "Severity"]);
        for group in &summary.by_day {
            let day = group
                .date
                .map(|d| d.format("%a %d %b %Y").to_string())
                .unwrap_or_else(|| "Undated".to_string());
            for (i, entry) in group.entries.iter().enumerate() {
                history.add_row(vec![
                    if i == 0 { day.clone() } else { String::new() },
                    entry.name().to_string(),
                    entry
                        .severity
                        .as_deref()
                        .map(severity_label)
                        .unwrap_or_default(),
                ]);
            }
        }
        println!("{}", history);
    }

    if let Some(trend) = &view.trend {
        println!();
        render_trend(trend);
    }
    for section in &view.degraded {
        output::warning(&format!("Couldn't load {} right now.", section));
    }
}
