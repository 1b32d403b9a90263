//! Calendar command - month grid with predicted period days

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Attribute, Cell, CellAlignment, Color};
use luna_core::domain::calendar::WEEKDAYS;
use luna_core::services::{CalendarView, EntryPoint, LogEvent, LoggingService};
use luna_core::{CalendarCell, MonthCursor};

use super::{command_failed, get_context, get_logger, log_event, require_session, today};
use crate::output;

pub async fn run(month: Option<MonthCursor>, json: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("calendar"));

    let ctx = get_context()?;
    require_session(&ctx)?;

    let today = today();
    let month = month.unwrap_or_else(|| MonthCursor::containing(today));
    let view = output::with_spinner(
        "Loading predictions...",
        json,
        ctx.view_service.load_calendar(month, today),
    )
    .await
    .map_err(|e| command_failed(&logger, "calendar", e))?;
    log_skipped(&logger, &view);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    render(&view);
    Ok(())
}

/// Unusable prediction records are noted by period number only
pub fn log_skipped(logger: &Option<LoggingService>, view: &CalendarView) {
    for skipped in &view.skipped {
        log_event(
            logger,
            LogEvent::new("prediction_skipped")
                .with_screen("calendar")
                .with_details(format!("period {}", skipped.period_number)),
        );
    }
}

pub fn render(view: &CalendarView) {
    println!("{}", view.month.bold());

    let mut table = output::create_table();
    table.set_header(WEEKDAYS.iter().map(|day| Cell::new(day).set_alignment(CellAlignment::Center)));

    for week in view.cells.chunks(7) {
        let row: Vec<Cell> = week.iter().map(day_cell).collect();
        table.add_row(row);
    }
    println!("{}", table);

    println!(
        "{} predicted period   {} today",
        "■".red(),
        "■".bold().underline()
    );
}

fn day_cell(cell: &CalendarCell) -> Cell {
    match cell {
        CalendarCell::Padding => Cell::new(""),
        CalendarCell::Day {
            date,
            is_predicted,
            is_today,
        } => {
            let mut out = Cell::new(chrono::Datelike::day(date)).set_alignment(CellAlignment::Right);
            if *is_predicted {
                out = out.fg(Color::Red);
            }
            if *is_today {
                out = out
                    .add_attribute(Attribute::Bold)
                    .add_attribute(Attribute::Underlined);
            }
            out
        }
    }
}
