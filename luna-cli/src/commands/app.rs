//! App command - the interactive session
//!
//! Each pass of the loop asks the session gate which screen is current and
//! shows it. Anything that ends the session (signing out, a rejected
//! credential on any request) brings the loop back to the welcome screen.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use luna_core::services::{EntryPoint, LogEvent, LoggingService, SessionGate};
use luna_core::{LunaContext, MonthCursor, ProfileInput, Screen, SetupMode};

use super::{get_context, get_logger, log_event, today};
use crate::output;

const MENU: [&str; 10] = [
    "Home",
    "Calendar",
    "Insights",
    "Log period start",
    "Log symptom",
    "Ask Luna",
    "Export symptom report",
    "Update cycle info",
    "Sign out",
    "Quit",
];

enum Flow {
    Continue,
    Quit,
}

pub async fn run() -> Result<()> {
    let logger = get_logger(EntryPoint::Interactive);
    log_event(&logger, LogEvent::new("command_executed").with_command("app"));

    let ctx = get_context()?;
    let mut gate = ctx.session_gate();
    let mut last_screen = None;

    loop {
        let screen = gate.screen();
        if last_screen != Some(screen) {
            log_event(&logger, LogEvent::new("screen_opened").with_screen(screen.name()));
            if screen == Screen::Welcome && last_screen.is_some() {
                output::warning("Your session has ended.");
            }
            last_screen = Some(screen);
        }

        let flow = match screen {
            Screen::Welcome => welcome(&mut gate)?,
            Screen::ProfileSetup(mode) => profile_setup(&mut gate, mode, &logger).await?,
            Screen::MainApp => main_menu(&ctx, &mut gate, &logger).await?,
        };

        if let Flow::Quit = flow {
            ctx.view_service.teardown();
            return Ok(());
        }
    }
}

fn welcome(gate: &mut SessionGate) -> Result<Flow> {
    super::setup::print_welcome();
    if Confirm::new()
        .with_prompt("Get started?")
        .default(true)
        .interact()?
    {
        gate.acknowledge_welcome();
        Ok(Flow::Continue)
    } else {
        Ok(Flow::Quit)
    }
}

async fn profile_setup(
    gate: &mut SessionGate,
    mode: SetupMode,
    logger: &Option<LoggingService>,
) -> Result<Flow> {
    let today = today();
    let Some(input) = super::setup::prompt_profile(mode, ProfileInput::suggested(today))? else {
        gate.cancel_update();
        return Ok(Flow::Continue);
    };

    // Failures leave the form open for another try
    if let Err(e) = super::setup::save(gate, input, today).await {
        log_event(
            logger,
            LogEvent::new("profile_save_failed")
                .with_screen(Screen::ProfileSetup(mode).name())
                .with_error(e.to_string()),
        );
        output::error(&e.to_string());
    }
    Ok(Flow::Continue)
}

async fn main_menu(
    ctx: &LunaContext,
    gate: &mut SessionGate,
    logger: &Option<LoggingService>,
) -> Result<Flow> {
    println!();
    let choice = Select::new()
        .with_prompt("Luna")
        .items(&MENU)
        .default(0)
        .interact()?;

    let outcome = match MENU[choice] {
        "Home" => show_home(ctx, gate, logger).await,
        "Calendar" => browse_calendar(ctx, logger).await,
        "Insights" => ctx
            .view_service
            .load_insights()
            .await
            .map(|view| super::insights::render(&view)),
        "Log period start" => {
            if super::log::confirm_period_start()? {
                ctx.tracking_service
                    .record_period_start()
                    .await
                    .map(|message| output::success(&message))
            } else {
                Ok(())
            }
        }
        "Log symptom" => {
            let (name, severity) = super::log::prompt_symptom(None, None)?;
            ctx.tracking_service
                .record_symptom(&name, &severity)
                .await
                .map(|logged| output::success(&format!("Logged {}.", logged.symptom_name)))
        }
        "Ask Luna" => {
            let message: String = Input::new().with_prompt("Ask Luna").interact_text()?;
            ctx.tracking_service
                .ask_assistant(&message)
                .await
                .map(|reply| super::ask::print_reply(&reply))
        }
        "Export symptom report" => ctx
            .export_service
            .export_pdf(std::path::Path::new("."))
            .await
            .map(|path| output::success(&format!("Saved report to {}", path.display()))),
        "Update cycle info" => {
            gate.request_cycle_update();
            Ok(())
        }
        "Sign out" => {
            if Confirm::new()
                .with_prompt("Sign out of Luna on this device?")
                .default(false)
                .interact()?
            {
                gate.sign_out().map(|_| ())
            } else {
                Ok(())
            }
        }
        _ => return Ok(Flow::Quit),
    };

    // A rejected credential already ended the session; the loop will notice
    if let Err(e) = outcome {
        if !e.is_unauthenticated() {
            log_event(
                logger,
                LogEvent::new("action_failed")
                    .with_screen(MENU[choice])
                    .with_error(e.to_string()),
            );
            output::error(&e.to_string());
        }
    }
    Ok(Flow::Continue)
}

async fn show_home(
    ctx: &LunaContext,
    gate: &mut SessionGate,
    logger: &Option<LoggingService>,
) -> luna_core::domain::result::Result<()> {
    let home = output::with_spinner(
        "Loading your cycle...",
        false,
        ctx.view_service.load_home(today()),
    )
    .await?;
    super::status::render_home(&home);
    for section in &home.degraded {
        log_event(
            logger,
            LogEvent::new("section_degraded")
                .with_screen("home")
                .with_details(*section),
        );
    }

    // The trend pops up once per session
    if let Some(trend) = &home.trend {
        if gate.take_trend_popup() {
            println!();
            super::status::render_trend(trend);
        }
    }
    Ok(())
}

async fn browse_calendar(
    ctx: &LunaContext,
    logger: &Option<LoggingService>,
) -> luna_core::domain::result::Result<()> {
    let today = today();
    let mut month = MonthCursor::containing(today);
    let nav = ["Previous month", "Next month", "Back"];

    loop {
        let view = output::with_spinner(
            "Loading predictions...",
            false,
            ctx.view_service.load_calendar(month, today),
        )
        .await?;
        super::calendar::log_skipped(logger, &view);
        super::calendar::render(&view);

        let choice = Select::new()
            .items(&nav)
            .default(1)
            .interact()
            .map_err(|e| luna_core::Error::Other(e.to_string()))?;
        let moved = match choice {
            0 => month.previous(),
            1 => month.next(),
            _ => return Ok(()),
        };
        match moved {
            Some(next) => month = next,
            None => output::warning("No earlier or later months to show."),
        }
    }
}
